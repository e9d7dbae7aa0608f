//! Mean summaries with Student t confidence intervals.

use tracing::{debug, instrument};

use crate::config::{ConfidenceLevel, MeanOptions};
use crate::dataset::{partition, Dataset, GroupKey};
use crate::error::{Result, StatsError};
use crate::inference::distributions::t_critical_value;

use super::types::{ContinuousSummary, MeanTable};

/// Summarizes a numeric response column per partition.
///
/// For each partition the summarizer reports the count of non-missing values, the
/// mean, the sample standard deviation, the standard error and a confidence interval
/// based on the Student t distribution with `n - 1` degrees of freedom.
///
/// A partition with a single value has no spread estimate: its standard error is 0
/// and both confidence limits equal the mean. A partition with no values fails the
/// whole call with [`StatsError::EmptyPartition`].
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use arrow::array::{ArrayRef, Float64Array, StringArray};
/// use term_stats::dataset::Dataset;
/// use term_stats::summaries::MeanSummarizer;
///
/// let dataset = Dataset::try_from_columns(vec![
///     ("score", Arc::new(Float64Array::from(vec![4.0, 6.0, 10.0, 14.0])) as ArrayRef),
///     ("team", Arc::new(StringArray::from(vec!["a", "a", "b", "b"])) as ArrayRef),
/// ])
/// .unwrap();
///
/// let table = MeanSummarizer::new("score").group_by(["team"]).summarize(&dataset).unwrap();
/// assert_eq!(table.rows.len(), 2);
/// assert_eq!(table.rows[0].mean, 5.0);
/// assert_eq!(table.rows[1].mean, 12.0);
/// ```
#[derive(Debug, Clone)]
pub struct MeanSummarizer {
    response: String,
    options: MeanOptions,
}

impl MeanSummarizer {
    /// Creates a summarizer for the given response column.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            options: MeanOptions::default(),
        }
    }

    /// Replaces all options.
    pub fn with_options(mut self, options: MeanOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the grouping columns.
    pub fn group_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = self.options.with_grouping(columns);
        self
    }

    /// Sets the confidence level.
    pub fn confidence_level(mut self, level: ConfidenceLevel) -> Self {
        self.options = self.options.with_confidence_level(level);
        self
    }

    /// Returns the response column.
    pub fn response(&self) -> &str {
        &self.response
    }

    /// Returns the options.
    pub fn options(&self) -> &MeanOptions {
        &self.options
    }

    /// Computes one [`ContinuousSummary`] per partition.
    #[instrument(skip(self, dataset), fields(
        response = %self.response,
        grouping = ?self.options.grouping,
        confidence_level = self.options.confidence_level.value()
    ))]
    pub fn summarize(&self, dataset: &Dataset) -> Result<MeanTable> {
        let response = dataset.numeric_column(&self.response)?;
        let partitioning = partition(dataset, &self.options.grouping)?;

        let rows = partitioning
            .iter()
            .map(|part| {
                let values = part
                    .rows()
                    .iter()
                    .filter_map(|&row| response[row])
                    .collect::<Vec<_>>();
                self.summarize_values(part.key(), &values)
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(partitions = rows.len(), "Computed mean summaries");

        Ok(MeanTable {
            variable: self.response.clone(),
            grouping: self.options.grouping.clone(),
            confidence_level: self.options.confidence_level,
            rows,
        })
    }

    fn summarize_values(&self, key: &GroupKey, values: &[f64]) -> Result<ContinuousSummary> {
        if values.is_empty() {
            return Err(StatsError::empty_partition(format!(
                "no non-missing values of '{}' in partition {key}",
                self.response
            )));
        }

        let count = values.len();
        let n = count as f64;
        let mean = values.iter().sum::<f64>() / n;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let (std_dev, standard_error, lower_ci, upper_ci) = if count == 1 {
            (0.0, 0.0, mean, mean)
        } else {
            let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
            let std_dev = variance.sqrt();
            let standard_error = std_dev / n.sqrt();
            let critical = t_critical_value(self.options.confidence_level, n - 1.0)?;
            let margin = critical * standard_error;
            (std_dev, standard_error, mean - margin, mean + margin)
        };

        Ok(ContinuousSummary {
            key: key.clone(),
            n: count as u64,
            mean,
            std_dev,
            standard_error,
            lower_ci,
            upper_ci,
            min,
            max,
        })
    }
}

/// Summarizes `response_column` per partition of `grouping_columns`.
///
/// Shorthand for [`MeanSummarizer`].
pub fn summarize_mean<S: AsRef<str>>(
    dataset: &Dataset,
    response_column: &str,
    grouping_columns: &[S],
    confidence_level: ConfidenceLevel,
) -> Result<MeanTable> {
    MeanSummarizer::new(response_column)
        .group_by(grouping_columns.iter().map(|c| c.as_ref().to_string()))
        .confidence_level(confidence_level)
        .summarize(dataset)
}
