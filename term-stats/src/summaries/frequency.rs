//! One-way frequency distributions with Wilson score intervals.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, instrument};

use crate::config::{ConfidenceLevel, FrequencyOptions};
use crate::dataset::{partition, Category, Dataset, GroupKey};
use crate::error::{Result, StatsError};
use crate::inference::distributions::wilson_interval;
use crate::logging::{truncate_field, DEFAULT_MAX_FIELD_LENGTH};

use super::types::{FrequencyTable, OneWayFrequencyRow};

/// Counts the categories of one column, optionally within outer partitions.
///
/// Every category observed in the summarized rows is reported for every partition,
/// with zero counts where it does not occur, so the distributions of all partitions
/// line up. Percentages and Wilson limits are on the 0-100 scale.
///
/// With [`include_overall`](Self::include_overall) and grouping columns, the
/// ungrouped distribution over all rows is appended after the grouped rows.
#[derive(Debug, Clone)]
pub struct FrequencySummarizer {
    variable: String,
    options: FrequencyOptions,
}

impl FrequencySummarizer {
    /// Creates a summarizer for the given categorical column.
    pub fn new(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            options: FrequencyOptions::default(),
        }
    }

    /// Replaces all options.
    pub fn with_options(mut self, options: FrequencyOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the outer grouping columns.
    pub fn group_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = self.options.with_grouping(columns);
        self
    }

    /// Appends the overall distribution after the grouped rows.
    pub fn include_overall(mut self, include: bool) -> Self {
        self.options = self.options.with_overall(include);
        self
    }

    /// Sets the confidence level.
    pub fn confidence_level(mut self, level: ConfidenceLevel) -> Self {
        self.options = self.options.with_confidence_level(level);
        self
    }

    /// Returns the categorical column.
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Returns the options.
    pub fn options(&self) -> &FrequencyOptions {
        &self.options
    }

    /// Computes the frequency table.
    #[instrument(skip(self, dataset), fields(
        variable = %self.variable,
        grouping = ?self.options.grouping,
        include_overall = self.options.include_overall
    ))]
    pub fn summarize(&self, dataset: &Dataset) -> Result<FrequencyTable> {
        let values = dataset.category_column(&self.variable)?;
        let partitioning = partition(dataset, &self.options.grouping)?;

        let mut groups = partitioning
            .iter()
            .map(|part| (part.key().clone(), part.rows().to_vec()))
            .collect::<Vec<_>>();
        let with_overall = self.options.include_overall && !self.options.grouping.is_empty();
        if with_overall {
            groups.push((GroupKey::overall(), (0..dataset.num_rows()).collect()));
        }

        let categories = groups
            .iter()
            .flat_map(|(_, rows)| rows.iter().filter_map(|&row| values[row].clone()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect::<Vec<_>>();

        if categories.is_empty() {
            return Err(StatsError::empty_partition(format!(
                "no non-missing values of '{}'",
                self.variable
            )));
        }

        debug!(
            categories = %truncate_field(
                &categories.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "),
                DEFAULT_MAX_FIELD_LENGTH,
            ),
            "Observed categories"
        );

        let mut rows = Vec::with_capacity(groups.len() * categories.len());
        for (key, group_rows) in &groups {
            self.summarize_group(key, group_rows, &values, &categories, &mut rows)?;
        }

        debug!(
            partitions = groups.len(),
            rows = rows.len(),
            "Computed frequency distribution"
        );

        Ok(FrequencyTable {
            variable: self.variable.clone(),
            grouping: self.options.grouping.clone(),
            include_overall: with_overall,
            confidence_level: self.options.confidence_level,
            categories,
            rows,
        })
    }

    fn summarize_group(
        &self,
        key: &GroupKey,
        group_rows: &[usize],
        values: &[Option<Category>],
        categories: &[Category],
        out: &mut Vec<OneWayFrequencyRow>,
    ) -> Result<()> {
        let mut counts: BTreeMap<&Category, u64> = BTreeMap::new();
        for value in group_rows.iter().filter_map(|&row| values[row].as_ref()) {
            *counts.entry(value).or_default() += 1;
        }

        let n_total = counts.values().sum::<u64>();
        if n_total == 0 {
            return Err(StatsError::empty_partition(format!(
                "no non-missing values of '{}' in partition {key}",
                self.variable
            )));
        }

        for category in categories {
            let n = counts.get(category).copied().unwrap_or(0);
            let (percent, lower_ci, upper_ci) =
                wilson_interval(n, n_total, self.options.confidence_level)?.to_percent();
            out.push(OneWayFrequencyRow {
                key: key.clone(),
                variable: self.variable.clone(),
                category: category.clone(),
                n,
                n_total,
                percent,
                lower_ci,
                upper_ci,
            });
        }
        Ok(())
    }
}

/// Computes the one-way distribution of `category_column` per partition of
/// `grouping_columns`.
///
/// Shorthand for [`FrequencySummarizer`] at the default 95% level.
pub fn summarize_frequency<S: AsRef<str>>(
    dataset: &Dataset,
    category_column: &str,
    grouping_columns: &[S],
    include_overall: bool,
) -> Result<FrequencyTable> {
    FrequencySummarizer::new(category_column)
        .group_by(grouping_columns.iter().map(|c| c.as_ref().to_string()))
        .include_overall(include_overall)
        .summarize(dataset)
}
