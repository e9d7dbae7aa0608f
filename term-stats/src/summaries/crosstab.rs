//! Two-way frequency tables with row, column and total percentages.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, instrument};

use crate::config::{ConfidenceLevel, CrosstabOptions};
use crate::dataset::{Category, Dataset};
use crate::error::{Result, StatsError};
use crate::inference::distributions::wilson_interval;
use crate::logging::{truncate_field, DEFAULT_MAX_FIELD_LENGTH};

use super::types::{CrosstabTable, TwoWayFrequencyCell};

/// Cross-tabulates two categorical columns.
///
/// Only rows where both values are present are counted. The table covers the full
/// cross product of observed row and column categories; absent combinations are
/// zero cells. Row percentages are always computed; column and table-total
/// percentages only when [`include_overall_percent`](Self::include_overall_percent)
/// is set.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use arrow::array::{ArrayRef, StringArray};
/// use term_stats::dataset::Category;
/// use term_stats::dataset::Dataset;
/// use term_stats::summaries::CrosstabSummarizer;
///
/// let dataset = Dataset::try_from_columns(vec![
///     ("smoker", Arc::new(StringArray::from(vec!["yes", "yes", "no", "no"])) as ArrayRef),
///     ("sick", Arc::new(StringArray::from(vec!["yes", "no", "no", "no"])) as ArrayRef),
/// ])
/// .unwrap();
///
/// let table = CrosstabSummarizer::new("smoker", "sick").summarize(&dataset).unwrap();
/// assert_eq!(table.counts(), vec![vec![2, 0], vec![1, 1]]);
/// let cell = table.cell(&Category::from("yes"), &Category::from("yes")).unwrap();
/// assert_eq!(cell.percent_row, 50.0);
/// assert!(cell.percent_total.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct CrosstabSummarizer {
    row_variable: String,
    column_variable: String,
    options: CrosstabOptions,
}

impl CrosstabSummarizer {
    /// Creates a summarizer for a row and a column variable.
    pub fn new(row_variable: impl Into<String>, column_variable: impl Into<String>) -> Self {
        Self {
            row_variable: row_variable.into(),
            column_variable: column_variable.into(),
            options: CrosstabOptions::default(),
        }
    }

    /// Replaces all options.
    pub fn with_options(mut self, options: CrosstabOptions) -> Self {
        self.options = options;
        self
    }

    /// Also computes column and table-total percentages.
    pub fn include_overall_percent(mut self, include: bool) -> Self {
        self.options = self.options.with_overall_percent(include);
        self
    }

    /// Sets the confidence level.
    pub fn confidence_level(mut self, level: ConfidenceLevel) -> Self {
        self.options = self.options.with_confidence_level(level);
        self
    }

    /// Returns the options.
    pub fn options(&self) -> &CrosstabOptions {
        &self.options
    }

    /// Computes the two-way table.
    #[instrument(skip(self, dataset), fields(
        row = %self.row_variable,
        column = %self.column_variable,
        include_overall_percent = self.options.include_overall_percent
    ))]
    pub fn summarize(&self, dataset: &Dataset) -> Result<CrosstabTable> {
        let row_values = dataset.category_column(&self.row_variable)?;
        let column_values = dataset.category_column(&self.column_variable)?;

        let pairs = row_values
            .iter()
            .zip(&column_values)
            .filter_map(|(row, column)| Some((row.as_ref()?, column.as_ref()?)))
            .collect::<Vec<_>>();

        if pairs.is_empty() {
            return Err(StatsError::empty_partition(format!(
                "no rows with both '{}' and '{}' present",
                self.row_variable, self.column_variable
            )));
        }

        let row_categories = sorted_distinct(pairs.iter().map(|(row, _)| *row));
        let column_categories = sorted_distinct(pairs.iter().map(|(_, column)| *column));
        let row_index = index_of(&row_categories);
        let column_index = index_of(&column_categories);

        let mut counts = vec![vec![0u64; column_categories.len()]; row_categories.len()];
        for (row, column) in &pairs {
            counts[row_index[*row]][column_index[*column]] += 1;
        }

        let row_totals = counts
            .iter()
            .map(|row| row.iter().sum::<u64>())
            .collect::<Vec<_>>();
        let column_totals = (0..column_categories.len())
            .map(|j| counts.iter().map(|row| row[j]).sum::<u64>())
            .collect::<Vec<_>>();
        let grand_total = pairs.len() as u64;

        debug!(
            rows = %truncate_field(&join(&row_categories), DEFAULT_MAX_FIELD_LENGTH),
            columns = %truncate_field(&join(&column_categories), DEFAULT_MAX_FIELD_LENGTH),
            excluded = row_values.len() - pairs.len(),
            "Cross-tabulated categories"
        );

        let level = self.options.confidence_level;
        let mut cells = Vec::with_capacity(row_categories.len() * column_categories.len());
        for (i, row_category) in row_categories.iter().enumerate() {
            for (j, column_category) in column_categories.iter().enumerate() {
                let n = counts[i][j];
                let (percent_row, lower_ci_row, upper_ci_row) =
                    wilson_interval(n, row_totals[i], level)?.to_percent();

                let (column_percent, total_percent) = if self.options.include_overall_percent {
                    (
                        Some(wilson_interval(n, column_totals[j], level)?.to_percent()),
                        Some(wilson_interval(n, grand_total, level)?.to_percent()),
                    )
                } else {
                    (None, None)
                };

                cells.push(TwoWayFrequencyCell {
                    row_variable: self.row_variable.clone(),
                    row_category: row_category.clone(),
                    column_variable: self.column_variable.clone(),
                    column_category: column_category.clone(),
                    n,
                    n_row_total: row_totals[i],
                    n_col_total: column_totals[j],
                    n_grand_total: grand_total,
                    percent_row,
                    lower_ci_row,
                    upper_ci_row,
                    percent_col: column_percent.map(|(p, _, _)| p),
                    lower_ci_col: column_percent.map(|(_, l, _)| l),
                    upper_ci_col: column_percent.map(|(_, _, u)| u),
                    percent_total: total_percent.map(|(p, _, _)| p),
                    lower_ci_total: total_percent.map(|(_, l, _)| l),
                    upper_ci_total: total_percent.map(|(_, _, u)| u),
                });
            }
        }

        Ok(CrosstabTable {
            row_variable: self.row_variable.clone(),
            column_variable: self.column_variable.clone(),
            include_overall_percent: self.options.include_overall_percent,
            confidence_level: level,
            row_categories,
            column_categories,
            row_totals,
            column_totals,
            grand_total,
            cells,
        })
    }
}

fn sorted_distinct<'a>(values: impl Iterator<Item = &'a Category>) -> Vec<Category> {
    values
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn index_of(categories: &[Category]) -> BTreeMap<&Category, usize> {
    categories
        .iter()
        .enumerate()
        .map(|(i, category)| (category, i))
        .collect()
}

fn join(categories: &[Category]) -> String {
    categories
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Cross-tabulates `row_column` against `column_column` at the default 95% level.
///
/// Shorthand for [`CrosstabSummarizer`].
pub fn summarize_crosstab(
    dataset: &Dataset,
    row_column: &str,
    column_column: &str,
    include_overall_percent: bool,
) -> Result<CrosstabTable> {
    CrosstabSummarizer::new(row_column, column_column)
        .include_overall_percent(include_overall_percent)
        .summarize(dataset)
}
