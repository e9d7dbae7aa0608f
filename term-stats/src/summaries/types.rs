//! Result types produced by the summarizers.
//!
//! Values are raw `f64`/`u64` statistics. Rounding and string rendering belong to
//! [`crate::formatters`].

use serde::Serialize;

use crate::config::ConfidenceLevel;
use crate::dataset::{Category, GroupKey};

/// Mean, spread and t-based confidence interval of a numeric variable in one partition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContinuousSummary {
    /// The partition this summary describes.
    pub key: GroupKey,
    /// Number of non-missing response values.
    pub n: u64,
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator); 0 when n == 1.
    pub std_dev: f64,
    /// Standard error of the mean.
    pub standard_error: f64,
    /// Lower confidence limit.
    pub lower_ci: f64,
    /// Upper confidence limit.
    pub upper_ci: f64,
    /// Smallest value.
    pub min: f64,
    /// Largest value.
    pub max: f64,
}

/// Mean summaries of one response variable, one row per partition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeanTable {
    /// The response column.
    pub variable: String,
    /// The grouping columns, outermost first.
    pub grouping: Vec<String>,
    /// Confidence level of the intervals.
    pub confidence_level: ConfidenceLevel,
    /// One summary per partition, in partition order.
    pub rows: Vec<ContinuousSummary>,
}

impl MeanTable {
    /// Returns true if the table was computed with grouping columns.
    pub fn is_grouped(&self) -> bool {
        !self.grouping.is_empty()
    }

    /// Returns the summary for a group key.
    pub fn get(&self, key: &GroupKey) -> Option<&ContinuousSummary> {
        self.rows.iter().find(|row| &row.key == key)
    }
}

/// Count and percentage of one category within one partition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OneWayFrequencyRow {
    /// The outer partition; overall when ungrouped.
    pub key: GroupKey,
    /// The categorical column.
    pub variable: String,
    /// The category value.
    pub category: Category,
    /// Rows with this category in the partition.
    pub n: u64,
    /// Rows with a non-missing category in the partition.
    pub n_total: u64,
    /// `100 * n / n_total`.
    pub percent: f64,
    /// Lower Wilson limit, in percent.
    pub lower_ci: f64,
    /// Upper Wilson limit, in percent.
    pub upper_ci: f64,
}

/// One-way frequency distribution, optionally per outer partition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyTable {
    /// The categorical column.
    pub variable: String,
    /// The outer grouping columns.
    pub grouping: Vec<String>,
    /// Whether overall rows were appended after the grouped rows.
    pub include_overall: bool,
    /// Confidence level of the intervals.
    pub confidence_level: ConfidenceLevel,
    /// Every category observed in the data, sorted.
    pub categories: Vec<Category>,
    /// Rows ordered by group key, then category.
    pub rows: Vec<OneWayFrequencyRow>,
}

impl FrequencyTable {
    /// Returns true if the table was computed with outer grouping columns.
    pub fn is_grouped(&self) -> bool {
        !self.grouping.is_empty()
    }

    /// Returns the distinct group keys in row order.
    pub fn group_keys(&self) -> Vec<&GroupKey> {
        let mut keys: Vec<&GroupKey> = Vec::new();
        for row in &self.rows {
            if keys.last() != Some(&&row.key) {
                keys.push(&row.key);
            }
        }
        keys
    }

    /// Returns the rows belonging to a group key.
    pub fn rows_for<'a>(
        &'a self,
        key: &'a GroupKey,
    ) -> impl Iterator<Item = &'a OneWayFrequencyRow> + 'a {
        self.rows.iter().filter(move |row| &row.key == key)
    }

    /// Returns the row for a group key and category.
    pub fn get(&self, key: &GroupKey, category: &Category) -> Option<&OneWayFrequencyRow> {
        self.rows
            .iter()
            .find(|row| &row.key == key && &row.category == category)
    }
}

/// One cell of a two-way frequency table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TwoWayFrequencyCell {
    /// The row variable.
    pub row_variable: String,
    /// The row category.
    pub row_category: Category,
    /// The column variable.
    pub column_variable: String,
    /// The column category.
    pub column_category: Category,
    /// Joint count.
    pub n: u64,
    /// Count of the row category.
    pub n_row_total: u64,
    /// Count of the column category.
    pub n_col_total: u64,
    /// Count of the whole table.
    pub n_grand_total: u64,
    /// `100 * n / n_row_total`.
    pub percent_row: f64,
    /// Lower Wilson limit of the row percentage.
    pub lower_ci_row: f64,
    /// Upper Wilson limit of the row percentage.
    pub upper_ci_row: f64,
    /// `100 * n / n_col_total`, when overall percentages were requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_col: Option<f64>,
    /// Lower Wilson limit of the column percentage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower_ci_col: Option<f64>,
    /// Upper Wilson limit of the column percentage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper_ci_col: Option<f64>,
    /// `100 * n / n_grand_total`, when overall percentages were requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_total: Option<f64>,
    /// Lower Wilson limit of the table percentage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower_ci_total: Option<f64>,
    /// Upper Wilson limit of the table percentage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper_ci_total: Option<f64>,
}

/// Two-way frequency table with its margins.
///
/// Cells are stored row category outer, column category inner, so
/// `cells[i * column_categories.len() + j]` is the cell of row `i` and column `j`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrosstabTable {
    /// The row variable.
    pub row_variable: String,
    /// The column variable.
    pub column_variable: String,
    /// Whether column and total percentages were computed.
    pub include_overall_percent: bool,
    /// Confidence level of the intervals.
    pub confidence_level: ConfidenceLevel,
    /// Row categories, sorted.
    pub row_categories: Vec<Category>,
    /// Column categories, sorted.
    pub column_categories: Vec<Category>,
    /// Count per row category.
    pub row_totals: Vec<u64>,
    /// Count per column category.
    pub column_totals: Vec<u64>,
    /// Count of the whole table.
    pub grand_total: u64,
    /// All cells of the cross product, zero-filled.
    pub cells: Vec<TwoWayFrequencyCell>,
}

impl CrosstabTable {
    /// Returns `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.row_categories.len(), self.column_categories.len())
    }

    /// Returns the observed counts as a row-major matrix.
    pub fn counts(&self) -> Vec<Vec<u64>> {
        let columns = self.column_categories.len().max(1);
        self.cells
            .chunks(columns)
            .map(|row| row.iter().map(|cell| cell.n).collect())
            .collect()
    }

    /// Returns the cell for a row and column category.
    pub fn cell(&self, row: &Category, column: &Category) -> Option<&TwoWayFrequencyCell> {
        self.cells
            .iter()
            .find(|cell| &cell.row_category == row && &cell.column_category == column)
    }

    /// Returns the cells of one row category.
    pub fn row(&self, row: &Category) -> impl Iterator<Item = &TwoWayFrequencyCell> + '_ {
        let row = row.clone();
        self.cells
            .iter()
            .filter(move |cell| cell.row_category == row)
    }
}

/// Any summary result.
///
/// Consumers such as the formatter match on this closed set exhaustively.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "table", rename_all = "snake_case")]
pub enum SummaryTable {
    /// Ungrouped mean summary.
    Mean(MeanTable),
    /// Mean summary per partition.
    GroupedMean(MeanTable),
    /// One-way frequency distribution.
    Frequency(FrequencyTable),
    /// Two-way frequency distribution.
    Crosstab(CrosstabTable),
}

impl SummaryTable {
    /// Returns a short name for the result kind.
    pub fn kind(&self) -> &'static str {
        match self {
            SummaryTable::Mean(_) => "mean",
            SummaryTable::GroupedMean(_) => "grouped mean",
            SummaryTable::Frequency(_) => "one-way frequency",
            SummaryTable::Crosstab(_) => "two-way frequency",
        }
    }
}

impl From<MeanTable> for SummaryTable {
    fn from(table: MeanTable) -> Self {
        if table.is_grouped() {
            SummaryTable::GroupedMean(table)
        } else {
            SummaryTable::Mean(table)
        }
    }
}

impl From<FrequencyTable> for SummaryTable {
    fn from(table: FrequencyTable) -> Self {
        SummaryTable::Frequency(table)
    }
}

impl From<CrosstabTable> for SummaryTable {
    fn from(table: CrosstabTable) -> Self {
        SummaryTable::Crosstab(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frequency_row(key: GroupKey, category: i64, n: u64, n_total: u64) -> OneWayFrequencyRow {
        OneWayFrequencyRow {
            key,
            variable: "am".to_string(),
            category: Category::Integer(category),
            n,
            n_total,
            percent: 100.0 * n as f64 / n_total as f64,
            lower_ci: 0.0,
            upper_ci: 100.0,
        }
    }

    #[test]
    fn test_frequency_group_keys_preserve_order() {
        let four = GroupKey::new([("cyl", Category::Integer(4))]);
        let six = GroupKey::new([("cyl", Category::Integer(6))]);
        let table = FrequencyTable {
            variable: "am".to_string(),
            grouping: vec!["cyl".to_string()],
            include_overall: false,
            confidence_level: ConfidenceLevel::default(),
            categories: vec![Category::Integer(0), Category::Integer(1)],
            rows: vec![
                frequency_row(four.clone(), 0, 3, 11),
                frequency_row(four.clone(), 1, 8, 11),
                frequency_row(six.clone(), 0, 4, 7),
                frequency_row(six.clone(), 1, 3, 7),
            ],
        };

        assert!(table.is_grouped());
        assert_eq!(table.group_keys(), vec![&four, &six]);
        assert_eq!(table.rows_for(&six).count(), 2);
        assert_eq!(table.get(&four, &Category::Integer(1)).unwrap().n, 8);
        assert!(table.get(&four, &Category::Integer(2)).is_none());
    }

    #[test]
    fn test_mean_table_kind() {
        let table = MeanTable {
            variable: "mpg".to_string(),
            grouping: vec![],
            confidence_level: ConfidenceLevel::default(),
            rows: vec![],
        };
        assert_eq!(SummaryTable::from(table.clone()).kind(), "mean");

        let grouped = MeanTable {
            grouping: vec!["cyl".to_string()],
            ..table
        };
        assert_eq!(SummaryTable::from(grouped).kind(), "grouped mean");
    }
}
