//! Significance tests on frequency tables.
//!
//! - [`test_one_way`]: Pearson chi-square goodness of fit against a uniform
//!   distribution over the table's categories.
//! - [`test_two_way`]: Pearson chi-square test of independence, or Fisher's exact
//!   test for 2x2 tables.
//!
//! Tests consume summarizer results directly. A two-way table already carries its
//! margins, so expected counts are derived from the stored totals.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::dataset::GroupKey;
use crate::error::{Result, StatsError};
use crate::summaries::{CrosstabTable, FrequencyTable};

use super::distributions::{chi_square_upper_tail, fisher_exact_two_sided};

/// Expected cell counts at or below this value make the chi-square approximation
/// unreliable.
pub const SMALL_EXPECTED_COUNT: f64 = 5.0;

/// The statistic a test computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TestStatistic {
    /// Pearson's chi-square statistic.
    #[serde(rename = "chi2_pearson")]
    ChiSquarePearson,
    /// Fisher's exact test (no statistic value, exact p-value).
    #[serde(rename = "fisher_exact")]
    FisherExact,
}

impl TestStatistic {
    /// Returns the statistic's name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TestStatistic::ChiSquarePearson => "chi2_pearson",
            TestStatistic::FisherExact => "fisher_exact",
        }
    }
}

impl fmt::Display for TestStatistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A caveat attached to a test result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TestWarning {
    /// At least one expected cell count is at most [`SMALL_EXPECTED_COUNT`].
    #[serde(rename = "expected cell count <= 5")]
    SmallExpectedCount,
}

impl fmt::Display for TestWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestWarning::SmallExpectedCount => f.write_str("expected cell count <= 5"),
        }
    }
}

/// Statistic, degrees of freedom and p-value of one test.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestOutcome {
    /// Which statistic was computed.
    pub statistic: TestStatistic,
    /// The statistic's value; chi-square only.
    pub statistic_value: Option<f64>,
    /// Degrees of freedom; chi-square only.
    pub degrees_of_freedom: Option<u64>,
    /// The p-value, in [0, 1].
    pub p_value: f64,
    /// Set when the result should be read with caution.
    pub warning: Option<TestWarning>,
}

/// Result of a one-way or two-way significance test.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SignificanceResult {
    /// Goodness of fit of one categorical variable within one partition.
    OneWay {
        variable: String,
        key: GroupKey,
        outcome: TestOutcome,
    },
    /// Independence of two categorical variables.
    TwoWay {
        row_variable: String,
        column_variable: String,
        /// Smallest expected count under independence.
        min_expected: f64,
        outcome: TestOutcome,
    },
}

impl SignificanceResult {
    /// Returns the test outcome.
    pub fn outcome(&self) -> &TestOutcome {
        match self {
            SignificanceResult::OneWay { outcome, .. } => outcome,
            SignificanceResult::TwoWay { outcome, .. } => outcome,
        }
    }

    /// Returns the statistic that was computed.
    pub fn statistic(&self) -> TestStatistic {
        self.outcome().statistic
    }

    /// Returns the p-value.
    pub fn p_value(&self) -> f64 {
        self.outcome().p_value
    }

    /// Returns the warning, if any.
    pub fn warning(&self) -> Option<TestWarning> {
        self.outcome().warning
    }
}

/// How a two-way table is tested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TestMethod {
    /// Pearson chi-square for any table shape.
    #[default]
    Pearson,
    /// Fisher's exact test; 2x2 tables only.
    Fisher,
    /// Pearson, replaced by Fisher's exact test when a 2x2 table has a small
    /// expected count.
    Auto,
}

impl fmt::Display for TestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TestMethod::Pearson => "pearson",
            TestMethod::Fisher => "fisher",
            TestMethod::Auto => "auto",
        };
        f.write_str(name)
    }
}

impl FromStr for TestMethod {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pearson" => Ok(TestMethod::Pearson),
            "fisher" => Ok(TestMethod::Fisher),
            "auto" => Ok(TestMethod::Auto),
            other => Err(StatsError::invalid_input(format!(
                "unknown test method '{other}', expected one of: pearson, fisher, auto"
            ))),
        }
    }
}

/// Tests an ungrouped one-way distribution against a uniform distribution.
///
/// The expected count of each of the `k` categories is `n_total / k`, with `k - 1`
/// degrees of freedom. Fails with `InvalidInput` when the table has fewer than two
/// categories, or when it is grouped; use [`test_one_way_by_group`] for grouped
/// tables.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use arrow::array::{ArrayRef, Int64Array};
/// use term_stats::dataset::Dataset;
/// use term_stats::inference::test_one_way;
/// use term_stats::summaries::FrequencySummarizer;
///
/// let dataset = Dataset::try_from_columns(vec![(
///     "coin",
///     Arc::new(Int64Array::from(vec![0, 1, 0, 1, 1, 0])) as ArrayRef,
/// )])
/// .unwrap();
///
/// let table = FrequencySummarizer::new("coin").summarize(&dataset).unwrap();
/// let result = test_one_way(&table).unwrap();
/// assert!((result.p_value() - 1.0).abs() < 1e-12);
/// ```
#[instrument(skip(table), fields(variable = %table.variable))]
pub fn test_one_way(table: &FrequencyTable) -> Result<SignificanceResult> {
    if table.is_grouped() {
        return Err(StatsError::invalid_input(format!(
            "one-way test of '{}' needs an ungrouped table; use test_one_way_by_group for tables grouped by {:?}",
            table.variable, table.grouping
        )));
    }
    let key = GroupKey::overall();
    let counts = table.rows_for(&key).map(|row| row.n).collect::<Vec<_>>();
    one_way(&table.variable, key, &counts)
}

/// Tests the one-way distribution within each partition of a grouped table.
///
/// Results follow the table's partition order, including the appended overall
/// partition when present. Categories absent from a partition count as zero cells.
#[instrument(skip(table), fields(variable = %table.variable, grouping = ?table.grouping))]
pub fn test_one_way_by_group(table: &FrequencyTable) -> Result<Vec<SignificanceResult>> {
    table
        .group_keys()
        .into_iter()
        .map(|key| {
            let counts = table.rows_for(key).map(|row| row.n).collect::<Vec<_>>();
            one_way(&table.variable, key.clone(), &counts)
        })
        .collect()
}

fn one_way(variable: &str, key: GroupKey, counts: &[u64]) -> Result<SignificanceResult> {
    let k = counts.len();
    if k < 2 {
        return Err(StatsError::invalid_input(format!(
            "one-way test of '{variable}' needs at least 2 categories, got {k}"
        )));
    }
    let n_total = counts.iter().sum::<u64>();
    if n_total == 0 {
        return Err(StatsError::empty_partition(format!(
            "no observations of '{variable}' in partition {key}"
        )));
    }

    let expected = n_total as f64 / k as f64;
    let statistic = counts
        .iter()
        .map(|&n| (n as f64 - expected).powi(2) / expected)
        .sum::<f64>();
    let degrees_of_freedom = (k - 1) as u64;
    let p_value = chi_square_upper_tail(statistic, degrees_of_freedom as f64)?;

    debug!(%key, statistic, degrees_of_freedom, p_value, "One-way chi-square test");

    Ok(SignificanceResult::OneWay {
        variable: variable.to_string(),
        key,
        outcome: TestOutcome {
            statistic: TestStatistic::ChiSquarePearson,
            statistic_value: Some(statistic),
            degrees_of_freedom: Some(degrees_of_freedom),
            p_value,
            warning: None,
        },
    })
}

/// Tests independence of the row and column variables of a two-way table.
///
/// Expected counts are `row_total * column_total / grand_total`. Pearson results
/// whose smallest expected count is at most 5 carry
/// [`TestWarning::SmallExpectedCount`]. Fails with `UnsupportedShape` when
/// Fisher's exact test is requested for a table that is not 2x2, including tables
/// with a single row or column. Other methods fail with `InvalidInput` when either
/// dimension has fewer than two categories.
#[instrument(skip(table), fields(
    row = %table.row_variable,
    column = %table.column_variable,
    method = %method
))]
pub fn test_two_way(table: &CrosstabTable, method: TestMethod) -> Result<SignificanceResult> {
    let (rows, columns) = table.shape();
    if method == TestMethod::Fisher && (rows, columns) != (2, 2) {
        return Err(unsupported_shape(rows, columns));
    }
    if rows < 2 || columns < 2 {
        return Err(StatsError::invalid_input(format!(
            "two-way test of '{}' by '{}' needs at least 2 categories per variable, got {rows}x{columns}",
            table.row_variable, table.column_variable
        )));
    }

    let counts = table.counts();
    let grand_total = table.grand_total as f64;
    let expected = table
        .row_totals
        .iter()
        .map(|&row_total| {
            table
                .column_totals
                .iter()
                .map(|&column_total| row_total as f64 * column_total as f64 / grand_total)
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    let min_expected = expected
        .iter()
        .flatten()
        .copied()
        .fold(f64::INFINITY, f64::min);

    let outcome = match method {
        TestMethod::Pearson => pearson(table, &counts, &expected, min_expected)?,
        TestMethod::Fisher => fisher(&counts)?,
        TestMethod::Auto => {
            let outcome = pearson(table, &counts, &expected, min_expected)?;
            if outcome.warning.is_some() && (rows, columns) == (2, 2) {
                debug!("Small expected count in 2x2 table, using Fisher's exact test");
                fisher(&counts)?
            } else {
                outcome
            }
        }
    };

    Ok(SignificanceResult::TwoWay {
        row_variable: table.row_variable.clone(),
        column_variable: table.column_variable.clone(),
        min_expected,
        outcome,
    })
}

fn pearson(
    table: &CrosstabTable,
    counts: &[Vec<u64>],
    expected: &[Vec<f64>],
    min_expected: f64,
) -> Result<TestOutcome> {
    let statistic = counts
        .iter()
        .flatten()
        .zip(expected.iter().flatten())
        .map(|(&observed, &expected)| (observed as f64 - expected).powi(2) / expected)
        .sum::<f64>();
    let (rows, columns) = table.shape();
    let degrees_of_freedom = ((rows - 1) * (columns - 1)) as u64;
    let p_value = chi_square_upper_tail(statistic, degrees_of_freedom as f64)?;

    let warning = if min_expected <= SMALL_EXPECTED_COUNT {
        warn!(
            row = %table.row_variable,
            column = %table.column_variable,
            min_expected,
            "Chi-square approximation may be unreliable: expected cell count <= 5"
        );
        Some(TestWarning::SmallExpectedCount)
    } else {
        None
    };

    debug!(statistic, degrees_of_freedom, p_value, "Pearson chi-square test");

    Ok(TestOutcome {
        statistic: TestStatistic::ChiSquarePearson,
        statistic_value: Some(statistic),
        degrees_of_freedom: Some(degrees_of_freedom),
        p_value,
        warning,
    })
}

fn fisher(counts: &[Vec<u64>]) -> Result<TestOutcome> {
    let shape_error = || unsupported_shape(counts.len(), counts.first().map_or(0, Vec::len));
    let cells = match counts {
        [first, second] => match (first.as_slice(), second.as_slice()) {
            ([a, b], [c, d]) => [[*a, *b], [*c, *d]],
            _ => return Err(shape_error()),
        },
        _ => return Err(shape_error()),
    };

    let p_value = fisher_exact_two_sided(cells);
    debug!(p_value, "Fisher's exact test");

    Ok(TestOutcome {
        statistic: TestStatistic::FisherExact,
        statistic_value: None,
        degrees_of_freedom: None,
        p_value,
        warning: None,
    })
}

fn unsupported_shape(rows: usize, columns: usize) -> StatsError {
    StatsError::UnsupportedShape {
        test: "Fisher's exact test".to_string(),
        rows,
        columns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfidenceLevel;
    use crate::dataset::Category;
    use crate::summaries::types::OneWayFrequencyRow;

    fn crosstab(counts: &[&[u64]]) -> CrosstabTable {
        let rows = counts.len();
        let columns = counts[0].len();
        let row_totals = counts
            .iter()
            .map(|row| row.iter().sum::<u64>())
            .collect::<Vec<_>>();
        let column_totals = (0..columns)
            .map(|j| counts.iter().map(|row| row[j]).sum::<u64>())
            .collect::<Vec<_>>();
        let grand_total = row_totals.iter().sum::<u64>();

        let mut cells = Vec::new();
        for (i, row) in counts.iter().enumerate() {
            for (j, &n) in row.iter().enumerate() {
                cells.push(crate::summaries::TwoWayFrequencyCell {
                    row_variable: "r".to_string(),
                    row_category: Category::Integer(i as i64),
                    column_variable: "c".to_string(),
                    column_category: Category::Integer(j as i64),
                    n,
                    n_row_total: row_totals[i],
                    n_col_total: column_totals[j],
                    n_grand_total: grand_total,
                    percent_row: 100.0 * n as f64 / row_totals[i] as f64,
                    lower_ci_row: 0.0,
                    upper_ci_row: 100.0,
                    percent_col: None,
                    lower_ci_col: None,
                    upper_ci_col: None,
                    percent_total: None,
                    lower_ci_total: None,
                    upper_ci_total: None,
                });
            }
        }

        CrosstabTable {
            row_variable: "r".to_string(),
            column_variable: "c".to_string(),
            include_overall_percent: false,
            confidence_level: ConfidenceLevel::default(),
            row_categories: (0..rows as i64).map(Category::Integer).collect(),
            column_categories: (0..columns as i64).map(Category::Integer).collect(),
            row_totals,
            column_totals,
            grand_total,
            cells,
        }
    }

    fn frequency(groups: &[(GroupKey, &[u64])]) -> FrequencyTable {
        let mut rows = Vec::new();
        for (key, counts) in groups {
            let n_total = counts.iter().sum::<u64>();
            for (i, &n) in counts.iter().enumerate() {
                rows.push(OneWayFrequencyRow {
                    key: key.clone(),
                    variable: "v".to_string(),
                    category: Category::Integer(i as i64),
                    n,
                    n_total,
                    percent: 100.0 * n as f64 / n_total as f64,
                    lower_ci: 0.0,
                    upper_ci: 100.0,
                });
            }
        }
        let grouping = groups
            .first()
            .map(|(key, _)| key.entries().iter().map(|(c, _)| c.clone()).collect())
            .unwrap_or_default();
        FrequencyTable {
            variable: "v".to_string(),
            grouping,
            include_overall: false,
            confidence_level: ConfidenceLevel::default(),
            categories: (0..groups[0].1.len() as i64).map(Category::Integer).collect(),
            rows,
        }
    }

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() < tolerance,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_one_way_uniform_split() {
        let table = frequency(&[(GroupKey::overall(), &[16, 16])]);
        let result = test_one_way(&table).unwrap();
        let outcome = result.outcome();
        assert_eq!(outcome.statistic, TestStatistic::ChiSquarePearson);
        assert_eq!(outcome.statistic_value, Some(0.0));
        assert_eq!(outcome.degrees_of_freedom, Some(1));
        assert_close(outcome.p_value, 1.0, 1e-12);
        assert!(outcome.warning.is_none());
    }

    #[test]
    fn test_one_way_known_value() {
        let table = frequency(&[(GroupKey::overall(), &[19, 13])]);
        let result = test_one_way(&table).unwrap();
        assert_close(result.outcome().statistic_value.unwrap(), 1.125, 1e-12);
        assert_close(result.p_value(), 0.288_844, 1e-5);
    }

    #[test]
    fn test_one_way_requires_two_categories() {
        let table = frequency(&[(GroupKey::overall(), &[32])]);
        let err = test_one_way(&table).unwrap_err();
        assert!(matches!(err, StatsError::InvalidInput(_)));
    }

    #[test]
    fn test_one_way_rejects_grouped_table() {
        let table = frequency(&[
            (GroupKey::new([("g", Category::Integer(1))]), &[5, 5]),
            (GroupKey::new([("g", Category::Integer(2))]), &[9, 1]),
        ]);
        let err = test_one_way(&table).unwrap_err();
        assert!(err.to_string().contains("test_one_way_by_group"));

        let results = test_one_way_by_group(&table).unwrap();
        assert_eq!(results.len(), 2);
        assert_close(results[0].p_value(), 1.0, 1e-12);
        assert!(results[1].p_value() < 0.05);
        match &results[1] {
            SignificanceResult::OneWay { key, .. } => {
                assert_eq!(key.get("g"), Some(&Category::Integer(2)))
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_two_way_pearson_known_value() {
        // mtcars am x cyl
        let table = crosstab(&[&[3, 4, 12], &[8, 3, 2]]);
        let result = test_two_way(&table, TestMethod::Pearson).unwrap();
        let outcome = result.outcome();
        assert_close(outcome.statistic_value.unwrap(), 8.740_733, 1e-5);
        assert_eq!(outcome.degrees_of_freedom, Some(2));
        assert_close(outcome.p_value, 0.012_646_6, 1e-6);
        assert_eq!(outcome.warning, Some(TestWarning::SmallExpectedCount));

        match result {
            SignificanceResult::TwoWay { min_expected, .. } => {
                assert_close(min_expected, 2.843_75, 1e-12)
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_two_way_without_small_counts_has_no_warning() {
        let table = crosstab(&[&[30, 10], &[10, 30]]);
        let result = test_two_way(&table, TestMethod::Pearson).unwrap();
        assert!(result.warning().is_none());
        assert!(result.p_value() < 0.001);
    }

    #[test]
    fn test_expected_count_of_exactly_five_is_flagged() {
        let table = crosstab(&[&[5, 5], &[5, 5]]);
        let result = test_two_way(&table, TestMethod::Pearson).unwrap();
        assert_eq!(result.warning(), Some(TestWarning::SmallExpectedCount));
        assert_eq!(result.outcome().statistic_value, Some(0.0));
        match result {
            SignificanceResult::TwoWay { min_expected, .. } => assert_eq!(min_expected, 5.0),
            other => panic!("unexpected result {other:?}"),
        }

        let table = crosstab(&[&[6, 6], &[6, 6]]);
        let result = test_two_way(&table, TestMethod::Pearson).unwrap();
        assert!(result.warning().is_none());
    }

    #[test]
    fn test_two_way_fisher() {
        let table = crosstab(&[&[12, 7], &[6, 7]]);
        let result = test_two_way(&table, TestMethod::Fisher).unwrap();
        let outcome = result.outcome();
        assert_eq!(outcome.statistic, TestStatistic::FisherExact);
        assert!(outcome.statistic_value.is_none());
        assert!(outcome.degrees_of_freedom.is_none());
        assert!(outcome.warning.is_none());
        assert_close(outcome.p_value, 0.472_697_4, 1e-6);
    }

    #[test]
    fn test_fisher_rejects_larger_tables() {
        let table = crosstab(&[&[3, 4, 12], &[8, 3, 2]]);
        let err = test_two_way(&table, TestMethod::Fisher).unwrap_err();
        assert!(matches!(
            err,
            StatsError::UnsupportedShape {
                rows: 2,
                columns: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_fisher_on_single_row_is_a_shape_error() {
        let table = crosstab(&[&[3, 4]]);
        let err = test_two_way(&table, TestMethod::Fisher).unwrap_err();
        assert!(matches!(
            err,
            StatsError::UnsupportedShape {
                rows: 1,
                columns: 2,
                ..
            }
        ));

        let err = test_two_way(&table, TestMethod::Pearson).unwrap_err();
        assert!(matches!(err, StatsError::InvalidInput(_)));
    }

    #[test]
    fn test_auto_switches_to_fisher_for_small_2x2() {
        let table = crosstab(&[&[3, 1], &[1, 3]]);
        let result = test_two_way(&table, TestMethod::Auto).unwrap();
        assert_eq!(result.statistic(), TestStatistic::FisherExact);
        assert_close(result.p_value(), 0.485_714_3, 1e-6);

        // larger tables keep the flagged Pearson result
        let table = crosstab(&[&[3, 4, 12], &[8, 3, 2]]);
        let result = test_two_way(&table, TestMethod::Auto).unwrap();
        assert_eq!(result.statistic(), TestStatistic::ChiSquarePearson);
        assert!(result.warning().is_some());
    }

    #[test]
    fn test_two_way_requires_two_categories_per_variable() {
        let table = crosstab(&[&[3, 4, 12]]);
        let err = test_two_way(&table, TestMethod::Pearson).unwrap_err();
        assert!(matches!(err, StatsError::InvalidInput(_)));
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("pearson".parse::<TestMethod>().unwrap(), TestMethod::Pearson);
        assert_eq!(" Fisher ".parse::<TestMethod>().unwrap(), TestMethod::Fisher);
        assert_eq!(TestMethod::Auto.to_string(), "auto");
        assert!("exact".parse::<TestMethod>().is_err());
        assert_eq!(TestMethod::default(), TestMethod::Pearson);
    }

    #[test]
    fn test_result_serialization() {
        let table = crosstab(&[&[3, 1], &[1, 3]]);
        let result = test_two_way(&table, TestMethod::Pearson).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["kind"], "two_way");
        assert_eq!(json["outcome"]["statistic"], "chi2_pearson");
        assert_eq!(json["outcome"]["warning"], "expected cell count <= 5");
    }
}
