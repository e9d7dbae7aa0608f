//! Presentation formatting for summary tables.
//!
//! Summarizers return raw statistics. This module turns them into display strings
//! such as `"26.66 (23.63 - 29.69)"` or `"19 (59.38)"` and lays them out as
//! [`FormattedTable`]s that render as plain text, Markdown or JSON.
//!
//! Numbers are rounded half away from zero to a fixed number of digits. Counts get
//! thousands separators.
//!
//! # Examples
//!
//! ```rust
//! use term_stats::formatters::{format_estimate, format_count, round_half_away_from_zero};
//!
//! assert_eq!(round_half_away_from_zero(2.5, 0), 3.0);
//! assert_eq!(round_half_away_from_zero(-2.5, 0), -3.0);
//! assert_eq!(format_estimate(24.0, 21.0, 27.0, 2), "24.00 (21.00 - 27.00)");
//! assert_eq!(format_count(1234567, true), "1,234,567");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ConfidenceLevel;
use crate::dataset::GroupKey;
use crate::error::{Result, StatsError};
use crate::inference::SignificanceResult;
use crate::summaries::{CrosstabTable, FrequencyTable, MeanTable, SummaryTable};

/// Which statistics a formatted cell shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatsSelector {
    /// `"<mean> (<lcl> - <ucl>)"` for mean summaries.
    #[serde(rename = "mean and ci")]
    MeanAndCi,
    /// `"<n> (<mean>)"` for mean summaries.
    #[serde(rename = "n and mean")]
    NAndMean,
    /// `"<percent> (<lcl> - <ucl>)"`; for two-way tables, the table-total percentage.
    #[serde(rename = "percent and ci")]
    PercentAndCi,
    /// `"<n> (<percent>)"`; for two-way tables, the table-total percentage.
    #[serde(rename = "n and percent")]
    NAndPercent,
    /// `"<row percent> (<lcl> - <ucl>)"` for two-way tables.
    #[serde(rename = "row percent and ci")]
    RowPercentAndCi,
    /// `"<n> (<row percent>)"` for two-way tables.
    #[serde(rename = "n and row percent")]
    NAndRowPercent,
}

impl StatsSelector {
    /// Returns the selector's name.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatsSelector::MeanAndCi => "mean and ci",
            StatsSelector::NAndMean => "n and mean",
            StatsSelector::PercentAndCi => "percent and ci",
            StatsSelector::NAndPercent => "n and percent",
            StatsSelector::RowPercentAndCi => "row percent and ci",
            StatsSelector::NAndRowPercent => "n and row percent",
        }
    }

    /// Returns the selectors that apply to a result kind, default first.
    pub fn valid_for(table: &SummaryTable) -> &'static [StatsSelector] {
        const MEAN: &[StatsSelector] = &[StatsSelector::MeanAndCi, StatsSelector::NAndMean];
        const ONE_WAY: &[StatsSelector] = &[StatsSelector::PercentAndCi, StatsSelector::NAndPercent];
        const TWO_WAY: &[StatsSelector] = &[
            StatsSelector::RowPercentAndCi,
            StatsSelector::NAndRowPercent,
            StatsSelector::PercentAndCi,
            StatsSelector::NAndPercent,
        ];

        match table {
            SummaryTable::Mean(_) | SummaryTable::GroupedMean(_) => MEAN,
            SummaryTable::Frequency(_) => ONE_WAY,
            SummaryTable::Crosstab(_) => TWO_WAY,
        }
    }

    /// Returns the default selector for a result kind.
    pub fn default_for(table: &SummaryTable) -> StatsSelector {
        Self::valid_for(table)[0]
    }

    fn shows_interval(&self) -> bool {
        matches!(
            self,
            StatsSelector::MeanAndCi | StatsSelector::PercentAndCi | StatsSelector::RowPercentAndCi
        )
    }

    fn column_label(&self, level: ConfidenceLevel) -> String {
        let ci = format!("{} CI", format_level(level));
        match self {
            StatsSelector::MeanAndCi => format!("Mean ({ci})"),
            StatsSelector::NAndMean => "N (Mean)".to_string(),
            StatsSelector::PercentAndCi => format!("% ({ci})"),
            StatsSelector::NAndPercent => "N (%)".to_string(),
            StatsSelector::RowPercentAndCi => format!("Row % ({ci})"),
            StatsSelector::NAndRowPercent => "N (Row %)".to_string(),
        }
    }
}

impl fmt::Display for StatsSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatsSelector {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ");
        match normalized.to_ascii_lowercase().as_str() {
            "mean and ci" => Ok(StatsSelector::MeanAndCi),
            "n and mean" => Ok(StatsSelector::NAndMean),
            "percent and ci" => Ok(StatsSelector::PercentAndCi),
            "n and percent" => Ok(StatsSelector::NAndPercent),
            "row percent and ci" => Ok(StatsSelector::RowPercentAndCi),
            "n and row percent" => Ok(StatsSelector::NAndRowPercent),
            _ => Err(StatsError::invalid_input(format!(
                "unknown stats selector '{s}'"
            ))),
        }
    }
}

/// Configuration options for formatting summary tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterConfig {
    /// Digits after the decimal point for estimates and limits
    pub digits: usize,
    /// Digits after the decimal point for p-values
    pub p_value_digits: usize,
    /// Whether counts get thousands separators
    pub thousands_separator: bool,
    /// Statistics to show; `None` picks the default for each result kind
    pub stats: Option<StatsSelector>,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            digits: 2,
            p_value_digits: 3,
            thousands_separator: true,
            stats: None,
        }
    }
}

impl FormatterConfig {
    /// Creates a compact configuration: one digit, plain counts.
    pub fn minimal() -> Self {
        Self {
            digits: 1,
            p_value_digits: 2,
            thousands_separator: false,
            stats: None,
        }
    }

    /// Creates a high-precision configuration.
    pub fn detailed() -> Self {
        Self {
            digits: 4,
            p_value_digits: 6,
            thousands_separator: true,
            stats: None,
        }
    }

    /// Sets the number of digits for estimates.
    pub fn with_digits(mut self, digits: usize) -> Self {
        self.digits = digits;
        self
    }

    /// Sets the number of digits for p-values.
    pub fn with_p_value_digits(mut self, digits: usize) -> Self {
        self.p_value_digits = digits;
        self
    }

    /// Sets whether counts get thousands separators.
    pub fn with_thousands_separator(mut self, enabled: bool) -> Self {
        self.thousands_separator = enabled;
        self
    }

    /// Sets the statistics to show.
    pub fn with_stats(mut self, stats: StatsSelector) -> Self {
        self.stats = Some(stats);
        self
    }
}

/// Rounds `value` to `digits` decimals, ties away from zero.
///
/// Decimal ties that are not exactly representable in binary (`2.675` is stored as
/// `2.67499999...`) are still treated as ties.
pub fn round_half_away_from_zero(value: f64, digits: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(digits.min(15) as i32);
    let scaled = value * factor;
    let nudge = (scaled.abs() * 1e-12).copysign(scaled);
    let rounded = (scaled + nudge).round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Formats `value` with exactly `digits` decimals after rounding half away from zero.
pub fn format_decimal(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    format!("{:.*}", digits, round_half_away_from_zero(value, digits))
}

/// Formats a count, optionally with `,` thousands separators.
pub fn format_count(n: u64, thousands_separator: bool) -> String {
    let digits = n.to_string();
    if !thousands_separator {
        return digits;
    }
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Formats `"<value> (<lower> - <upper>)"`.
pub fn format_estimate(value: f64, lower: f64, upper: f64, digits: usize) -> String {
    format!(
        "{} ({} - {})",
        format_decimal(value, digits),
        format_decimal(lower, digits),
        format_decimal(upper, digits)
    )
}

/// Formats `"<n> (<value>)"`.
pub fn format_count_with_value(
    n: u64,
    value: f64,
    digits: usize,
    thousands_separator: bool,
) -> String {
    format!(
        "{} ({})",
        format_count(n, thousands_separator),
        format_decimal(value, digits)
    )
}

/// Formats a p-value, collapsing values below `10^-digits` to `"< 0.001"` style.
pub fn format_p_value(p_value: f64, digits: usize) -> String {
    let digits = digits.max(1);
    let threshold = 10f64.powi(-(digits as i32));
    if p_value < threshold {
        format!("< {}", format_decimal(threshold, digits))
    } else {
        format_decimal(p_value, digits)
    }
}

fn format_level(level: ConfidenceLevel) -> String {
    let percent = level.value() * 100.0;
    let rounded = round_half_away_from_zero(percent, 6);
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}%")
    } else {
        format!("{rounded}%")
    }
}

/// A table of display strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedTable {
    /// Caption describing the table.
    pub title: String,
    /// Column headers.
    pub headers: Vec<String>,
    /// Cells, one vector per line, aligned with `headers`.
    pub rows: Vec<Vec<String>>,
}

impl FormattedTable {
    /// Renders the table as GitHub-flavored Markdown.
    pub fn to_markdown(&self) -> String {
        let mut output = format!("**{}**\n\n", self.title);
        output.push_str(&format!("| {} |\n", self.headers.join(" | ")));
        output.push_str(&format!(
            "|{}|\n",
            self.headers
                .iter()
                .map(|_| " --- ")
                .collect::<Vec<_>>()
                .join("|")
        ));
        for row in &self.rows {
            output.push_str(&format!("| {} |\n", row.join(" | ")));
        }
        output
    }

    /// Serializes the table as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn column_widths(&self) -> Vec<usize> {
        let mut widths = self
            .headers
            .iter()
            .map(|h| h.chars().count())
            .collect::<Vec<_>>();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(width) = widths.get_mut(i) {
                    *width = (*width).max(cell.chars().count());
                }
            }
        }
        widths
    }
}

impl fmt::Display for FormattedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.column_widths();
        let line = |cells: &[String]| {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{cell:<width$}"))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", line(&self.headers))?;
        let rule = widths.iter().map(|&w| "-".repeat(w)).collect::<Vec<_>>();
        writeln!(f, "{}", rule.join("  "))?;
        for row in &self.rows {
            writeln!(f, "{}", line(row))?;
        }
        Ok(())
    }
}

/// Formats summary tables into [`FormattedTable`]s.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use arrow::array::{ArrayRef, Int64Array};
/// use term_stats::dataset::Dataset;
/// use term_stats::formatters::{FormatterConfig, StatsSelector, TableFormatter};
/// use term_stats::summaries::{FrequencySummarizer, SummaryTable};
///
/// let dataset = Dataset::try_from_columns(vec![(
///     "am",
///     Arc::new(Int64Array::from(vec![0, 0, 0, 1])) as ArrayRef,
/// )])
/// .unwrap();
///
/// let table = SummaryTable::from(FrequencySummarizer::new("am").summarize(&dataset).unwrap());
/// let formatter =
///     TableFormatter::with_config(FormatterConfig::default().with_stats(StatsSelector::NAndPercent));
/// let formatted = formatter.format(&table).unwrap();
/// assert_eq!(formatted.rows[0], vec!["am", "0", "3 (75.00)"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TableFormatter {
    config: FormatterConfig,
}

impl TableFormatter {
    /// Creates a formatter with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a formatter with the specified configuration.
    pub fn with_config(config: FormatterConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &FormatterConfig {
        &self.config
    }

    /// Formats any summary result.
    ///
    /// Fails with `InvalidInput` when the configured selector does not apply to the
    /// result kind, or when a two-way table-total selector is used on a table
    /// computed without overall percentages.
    pub fn format(&self, table: &SummaryTable) -> Result<FormattedTable> {
        let selector = self.selector_for(table)?;
        match table {
            SummaryTable::Mean(mean) | SummaryTable::GroupedMean(mean) => {
                Ok(self.format_mean(mean, selector))
            }
            SummaryTable::Frequency(frequency) => Ok(self.format_frequency(frequency, selector)),
            SummaryTable::Crosstab(crosstab) => self.format_crosstab(crosstab, selector),
        }
    }

    /// Formats a test result on one line, e.g.
    /// `"chi2_pearson = 8.74, df = 2, p = 0.013 (expected cell count <= 5)"`.
    pub fn format_significance(&self, result: &SignificanceResult) -> String {
        let outcome = result.outcome();
        let mut parts = Vec::new();
        if let Some(value) = outcome.statistic_value {
            parts.push(format!(
                "{} = {}",
                outcome.statistic,
                format_decimal(value, self.config.digits)
            ));
        } else {
            parts.push(outcome.statistic.to_string());
        }
        if let Some(df) = outcome.degrees_of_freedom {
            parts.push(format!("df = {df}"));
        }
        let p = format_p_value(outcome.p_value, self.config.p_value_digits);
        if p.starts_with('<') {
            parts.push(format!("p {p}"));
        } else {
            parts.push(format!("p = {p}"));
        }

        let mut line = parts.join(", ");
        if let Some(warning) = outcome.warning {
            line.push_str(&format!(" ({warning})"));
        }
        line
    }

    fn selector_for(&self, table: &SummaryTable) -> Result<StatsSelector> {
        let valid = StatsSelector::valid_for(table);
        let selector = self.config.stats.unwrap_or(valid[0]);
        if !valid.contains(&selector) {
            return Err(StatsError::invalid_input(format!(
                "stats selector '{selector}' does not apply to a {} result; expected one of: {}",
                table.kind(),
                valid
                    .iter()
                    .map(|s| format!("'{s}'"))
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }
        Ok(selector)
    }

    fn format_mean(&self, table: &MeanTable, selector: StatsSelector) -> FormattedTable {
        let digits = self.config.digits;
        let mut headers = table.grouping.clone();
        headers.push("Variable".to_string());
        headers.push(selector.column_label(table.confidence_level));

        let rows = table
            .rows
            .iter()
            .map(|summary| {
                let mut cells = group_cells(&summary.key, table.grouping.len());
                cells.push(table.variable.clone());
                cells.push(if selector.shows_interval() {
                    format_estimate(summary.mean, summary.lower_ci, summary.upper_ci, digits)
                } else {
                    format_count_with_value(
                        summary.n,
                        summary.mean,
                        digits,
                        self.config.thousands_separator,
                    )
                });
                cells
            })
            .collect();

        FormattedTable {
            title: with_grouping(format!("Mean of {}", table.variable), &table.grouping),
            headers,
            rows,
        }
    }

    fn format_frequency(&self, table: &FrequencyTable, selector: StatsSelector) -> FormattedTable {
        let digits = self.config.digits;
        let mut headers = table.grouping.clone();
        headers.push("Variable".to_string());
        headers.push("Category".to_string());
        headers.push(selector.column_label(table.confidence_level));

        let rows = table
            .rows
            .iter()
            .map(|row| {
                let mut cells = group_cells(&row.key, table.grouping.len());
                cells.push(table.variable.clone());
                cells.push(row.category.to_string());
                cells.push(if selector.shows_interval() {
                    format_estimate(row.percent, row.lower_ci, row.upper_ci, digits)
                } else {
                    format_count_with_value(
                        row.n,
                        row.percent,
                        digits,
                        self.config.thousands_separator,
                    )
                });
                cells
            })
            .collect();

        FormattedTable {
            title: with_grouping(format!("Frequency of {}", table.variable), &table.grouping),
            headers,
            rows,
        }
    }

    fn format_crosstab(
        &self,
        table: &CrosstabTable,
        selector: StatsSelector,
    ) -> Result<FormattedTable> {
        let uses_total = matches!(
            selector,
            StatsSelector::PercentAndCi | StatsSelector::NAndPercent
        );
        if uses_total && !table.include_overall_percent {
            return Err(StatsError::invalid_input(format!(
                "stats selector '{selector}' needs table-total percentages, which were not computed for '{}' by '{}'; recompute the crosstab with include_overall_percent(true)",
                table.row_variable, table.column_variable
            )));
        }

        let digits = self.config.digits;
        let separator = self.config.thousands_separator;
        let mut headers = vec![table.row_variable.clone()];
        headers.extend(
            table
                .column_categories
                .iter()
                .map(|c| format!("{}={c}", table.column_variable)),
        );

        let mut rows = Vec::with_capacity(table.row_categories.len());
        for row_category in &table.row_categories {
            let mut cells = vec![row_category.to_string()];
            for cell in table.row(row_category) {
                let text = match selector {
                    StatsSelector::RowPercentAndCi => format_estimate(
                        cell.percent_row,
                        cell.lower_ci_row,
                        cell.upper_ci_row,
                        digits,
                    ),
                    StatsSelector::NAndRowPercent => {
                        format_count_with_value(cell.n, cell.percent_row, digits, separator)
                    }
                    _ => match (cell.percent_total, cell.lower_ci_total, cell.upper_ci_total) {
                        (Some(percent), Some(lower), Some(upper)) => {
                            if selector.shows_interval() {
                                format_estimate(percent, lower, upper, digits)
                            } else {
                                format_count_with_value(cell.n, percent, digits, separator)
                            }
                        }
                        _ => {
                            return Err(StatsError::invalid_input(format!(
                                "cell '{}' x '{}' has no table-total percentage",
                                cell.row_category, cell.column_category
                            )))
                        }
                    },
                };
                cells.push(text);
            }
            rows.push(cells);
        }

        Ok(FormattedTable {
            title: format!(
                "{} by {}: {}",
                table.row_variable,
                table.column_variable,
                selector.column_label(table.confidence_level)
            ),
            headers,
            rows,
        })
    }
}

fn group_cells(key: &GroupKey, width: usize) -> Vec<String> {
    if key.is_overall() {
        vec!["Overall".to_string(); width]
    } else {
        key.values().map(ToString::to_string).collect()
    }
}

fn with_grouping(title: String, grouping: &[String]) -> String {
    if grouping.is_empty() {
        title
    } else {
        format!("{title} by {}", grouping.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Category;
    use crate::inference::{test_two_way, TestMethod};
    use crate::summaries::{ContinuousSummary, CrosstabSummarizer, FrequencySummarizer};
    use crate::test_fixtures::mtcars;

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_half_away_from_zero(0.125, 2), 0.13);
        assert_eq!(round_half_away_from_zero(-0.125, 2), -0.13);
        assert_eq!(round_half_away_from_zero(2.675, 2), 2.68);
        assert_eq!(round_half_away_from_zero(1.005, 2), 1.01);
        assert_eq!(round_half_away_from_zero(59.375, 2), 59.38);
        assert_eq!(round_half_away_from_zero(1.234, 2), 1.23);
        assert_eq!(round_half_away_from_zero(-0.001, 2), 0.0);
        assert_eq!(round_half_away_from_zero(1234.5, 0), 1235.0);
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(24.0, 2), "24.00");
        assert_eq!(format_decimal(-0.001, 2), "0.00");
        assert_eq!(format_decimal(40.625, 2), "40.63");
        assert_eq!(format_decimal(3.14159, 0), "3");
        assert_eq!(format_decimal(f64::INFINITY, 2), "inf");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0, true), "0");
        assert_eq!(format_count(999, true), "999");
        assert_eq!(format_count(1000, true), "1,000");
        assert_eq!(format_count(12345678, true), "12,345,678");
        assert_eq!(format_count(12345678, false), "12345678");
    }

    #[test]
    fn test_patterns() {
        assert_eq!(
            format_estimate(24.0, 21.0, 27.0, 2),
            "24.00 (21.00 - 27.00)"
        );
        assert_eq!(format_count_with_value(1500, 12.5, 1, true), "1,500 (12.5)");
        assert_eq!(format_p_value(0.0126466, 3), "0.013");
        assert_eq!(format_p_value(0.00001, 3), "< 0.001");
    }

    #[test]
    fn test_selector_parsing() {
        assert_eq!(
            "mean and ci".parse::<StatsSelector>().unwrap(),
            StatsSelector::MeanAndCi
        );
        assert_eq!(
            "  Row Percent   and CI ".parse::<StatsSelector>().unwrap(),
            StatsSelector::RowPercentAndCi
        );
        assert!("median".parse::<StatsSelector>().is_err());
        for selector in [
            StatsSelector::MeanAndCi,
            StatsSelector::NAndMean,
            StatsSelector::PercentAndCi,
            StatsSelector::NAndPercent,
            StatsSelector::RowPercentAndCi,
            StatsSelector::NAndRowPercent,
        ] {
            assert_eq!(selector.to_string().parse::<StatsSelector>().unwrap(), selector);
        }
    }

    #[test]
    fn test_format_grouped_mean() {
        let table = MeanTable {
            variable: "mpg".to_string(),
            grouping: vec!["cyl".to_string()],
            confidence_level: ConfidenceLevel::default(),
            rows: vec![ContinuousSummary {
                key: GroupKey::new([("cyl", Category::Integer(4))]),
                n: 11,
                mean: 26.663636,
                std_dev: 4.509828,
                standard_error: 1.359764,
                lower_ci: 23.633893,
                upper_ci: 29.693380,
                min: 21.4,
                max: 33.9,
            }],
        };
        let summary = SummaryTable::from(table);

        let formatted = TableFormatter::new().format(&summary).unwrap();
        assert_eq!(formatted.headers, vec!["cyl", "Variable", "Mean (95% CI)"]);
        assert_eq!(formatted.rows[0], vec!["4", "mpg", "26.66 (23.63 - 29.69)"]);
        assert_eq!(formatted.title, "Mean of mpg by cyl");

        let formatter =
            TableFormatter::with_config(FormatterConfig::default().with_stats(StatsSelector::NAndMean));
        let formatted = formatter.format(&summary).unwrap();
        assert_eq!(formatted.rows[0][2], "11 (26.66)");

        let formatter = TableFormatter::with_config(
            FormatterConfig::default().with_stats(StatsSelector::PercentAndCi),
        );
        let err = formatter.format(&summary).unwrap_err();
        assert!(matches!(err, StatsError::InvalidInput(_)));
        assert!(err.to_string().contains("grouped mean"));
    }

    #[test]
    fn test_format_frequency() {
        let dataset = mtcars();
        let table = FrequencySummarizer::new("am").summarize(&dataset).unwrap();
        let formatted = TableFormatter::new()
            .format(&SummaryTable::from(table))
            .unwrap();

        assert_eq!(formatted.headers, vec!["Variable", "Category", "% (95% CI)"]);
        assert_eq!(formatted.rows.len(), 2);
        assert_eq!(formatted.rows[0], vec!["am", "0", "59.38 (42.26 - 74.48)"]);
        assert_eq!(formatted.rows[1], vec!["am", "1", "40.63 (25.52 - 57.74)"]);
    }

    #[test]
    fn test_crosstab_total_selector_requires_totals() {
        let dataset = mtcars();
        let table = CrosstabSummarizer::new("am", "cyl")
            .summarize(&dataset)
            .unwrap();
        let summary = SummaryTable::from(table);

        let formatter = TableFormatter::with_config(
            FormatterConfig::default().with_stats(StatsSelector::PercentAndCi),
        );
        let err = formatter.format(&summary).unwrap_err();
        assert!(matches!(err, StatsError::InvalidInput(_)));
        assert!(err.to_string().contains("include_overall_percent(true)"));

        let formatted = TableFormatter::new().format(&summary).unwrap();
        assert_eq!(formatted.headers, vec!["am", "cyl=4", "cyl=6", "cyl=8"]);
        assert_eq!(formatted.rows.len(), 2);
        assert_eq!(formatted.rows[0][0], "0");
    }

    #[test]
    fn test_crosstab_with_totals() {
        let dataset = mtcars();
        let table = CrosstabSummarizer::new("am", "cyl")
            .include_overall_percent(true)
            .summarize(&dataset)
            .unwrap();
        let formatter = TableFormatter::with_config(
            FormatterConfig::default().with_stats(StatsSelector::NAndPercent),
        );
        let formatted = formatter.format(&SummaryTable::from(table)).unwrap();
        // am=0, cyl=8: 12 of 32
        assert_eq!(formatted.rows[0][3], "12 (37.50)");
    }

    #[test]
    fn test_format_significance() {
        let dataset = mtcars();
        let table = CrosstabSummarizer::new("am", "cyl")
            .summarize(&dataset)
            .unwrap();
        let result = test_two_way(&table, TestMethod::Pearson).unwrap();
        assert_eq!(
            TableFormatter::new().format_significance(&result),
            "chi2_pearson = 8.74, df = 2, p = 0.013 (expected cell count <= 5)"
        );
    }

    #[test]
    fn test_rendering() {
        let table = FormattedTable {
            title: "Mean of mpg".to_string(),
            headers: vec!["Variable".to_string(), "Mean".to_string()],
            rows: vec![vec!["mpg".to_string(), "20.09".to_string()]],
        };

        let text = table.to_string();
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "Mean of mpg");
        assert_eq!(lines[1], "Variable  Mean");
        assert_eq!(lines[2], "--------  -----");
        assert_eq!(lines[3], "mpg       20.09");

        let markdown = table.to_markdown();
        assert!(markdown.contains("| Variable | Mean |"));
        assert!(markdown.contains("| mpg | 20.09 |"));

        let json: serde_json::Value = serde_json::from_str(&table.to_json().unwrap()).unwrap();
        assert_eq!(json["rows"][0][1], "20.09");
    }

    #[test]
    fn test_config_presets() {
        assert_eq!(FormatterConfig::default().digits, 2);
        assert_eq!(FormatterConfig::minimal().digits, 1);
        assert!(!FormatterConfig::minimal().thousands_separator);
        assert_eq!(FormatterConfig::detailed().digits, 4);

        let config: FormatterConfig =
            serde_json::from_str(r#"{"digits": 3, "stats": "n and percent"}"#).unwrap();
        assert_eq!(config.digits, 3);
        assert_eq!(config.stats, Some(StatsSelector::NAndPercent));
        assert!(config.thousands_separator);
    }
}
