//! Configuration types shared by the summarizers.
//!
//! All option structs derive `Serialize`/`Deserialize` so summary definitions can be
//! stored alongside analysis code, e.g. as JSON:
//!
//! ```rust
//! use term_stats::config::FrequencyOptions;
//!
//! let options: FrequencyOptions =
//!     serde_json::from_str(r#"{"grouping": ["cyl"], "confidence_level": 0.9}"#).unwrap();
//! assert_eq!(options.grouping, vec!["cyl".to_string()]);
//! assert!(!options.include_overall);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, StatsError};

/// A confidence level in the open interval (0, 1).
///
/// Construction validates the range, so every `ConfidenceLevel` in the program is
/// usable for interval construction. Deserializing an out-of-range value fails.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ConfidenceLevel(f64);

impl ConfidenceLevel {
    /// The conventional 95% level.
    pub const NINETY_FIVE: Self = Self(0.95);

    /// Creates a confidence level, rejecting values outside (0, 1).
    pub fn new(level: f64) -> Result<Self> {
        if level.is_finite() && level > 0.0 && level < 1.0 {
            Ok(Self(level))
        } else {
            Err(StatsError::invalid_input(format!(
                "confidence level must be strictly between 0 and 1, got {level}"
            )))
        }
    }

    /// Returns the level as a probability.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Returns the cumulative probability `1 - (1 - level) / 2` used to look up
    /// two-sided critical values.
    pub fn upper_tail_probability(self) -> f64 {
        1.0 - (1.0 - self.0) / 2.0
    }
}

impl Default for ConfidenceLevel {
    fn default() -> Self {
        Self::NINETY_FIVE
    }
}

impl TryFrom<f64> for ConfidenceLevel {
    type Error = StatsError;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ConfidenceLevel> for f64 {
    fn from(level: ConfidenceLevel) -> Self {
        level.0
    }
}

/// Options for mean summaries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeanOptions {
    /// Columns to group by, outermost first.
    pub grouping: Vec<String>,

    /// Confidence level of the t-based interval.
    pub confidence_level: ConfidenceLevel,
}

impl MeanOptions {
    /// Sets the grouping columns.
    pub fn with_grouping<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.grouping = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the confidence level.
    pub fn with_confidence_level(mut self, level: ConfidenceLevel) -> Self {
        self.confidence_level = level;
        self
    }
}

/// Options for one-way frequency summaries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrequencyOptions {
    /// Outer grouping columns, outermost first.
    pub grouping: Vec<String>,

    /// Whether to append the ungrouped distribution after the grouped rows.
    pub include_overall: bool,

    /// Confidence level of the Wilson score interval.
    pub confidence_level: ConfidenceLevel,
}

impl FrequencyOptions {
    /// Sets the outer grouping columns.
    pub fn with_grouping<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.grouping = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Sets whether the overall distribution is included.
    pub fn with_overall(mut self, include: bool) -> Self {
        self.include_overall = include;
        self
    }

    /// Sets the confidence level.
    pub fn with_confidence_level(mut self, level: ConfidenceLevel) -> Self {
        self.confidence_level = level;
        self
    }
}

/// Options for two-way frequency summaries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrosstabOptions {
    /// Whether column and table-total percentages are computed.
    pub include_overall_percent: bool,

    /// Confidence level of the Wilson score intervals.
    pub confidence_level: ConfidenceLevel,
}

impl CrosstabOptions {
    /// Sets whether column and total percentages are computed.
    pub fn with_overall_percent(mut self, include: bool) -> Self {
        self.include_overall_percent = include;
        self
    }

    /// Sets the confidence level.
    pub fn with_confidence_level(mut self, level: ConfidenceLevel) -> Self {
        self.confidence_level = level;
        self
    }
}
