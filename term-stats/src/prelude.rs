//! Prelude for commonly used types and functions in term-stats.

pub use crate::config::{ConfidenceLevel, CrosstabOptions, FrequencyOptions, MeanOptions};
pub use crate::dataset::{partition, Category, Dataset, GroupKey};
pub use crate::error::{Result, StatsError};
pub use crate::formatters::{FormattedTable, FormatterConfig, StatsSelector, TableFormatter};
pub use crate::inference::{
    test_one_way, test_one_way_by_group, test_two_way, SignificanceResult, TestMethod,
};
pub use crate::summaries::{
    summarize_crosstab, summarize_frequency, summarize_mean, CrosstabSummarizer,
    FrequencySummarizer, MeanSummarizer, SummaryTable,
};
