//! Grouped descriptive summaries.
//!
//! Each summarizer reads columns from a [`Dataset`](crate::dataset::Dataset),
//! partitions the rows and produces a result table of raw statistics:
//!
//! | Summarizer | Result |
//! | --- | --- |
//! | [`MeanSummarizer`] | [`MeanTable`] of [`ContinuousSummary`] |
//! | [`FrequencySummarizer`] | [`FrequencyTable`] of [`OneWayFrequencyRow`] |
//! | [`CrosstabSummarizer`] | [`CrosstabTable`] of [`TwoWayFrequencyCell`] |
//!
//! Results convert into [`SummaryTable`] for formatting.

pub mod continuous;
pub mod crosstab;
pub mod frequency;
pub mod types;

pub use continuous::{summarize_mean, MeanSummarizer};
pub use crosstab::{summarize_crosstab, CrosstabSummarizer};
pub use frequency::{summarize_frequency, FrequencySummarizer};
pub use types::{
    ContinuousSummary, CrosstabTable, FrequencyTable, MeanTable, OneWayFrequencyRow,
    SummaryTable, TwoWayFrequencyCell,
};
