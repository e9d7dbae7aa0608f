//! # term-stats - Grouped descriptive statistics for Rust
//!
//! term-stats computes presentation-ready summary tables from rectangular datasets:
//! means with t-based confidence intervals, one-way frequency distributions with
//! Wilson score intervals, two-way frequency tables with row, column and total
//! percentages, and chi-square / Fisher's exact significance tests. Datasets are
//! Apache Arrow record batches; results are plain serializable values.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use arrow::array::{ArrayRef, Float64Array, Int64Array};
//! use term_stats::prelude::*;
//!
//! # fn main() -> term_stats::error::Result<()> {
//! let dataset = Dataset::try_from_columns(vec![
//!     ("mpg", Arc::new(Float64Array::from(vec![21.0, 22.8, 21.4, 18.7, 18.1, 24.4])) as ArrayRef),
//!     ("cyl", Arc::new(Int64Array::from(vec![6, 4, 6, 8, 6, 4])) as ArrayRef),
//!     ("am", Arc::new(Int64Array::from(vec![1, 1, 0, 0, 0, 0])) as ArrayRef),
//! ])?;
//!
//! // Mean mpg per cylinder count
//! let means = MeanSummarizer::new("mpg").group_by(["cyl"]).summarize(&dataset)?;
//! assert_eq!(means.rows.len(), 3);
//!
//! // Distribution of the transmission type, tested against a uniform split
//! let frequencies = FrequencySummarizer::new("am").summarize(&dataset)?;
//! let test = test_one_way(&frequencies)?;
//! assert!(test.p_value() > 0.05);
//!
//! // Cross-tabulation and independence test
//! let crosstab = CrosstabSummarizer::new("am", "cyl").summarize(&dataset)?;
//! let test = test_two_way(&crosstab, TestMethod::Pearson)?;
//! assert!(test.warning().is_some());
//!
//! // Display strings
//! let table = TableFormatter::new().format(&SummaryTable::from(means))?;
//! println!("{table}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Pipeline
//!
//! 1. [`dataset::partition`] splits rows by grouping-key values, reporting rows
//!    excluded for missing keys.
//! 2. [`summaries`] compute raw statistics per partition.
//! 3. [`inference`] tests frequency results, flagging small expected counts.
//! 4. [`formatters`] renders results as `"<value> (<lcl> - <ucl>)"` or
//!    `"<n> (<value>)"` strings.
//!
//! ## Logging
//!
//! Entry points are instrumented with `tracing`. Install a subscriber with
//! [`logging::setup::init_logging`] or bring your own.

pub mod config;
pub mod dataset;
pub mod error;
pub mod formatters;
pub mod inference;
pub mod logging;
pub mod prelude;
pub mod summaries;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_fixtures;
