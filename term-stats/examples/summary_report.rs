//! Prints a small summary report for a survey-style dataset.
//!
//! Run with `cargo run --example summary_report`. Set `RUST_LOG=term_stats=debug` to
//! see partitioning and test details.

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray};
use term_stats::logging::setup::{init_logging, LoggingConfig};
use term_stats::prelude::*;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    init_logging(LoggingConfig::default().with_stats_level(tracing::Level::INFO))?;

    let dataset = Dataset::try_from_columns(vec![
        (
            "satisfaction",
            Arc::new(Float64Array::from(vec![
                Some(7.5),
                Some(8.0),
                Some(6.0),
                None,
                Some(9.0),
                Some(4.5),
                Some(7.0),
                Some(8.5),
                Some(5.5),
                Some(6.5),
            ])) as ArrayRef,
        ),
        (
            "plan",
            Arc::new(StringArray::from(vec![
                "basic", "pro", "basic", "pro", "pro", "basic", "team", "team", "basic", "pro",
            ])) as ArrayRef,
        ),
        (
            "renewed",
            Arc::new(StringArray::from(vec![
                Some("yes"),
                Some("yes"),
                Some("no"),
                Some("yes"),
                Some("yes"),
                Some("no"),
                None,
                Some("yes"),
                Some("no"),
                Some("yes"),
            ])) as ArrayRef,
        ),
    ])?;

    let formatter = TableFormatter::new();

    let means = MeanSummarizer::new("satisfaction")
        .group_by(["plan"])
        .summarize(&dataset)?;
    println!("{}", formatter.format(&SummaryTable::from(means))?);

    let renewal = FrequencySummarizer::new("renewed").summarize(&dataset)?;
    let test = test_one_way(&renewal)?;
    println!("{}", formatter.format(&SummaryTable::from(renewal))?);
    println!("{}\n", formatter.format_significance(&test));

    let crosstab = CrosstabSummarizer::new("plan", "renewed")
        .include_overall_percent(true)
        .summarize(&dataset)?;
    let test = test_two_way(&crosstab, TestMethod::Auto)?;
    let counts = TableFormatter::with_config(
        FormatterConfig::default().with_stats(StatsSelector::NAndPercent),
    );
    println!("{}", counts.format(&SummaryTable::from(crosstab))?.to_markdown());
    println!("{}", formatter.format_significance(&test));

    Ok(())
}
