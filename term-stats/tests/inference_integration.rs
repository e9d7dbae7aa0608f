//! Significance tests on summaries computed from data.

mod common;

use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray};
use common::{assert_close, mtcars};
use term_stats::inference::{TestStatistic, TestWarning};
use term_stats::prelude::*;

#[test]
fn test_transmission_by_cylinders_is_flagged() {
    let dataset = mtcars();
    let table = summarize_crosstab(&dataset, "am", "cyl", false).unwrap();
    let result = test_two_way(&table, TestMethod::Pearson).unwrap();

    let outcome = result.outcome();
    assert_eq!(outcome.statistic, TestStatistic::ChiSquarePearson);
    assert_close(outcome.statistic_value.unwrap(), 8.740_733, 1e-5);
    assert_eq!(outcome.degrees_of_freedom, Some(2));
    assert_close(outcome.p_value, 0.012_646_6, 1e-6);
    assert_eq!(outcome.warning, Some(TestWarning::SmallExpectedCount));
    assert_eq!(
        outcome.warning.map(|w| w.to_string()).as_deref(),
        Some("expected cell count <= 5")
    );
}

#[test]
fn test_fisher_requires_two_by_two() {
    let dataset = mtcars();
    let table = summarize_crosstab(&dataset, "am", "cyl", false).unwrap();
    let err = test_two_way(&table, TestMethod::Fisher).unwrap_err();
    assert!(matches!(err, StatsError::UnsupportedShape { .. }));
    assert_eq!(
        err.to_string(),
        "Fisher's exact test requires a 2x2 table, got 2x3"
    );
}

#[test]
fn test_transmission_by_engine_shape() {
    let dataset = mtcars();
    let table = summarize_crosstab(&dataset, "am", "vs", false).unwrap();
    assert_eq!(table.counts(), vec![vec![12, 7], vec![6, 7]]);

    let fisher = test_two_way(&table, TestMethod::Fisher).unwrap();
    assert_eq!(fisher.statistic(), TestStatistic::FisherExact);
    assert_close(fisher.p_value(), 0.472_697_4, 1e-6);
    assert!(fisher.warning().is_none());

    // Smallest expected count is 13 * 14 / 32 = 5.6875
    let pearson = test_two_way(&table, TestMethod::Pearson).unwrap();
    assert!(pearson.warning().is_none());
    let auto = test_two_way(&table, TestMethod::Auto).unwrap();
    assert_eq!(auto.statistic(), TestStatistic::ChiSquarePearson);
    assert_eq!(auto.p_value(), pearson.p_value());
}

#[test]
fn test_uniform_split_has_no_evidence() {
    let values = (0..32).map(|i| Some(i % 2 == 0)).collect::<Vec<_>>();
    let dataset = Dataset::try_from_columns(vec![(
        "heads",
        Arc::new(BooleanArray::from(values)) as ArrayRef,
    )])
    .unwrap();

    let table = summarize_frequency::<&str>(&dataset, "heads", &[], false).unwrap();
    assert_eq!(table.rows[0].n, 16);
    assert_eq!(table.rows[1].n, 16);

    let result = test_one_way(&table).unwrap();
    assert_eq!(result.outcome().statistic_value, Some(0.0));
    assert_close(result.p_value(), 1.0, 1e-12);
}

#[test]
fn test_transmission_goodness_of_fit() {
    let dataset = mtcars();
    let table = summarize_frequency::<&str>(&dataset, "am", &[], false).unwrap();
    let result = test_one_way(&table).unwrap();
    assert_close(result.outcome().statistic_value.unwrap(), 1.125, 1e-12);
    assert_eq!(result.outcome().degrees_of_freedom, Some(1));
    assert_close(result.p_value(), 0.288_844, 1e-5);
}

#[test]
fn test_one_way_per_group() {
    let dataset = mtcars();
    let table = summarize_frequency(&dataset, "am", &["cyl"], false).unwrap();

    let err = test_one_way(&table).unwrap_err();
    assert!(matches!(err, StatsError::InvalidInput(_)));

    let results = test_one_way_by_group(&table).unwrap();
    assert_eq!(results.len(), 3);
    // cyl=8: 12 automatic, 2 manual
    assert_close(
        results[2].outcome().statistic_value.unwrap(),
        (25.0 + 25.0) / 7.0,
        1e-9,
    );
    assert!(results[2].p_value() < 0.01);
}

#[test]
fn test_single_category_cannot_be_tested() {
    let dataset = Dataset::try_from_columns(vec![(
        "constant",
        Arc::new(BooleanArray::from(vec![true, true, true])) as ArrayRef,
    )])
    .unwrap();

    let table = summarize_frequency::<&str>(&dataset, "constant", &[], false).unwrap();
    let err = test_one_way(&table).unwrap_err();
    assert!(matches!(err, StatsError::InvalidInput(_)));
}
