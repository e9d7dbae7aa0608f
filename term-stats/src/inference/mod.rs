//! Statistical inference: distribution helpers and significance tests.

pub mod distributions;
pub mod significance;

pub use distributions::{wilson_interval, ProportionInterval};
pub use significance::{
    test_one_way, test_one_way_by_group, test_two_way, SignificanceResult, TestMethod,
    TestOutcome, TestStatistic, TestWarning, SMALL_EXPECTED_COUNT,
};
