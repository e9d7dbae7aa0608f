//! Distribution helpers: critical values, tail probabilities and exact tests.
//!
//! Continuous distributions come from `statrs`; the Wilson score interval and the
//! 2x2 hypergeometric enumeration are computed here.

use serde::Serialize;
use statrs::distribution::{ChiSquared, ContinuousCDF, Normal, StudentsT};
use statrs::function::factorial::ln_factorial;

use crate::config::ConfidenceLevel;
use crate::error::{Result, StatsError};

/// Relative tolerance when comparing table probabilities in Fisher's exact test.
///
/// Tables whose probability equals the observed one up to rounding error count as
/// "at least as extreme".
const FISHER_RELATIVE_TOLERANCE: f64 = 1e-7;

/// Two-sided Student t critical value for `degrees_of_freedom`.
pub fn t_critical_value(level: ConfidenceLevel, degrees_of_freedom: f64) -> Result<f64> {
    let distribution = StudentsT::new(0.0, 1.0, degrees_of_freedom)
        .map_err(|e| StatsError::distribution(format!("Student t: {e}")))?;
    Ok(distribution.inverse_cdf(level.upper_tail_probability()))
}

/// Two-sided standard normal critical value.
pub fn z_critical_value(level: ConfidenceLevel) -> Result<f64> {
    let distribution =
        Normal::new(0.0, 1.0).map_err(|e| StatsError::distribution(format!("normal: {e}")))?;
    Ok(distribution.inverse_cdf(level.upper_tail_probability()))
}

/// Upper-tail probability `P(X >= statistic)` of a chi-square distribution.
pub fn chi_square_upper_tail(statistic: f64, degrees_of_freedom: f64) -> Result<f64> {
    let distribution = ChiSquared::new(degrees_of_freedom)
        .map_err(|e| StatsError::distribution(format!("chi-square: {e}")))?;
    Ok(distribution.sf(statistic.max(0.0)).clamp(0.0, 1.0))
}

/// A proportion with its confidence limits, all in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProportionInterval {
    /// Point estimate `successes / trials`.
    pub estimate: f64,
    /// Lower confidence limit.
    pub lower: f64,
    /// Upper confidence limit.
    pub upper: f64,
}

impl ProportionInterval {
    /// Returns the interval scaled to percentages.
    pub fn to_percent(self) -> (f64, f64, f64) {
        (self.estimate * 100.0, self.lower * 100.0, self.upper * 100.0)
    }
}

/// Wilson score interval for a binomial proportion.
///
/// Remains inside [0, 1] and non-degenerate at 0 and `trials` successes, unlike the
/// Wald interval. Fails with `InvalidInput` when `trials` is zero or smaller than
/// `successes`.
///
/// # Examples
///
/// ```rust
/// use term_stats::config::ConfidenceLevel;
/// use term_stats::inference::distributions::wilson_interval;
///
/// let interval = wilson_interval(19, 32, ConfidenceLevel::default()).unwrap();
/// assert!((interval.estimate - 0.59375).abs() < 1e-12);
/// assert!((interval.lower - 0.4226).abs() < 1e-4);
/// assert!((interval.upper - 0.7448).abs() < 1e-4);
/// ```
pub fn wilson_interval(
    successes: u64,
    trials: u64,
    level: ConfidenceLevel,
) -> Result<ProportionInterval> {
    if trials == 0 {
        return Err(StatsError::invalid_input(
            "Wilson interval requires at least one trial",
        ));
    }
    if successes > trials {
        return Err(StatsError::invalid_input(format!(
            "Wilson interval got {successes} successes out of {trials} trials"
        )));
    }

    let z = z_critical_value(level)?;
    let n = trials as f64;
    let p = successes as f64 / n;
    let z2 = z * z;

    let denominator = 1.0 + z2 / n;
    let center = (p + z2 / (2.0 * n)) / denominator;
    let half_width = z / denominator * (p * (1.0 - p) / n + z2 / (4.0 * n * n)).sqrt();

    Ok(ProportionInterval {
        estimate: p,
        lower: (center - half_width).clamp(0.0, p),
        upper: (center + half_width).clamp(p, 1.0),
    })
}

/// Two-sided p-value of Fisher's exact test for a 2x2 table.
///
/// Sums the hypergeometric probabilities, given the observed margins, of every table
/// no more probable than the observed one. A table with a zero margin admits a single
/// arrangement and yields 1.
pub fn fisher_exact_two_sided(table: [[u64; 2]; 2]) -> f64 {
    let [[a, b], [c, d]] = table;
    let row1 = a + b;
    let row2 = c + d;
    let col1 = a + c;
    let col2 = b + d;
    let n = row1 + row2;

    let log_denominator = ln_factorial(n) - ln_factorial(row1) - ln_factorial(row2)
        - ln_factorial(col1)
        - ln_factorial(col2);
    let log_prob = |x: u64| -> f64 {
        -(ln_factorial(x)
            + ln_factorial(row1 - x)
            + ln_factorial(col1 - x)
            + ln_factorial(row2 + x - col1)
            + log_denominator)
    };

    let lowest = col1.saturating_sub(row2);
    let highest = row1.min(col1);
    let observed = log_prob(a).exp();
    let threshold = observed * (1.0 + FISHER_RELATIVE_TOLERANCE);

    let p_value = (lowest..=highest)
        .map(|x| log_prob(x).exp())
        .filter(|&probability| probability <= threshold)
        .sum::<f64>();

    p_value.clamp(0.0, 1.0)
}
