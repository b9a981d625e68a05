//! Two-sample location tests.
//!
//! These compare group means only: two samples with identical marginal
//! values but different joint arrangement are indistinguishable to them.
//! They are the baseline a distributional comparison is contrasted with.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF as _, FisherSnedecor, StudentsT};

use crate::{
    StatsError,
    descriptive::{covariance, mean},
    ensure_finite,
};

/// Result of [`welch_t_test`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TTest {
    pub statistic: f64,
    /// Welch–Satterthwaite degrees of freedom.
    pub degrees_of_freedom: f64,
    /// Two-sided p-value.
    pub p_value: f64,
    pub mean_difference: f64,
}

/// Result of [`hotelling_t2`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotellingTest {
    pub t_squared: f64,
    /// `T²` scaled to an F statistic with `(df1, df2)` degrees of freedom.
    pub f_statistic: f64,
    pub df1: f64,
    pub df2: f64,
    pub p_value: f64,
}

fn check_sample(values: &[f64], required: usize) -> Result<(), StatsError> {
    if values.len() < required {
        return Err(StatsError::TooFewValues {
            required,
            actual: values.len(),
        });
    }
    ensure_finite(values)
}

/// Two-sided Welch's t-test for a difference in means.
///
/// Both samples need at least two values. When both samples have zero
/// variance, equal means give a statistic of 0 and a p-value of 1, and
/// different means give an infinite statistic and a p-value of 0.
///
/// # Examples
///
/// ```
/// use jointfit_stats::location::welch_t_test;
///
/// let a = [5.1, 4.9, 5.3, 5.0, 4.8];
/// let b = [6.2, 6.0, 6.4, 5.9, 6.1];
/// let test = welch_t_test(&a, &b).unwrap();
/// assert!(test.statistic < 0.0);
/// assert!(test.p_value < 0.001);
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn welch_t_test(a: &[f64], b: &[f64]) -> Result<TTest, StatsError> {
    check_sample(a, 2)?;
    check_sample(b, 2)?;

    let n_a = a.len() as f64;
    let n_b = b.len() as f64;
    let var_a = covariance(a, a) / n_a;
    let var_b = covariance(b, b) / n_b;
    let standard_error_sq = var_a + var_b;
    let mean_difference = mean(a) - mean(b);

    if standard_error_sq == 0.0 {
        let (statistic, p_value) = if mean_difference == 0.0 {
            (0.0, 1.0)
        } else {
            (f64::INFINITY.copysign(mean_difference), 0.0)
        };
        return Ok(TTest {
            statistic,
            degrees_of_freedom: n_a + n_b - 2.0,
            p_value,
            mean_difference,
        });
    }

    let statistic = mean_difference / standard_error_sq.sqrt();
    let degrees_of_freedom =
        standard_error_sq.powi(2) / (var_a.powi(2) / (n_a - 1.0) + var_b.powi(2) / (n_b - 1.0));
    let distribution =
        StudentsT::new(0.0, 1.0, degrees_of_freedom).expect("degrees of freedom are positive");
    let p_value = (2.0 * distribution.sf(statistic.abs())).min(1.0);

    Ok(TTest {
        statistic,
        degrees_of_freedom,
        p_value,
        mean_difference,
    })
}

/// Two-sample Hotelling's T² test for bivariate means.
///
/// Each sample is given as its two coordinate columns `(xs, ys)`. Uses the
/// pooled covariance matrix and the exact F transformation
/// `F = (n - 3) / (2 (n - 2)) · T²` with `(2, n - 3)` degrees of freedom,
/// where `n` is the combined sample size.
///
/// # Errors
///
/// * [`StatsError::LengthMismatch`] if a sample's columns differ in length
/// * [`StatsError::TooFewValues`] if a sample has fewer than 2 observations
///   or the combined size is below 4
/// * [`StatsError::SingularCovariance`] if the pooled covariance matrix is singular
///
/// # Examples
///
/// ```
/// use jointfit_stats::location::hotelling_t2;
///
/// let a = ([1.0, 2.0, 3.0, 4.0].as_slice(), [2.0, 1.0, 4.0, 3.0].as_slice());
/// let b = ([1.5, 2.5, 3.5, 4.5].as_slice(), [1.0, 3.0, 2.0, 4.5].as_slice());
/// let test = hotelling_t2(a, b).unwrap();
/// assert!(test.p_value > 0.05);
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn hotelling_t2(
    (a_xs, a_ys): (&[f64], &[f64]),
    (b_xs, b_ys): (&[f64], &[f64]),
) -> Result<HotellingTest, StatsError> {
    for (xs, ys) in [(a_xs, a_ys), (b_xs, b_ys)] {
        if xs.len() != ys.len() {
            return Err(StatsError::LengthMismatch {
                x_len: xs.len(),
                y_len: ys.len(),
            });
        }
        check_sample(xs, 2)?;
        check_sample(ys, 2)?;
    }
    let n_a = a_xs.len();
    let n_b = b_xs.len();
    if n_a + n_b < 4 {
        return Err(StatsError::TooFewValues {
            required: 4,
            actual: n_a + n_b,
        });
    }

    let weight_a = (n_a - 1) as f64;
    let weight_b = (n_b - 1) as f64;
    let pooled =
        |cov_a: f64, cov_b: f64| (weight_a * cov_a + weight_b * cov_b) / (weight_a + weight_b);
    let s_xx = pooled(covariance(a_xs, a_xs), covariance(b_xs, b_xs));
    let s_yy = pooled(covariance(a_ys, a_ys), covariance(b_ys, b_ys));
    let s_xy = pooled(covariance(a_xs, a_ys), covariance(b_xs, b_ys));

    let determinant = s_xx * s_yy - s_xy * s_xy;
    if determinant <= f64::EPSILON * s_xx * s_yy || determinant <= 0.0 {
        return Err(StatsError::SingularCovariance);
    }

    let d_x = mean(a_xs) - mean(b_xs);
    let d_y = mean(a_ys) - mean(b_ys);
    // d' S⁻¹ d with the closed-form 2×2 inverse
    let mahalanobis = (s_yy * d_x * d_x - 2.0 * s_xy * d_x * d_y + s_xx * d_y * d_y) / determinant;

    let n = (n_a + n_b) as f64;
    let t_squared = (n_a * n_b) as f64 / n * mahalanobis;
    let df1 = 2.0;
    let df2 = n - 3.0;
    let f_statistic = df2 / (df1 * (n - 2.0)) * t_squared;
    let p_value = FisherSnedecor::new(df1, df2)
        .expect("degrees of freedom are positive")
        .sf(f_statistic);

    Ok(HotellingTest {
        t_squared,
        f_statistic,
        df1,
        df2,
        p_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welch_identical_multisets() {
        let a = [3.2, 1.5, 4.8, 2.2, 9.1, 0.4];
        let mut b = a;
        b.reverse();
        let test = welch_t_test(&a, &b).unwrap();
        assert!(test.statistic.abs() < 1e-9);
        assert!(test.p_value > 0.999);
    }

    #[test]
    fn test_welch_known_value() {
        // Equal sizes and variances: t = (2 - 4) / sqrt(1/3 + 1/3)
        let a = [1.0, 2.0, 3.0];
        let b = [3.0, 4.0, 5.0];
        let test = welch_t_test(&a, &b).unwrap();
        assert!((test.statistic + 2.0 / (2.0_f64 / 3.0).sqrt()).abs() < 1e-12);
        assert!((test.degrees_of_freedom - 4.0).abs() < 1e-12);
        assert!((test.p_value - 0.070_484).abs() < 1e-5);
    }

    #[test]
    fn test_welch_constant_samples() {
        let test = welch_t_test(&[2.0, 2.0], &[2.0, 2.0, 2.0]).unwrap();
        assert_eq!((test.statistic, test.p_value), (0.0, 1.0));
        let test = welch_t_test(&[1.0, 1.0], &[2.0, 2.0]).unwrap();
        assert_eq!(test.p_value, 0.0);
        assert!(test.statistic.is_infinite() && test.statistic < 0.0);
    }

    #[test]
    fn test_welch_too_few_values() {
        let err = welch_t_test(&[1.0], &[1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            StatsError::TooFewValues {
                required: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_hotelling_same_marginals() {
        let xs = [1.0, 4.0, 2.0, 8.0, 5.0, 7.0, 3.0, 6.0];
        let ys = [2.0, 3.5, 1.0, 6.0, 2.5, 7.5, 4.0, 5.0];
        let mut sorted = xs;
        sorted.sort_by(f64::total_cmp);
        let test = hotelling_t2((&xs[..], &ys[..]), (&sorted[..], &ys[..])).unwrap();
        assert!(test.t_squared.abs() < 1e-9);
        assert!(test.p_value > 0.999);
        assert_eq!((test.df1, test.df2), (2.0, 13.0));
    }

    #[test]
    fn test_hotelling_detects_shift() {
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let ys = [1.0, 3.0, 2.0, 5.0, 4.0, 6.0];
        let shifted_xs = xs.map(|x| x + 10.0);
        let test = hotelling_t2((&xs[..], &ys[..]), (&shifted_xs[..], &ys[..])).unwrap();
        assert!(test.p_value < 0.001);
    }

    #[test]
    fn test_hotelling_singular() {
        let xs = [1.0, 2.0, 3.0];
        let ys = [2.0, 4.0, 6.0];
        let err = hotelling_t2((&xs[..], &ys[..]), (&xs[..], &ys[..])).unwrap_err();
        assert_eq!(err, StatsError::SingularCovariance);
        assert!(err.kind().is_degenerate_input());
    }
}
