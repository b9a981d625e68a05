//! Pearson chi-squared test of homogeneity for two rows of counts.
//!
//! The two count vectors are the rows of a 2×k contingency table. Under the
//! null hypothesis both rows are drawn from the same categorical
//! distribution, so the expected count of a cell is
//! `row_total * column_total / grand_total`.
//!
//! # P-values
//!
//! - [`PValueMethod::Asymptotic`] uses the chi-squared distribution with
//!   `k - 1` degrees of freedom. The approximation is poor when expected
//!   counts are small; the result is then flagged as unreliable and a
//!   warning is logged.
//! - [`PValueMethod::MonteCarlo`] compares the observed statistic against
//!   statistics of random tables sharing the observed margins (see
//!   [`crate::random_table`]). The estimate is reproducible for a given
//!   seed and does not depend on the asymptotic approximation.

use rand::SeedableRng as _;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ChiSquared, ContinuousCDF as _};

use crate::{StatsError, random_table::RandomTableSampler};

/// Default number of simulated tables for Monte Carlo p-values.
pub const DEFAULT_SIMULATIONS: usize = 2000;

/// Expected cell counts below this make the asymptotic approximation unreliable.
pub const MIN_RELIABLE_EXPECTED: f64 = 5.0;

/// How the p-value of a homogeneity test is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PValueMethod {
    /// Chi-squared distribution with `k - 1` degrees of freedom.
    Asymptotic,
    /// Fraction of simulated fixed-margin tables at least as extreme.
    MonteCarlo { simulations: usize, seed: u64 },
}

impl PValueMethod {
    /// Monte Carlo with [`DEFAULT_SIMULATIONS`] tables.
    #[must_use]
    pub fn monte_carlo(seed: u64) -> Self {
        Self::MonteCarlo {
            simulations: DEFAULT_SIMULATIONS,
            seed,
        }
    }

    #[must_use]
    pub fn is_simulated(&self) -> bool {
        matches!(self, Self::MonteCarlo { .. })
    }
}

/// Result of [`chi_squared_homogeneity`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomogeneityTest {
    /// Pearson chi-squared statistic.
    pub statistic: f64,
    /// Estimated p-value.
    pub p_value: f64,
    /// `k - 1` for the asymptotic method, `None` when simulated.
    pub degrees_of_freedom: Option<usize>,
    /// `false` when any expected cell count is below [`MIN_RELIABLE_EXPECTED`].
    pub reliable: bool,
    /// Smallest expected cell count of the table.
    pub min_expected: f64,
    /// Number of columns that entered the test.
    pub columns: usize,
    /// The method the p-value was computed with.
    pub method: PValueMethod,
}

/// Fixed margins of a 2×k table and the derived expected counts.
#[derive(Debug, Clone)]
struct TwoRowTable {
    row_totals: [u64; 2],
    column_totals: Vec<u64>,
    expected: Vec<f64>,
}

impl TwoRowTable {
    #[expect(clippy::cast_precision_loss)]
    fn new(a: &[u64], b: &[u64]) -> Result<Self, StatsError> {
        let row_totals = [a.iter().sum::<u64>(), b.iter().sum::<u64>()];
        if let Some(row) = row_totals.iter().position(|&total| total == 0) {
            return Err(StatsError::EmptyRow { row });
        }
        let column_totals = a.iter().zip(b).map(|(a, b)| a + b).collect::<Vec<_>>();
        let grand_total = (row_totals[0] + row_totals[1]) as f64;
        let expected = row_totals
            .iter()
            .flat_map(|&row| {
                column_totals
                    .iter()
                    .map(move |&column| row as f64 * column as f64 / grand_total)
            })
            .collect();
        Ok(Self {
            row_totals,
            column_totals,
            expected,
        })
    }

    fn columns(&self) -> usize {
        self.column_totals.len()
    }

    /// Pearson statistic of a row-major 2×k table with these margins.
    #[expect(clippy::cast_precision_loss)]
    fn statistic(&self, cells: &[u64]) -> f64 {
        cells
            .iter()
            .zip(&self.expected)
            .map(|(&observed, &expected)| (observed as f64 - expected).powi(2) / expected)
            .sum()
    }

    fn min_expected(&self) -> f64 {
        self.expected.iter().copied().fold(f64::INFINITY, f64::min)
    }
}

/// Tests whether two rows of counts come from the same distribution.
///
/// Columns whose total is zero carry no information and are ignored; the
/// remaining column count `k` must be at least 2.
///
/// # Errors
///
/// * [`StatsError::LengthMismatch`] if `a` and `b` differ in length
/// * [`StatsError::EmptyRow`] if either row sums to zero
/// * [`StatsError::NoSimulations`] for Monte Carlo with zero simulations
/// * [`StatsError::TooFewInformativeCells`] if fewer than 2 columns are non-empty
///
/// # Examples
///
/// ```
/// use jointfit_stats::chi_squared::{PValueMethod, chi_squared_homogeneity};
///
/// let a = [12, 18, 30, 40];
/// let b = [14, 16, 31, 39];
/// let test = chi_squared_homogeneity(&a, &b, PValueMethod::monte_carlo(1)).unwrap();
/// assert_eq!(test.degrees_of_freedom, None);
/// assert!(test.p_value > 0.5);
/// assert!(test.reliable);
/// ```
pub fn chi_squared_homogeneity(
    a: &[u64],
    b: &[u64],
    method: PValueMethod,
) -> Result<HomogeneityTest, StatsError> {
    if a.len() != b.len() {
        return Err(StatsError::LengthMismatch {
            x_len: a.len(),
            y_len: b.len(),
        });
    }
    if let PValueMethod::MonteCarlo { simulations: 0, .. } = method {
        return Err(StatsError::NoSimulations);
    }

    let (a, b): (Vec<u64>, Vec<u64>) = a
        .iter()
        .zip(b)
        .filter(|&(&a, &b)| a + b > 0)
        .map(|(&a, &b)| (a, b))
        .unzip();
    if a.len() < 2 {
        return Err(StatsError::TooFewInformativeCells {
            informative_cells: a.len(),
        });
    }

    let table = TwoRowTable::new(&a, &b)?;
    let observed = [a, b].concat();
    let statistic = table.statistic(&observed);
    let min_expected = table.min_expected();
    let reliable = min_expected >= MIN_RELIABLE_EXPECTED;
    let columns = table.columns();

    let (p_value, degrees_of_freedom) = match method {
        PValueMethod::Asymptotic => {
            if !reliable {
                tracing::warn!(
                    min_expected,
                    columns,
                    "chi-squared approximation may be incorrect: expected cell count below {MIN_RELIABLE_EXPECTED}"
                );
            }
            let df = columns - 1;
            (asymptotic_p_value(statistic, df), Some(df))
        }
        PValueMethod::MonteCarlo { simulations, seed } => (
            simulated_p_value(&table, statistic, simulations, seed)?,
            None,
        ),
    };

    tracing::debug!(
        statistic,
        p_value,
        columns,
        min_expected,
        ?method,
        "chi-squared homogeneity test"
    );

    Ok(HomogeneityTest {
        statistic,
        p_value,
        degrees_of_freedom,
        reliable,
        min_expected,
        columns,
        method,
    })
}

#[expect(clippy::cast_precision_loss)]
fn asymptotic_p_value(statistic: f64, degrees_of_freedom: usize) -> f64 {
    ChiSquared::new(degrees_of_freedom as f64)
        .expect("degrees of freedom are positive")
        .sf(statistic)
}

/// `(1 + #{simulated >= observed}) / (simulations + 1)`.
///
/// The comparison uses a relative tolerance of 64 ulps so that simulated
/// tables identical to the observed one count as "at least as extreme"
/// despite rounding differences.
#[expect(clippy::cast_precision_loss)]
fn simulated_p_value(
    table: &TwoRowTable,
    observed: f64,
    simulations: usize,
    seed: u64,
) -> Result<f64, StatsError> {
    let sampler = RandomTableSampler::new(table.row_totals.to_vec(), table.column_totals.clone())?;
    let mut rng = Pcg32::seed_from_u64(seed);
    let threshold = observed * (1.0 - 64.0 * f64::EPSILON);

    let mut cells = vec![0; 2 * table.columns()];
    let mut at_least_as_extreme = 0_usize;
    for _ in 0..simulations {
        sampler.sample_into(&mut rng, &mut cells);
        if table.statistic(&cells) >= threshold {
            at_least_as_extreme += 1;
        }
    }

    Ok((1 + at_least_as_extreme) as f64 / (simulations + 1) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: [u64; 4] = [20, 25, 30, 25];
    const B: [u64; 4] = [25, 22, 28, 30];

    #[test]
    fn test_statistic_and_asymptotic_p_value() {
        let test = chi_squared_homogeneity(&A, &B, PValueMethod::Asymptotic).unwrap();
        assert!((test.statistic - 1.149_288_362_787_996_6).abs() < 1e-9);
        assert!((test.p_value - 0.765_190_938_462_637).abs() < 1e-6);
        assert_eq!(test.degrees_of_freedom, Some(3));
        assert!(test.reliable);
        assert_eq!(test.columns, 4);
    }

    #[test]
    fn test_identical_rows() {
        let test = chi_squared_homogeneity(&A, &A, PValueMethod::Asymptotic).unwrap();
        assert!(test.statistic.abs() < 1e-12);
        assert!((test.p_value - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_columns_ignored() {
        let a = [20, 0, 25, 30, 25];
        let b = [25, 0, 22, 28, 30];
        let with_zero = chi_squared_homogeneity(&a, &b, PValueMethod::Asymptotic).unwrap();
        let without = chi_squared_homogeneity(&A, &B, PValueMethod::Asymptotic).unwrap();
        assert_eq!(with_zero, without);
    }

    #[test]
    fn test_small_expected_is_unreliable() {
        let test = chi_squared_homogeneity(&[3, 1], &[1, 3], PValueMethod::Asymptotic).unwrap();
        assert!(!test.reliable);
        assert!((test.min_expected - 2.0).abs() < 1e-12);

        let test =
            chi_squared_homogeneity(&[3, 1], &[1, 3], PValueMethod::monte_carlo(3)).unwrap();
        assert!(!test.reliable);
    }

    #[test]
    fn test_invalid_arguments() {
        let err = chi_squared_homogeneity(&[1, 2], &[1], PValueMethod::Asymptotic).unwrap_err();
        assert!(err.kind().is_invalid_argument());

        let err = chi_squared_homogeneity(&[0, 0], &[1, 2], PValueMethod::Asymptotic).unwrap_err();
        assert_eq!(err, StatsError::EmptyRow { row: 0 });

        let method = PValueMethod::MonteCarlo {
            simulations: 0,
            seed: 0,
        };
        let err = chi_squared_homogeneity(&A, &B, method).unwrap_err();
        assert_eq!(err, StatsError::NoSimulations);

        let err = chi_squared_homogeneity(&[4, 0], &[5, 0], PValueMethod::Asymptotic).unwrap_err();
        assert!(err.kind().is_degenerate_input());
    }

    #[test]
    fn test_monte_carlo_is_reproducible() {
        let method = PValueMethod::monte_carlo(2024);
        let first = chi_squared_homogeneity(&A, &B, method).unwrap();
        let second = chi_squared_homogeneity(&A, &B, method).unwrap();
        assert_eq!(first.p_value.to_bits(), second.p_value.to_bits());
        assert_eq!(first, second);
    }

    #[test]
    fn test_monte_carlo_seeds_agree_within_error() {
        let asymptotic = chi_squared_homogeneity(&A, &B, PValueMethod::Asymptotic).unwrap();
        let p_values = [1, 2, 3]
            .map(|seed| {
                chi_squared_homogeneity(&A, &B, PValueMethod::monte_carlo(seed))
                    .unwrap()
                    .p_value
            });
        for p in p_values {
            assert!((p - p_values[0]).abs() < 0.05, "{p_values:?}");
            assert!((p - asymptotic.p_value).abs() < 0.06, "{p} vs {asymptotic:?}");
        }
    }

    #[test]
    #[expect(clippy::cast_precision_loss)]
    fn test_monte_carlo_p_value_floor() {
        // Perfectly separated rows: no simulated table is as extreme
        let a = [50, 50, 0, 0];
        let b = [0, 0, 50, 50];
        let simulations = 500;
        let method = PValueMethod::MonteCarlo {
            simulations,
            seed: 5,
        };
        let test = chi_squared_homogeneity(&a, &b, method).unwrap();
        assert!((test.p_value - 1.0 / (simulations + 1) as f64).abs() < 1e-15);
    }

    #[test]
    fn test_is_simulated() {
        let method = PValueMethod::monte_carlo(9);
        assert!(method.is_simulated());
        assert!(!PValueMethod::Asymptotic.is_simulated());
    }
}
