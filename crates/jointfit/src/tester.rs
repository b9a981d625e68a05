//! Distributional similarity test for two bivariate samples.
//!
//! The pipeline:
//!
//! 1. Quantile-bin both dimensions of each sample ([`Binning`] decides
//!    whether cut points come from each sample or from the pooled values)
//! 2. Count `(x-bin, y-bin)` pairs into a joint histogram per sample
//! 3. Drop cells that neither sample populates
//! 4. Run a chi-squared homogeneity test on the two remaining count vectors
//!
//! Mean-based tests only see the first moments; this pipeline compares the
//! whole (discretized) joint distribution.

use jointfit_stats::{
    chi_squared::{HomogeneityTest, chi_squared_homogeneity},
    contingency::{ReducedCellPair, reduce_joint_pair},
    joint_histogram::{JointHistogram, build_joint_histogram, build_joint_histogram_with_edges},
    quantile::BinEdges,
};
use serde::Serialize;

use crate::{
    StatsError,
    config::{Binning, SimilarityConfig},
    sample::BivariateSample,
};

/// Outcome of [`test_similarity`].
///
/// No significance threshold is applied; compare [`Self::p_value`] against
/// the caller's own level, e.g. with [`Self::rejects_at`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub statistic: f64,
    pub p_value: f64,
    /// `false` when some expected cell count is below 5.
    pub reliable: bool,
    pub bucket_count: usize,
    pub binning: Binning,
    /// The informative cells both samples were compared on.
    pub cells: ReducedCellPair,
    /// Full chi-squared result, including method and degrees of freedom.
    pub test: HomogeneityTest,
}

impl Verdict {
    /// Whether the equal-distribution hypothesis is rejected at level `alpha`.
    #[must_use]
    pub fn rejects_at(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }

    #[must_use]
    pub fn informative_cells(&self) -> usize {
        self.cells.len()
    }
}

/// Joint histograms of both samples, binned according to `config`.
///
/// # Errors
///
/// Any binning error, e.g. [`StatsError::TooFewBuckets`] or
/// [`StatsError::EmptySample`].
pub fn joint_histograms(
    sample_a: &BivariateSample,
    sample_b: &BivariateSample,
    config: &SimilarityConfig,
) -> Result<[JointHistogram; 2], StatsError> {
    let b = config.bucket_count;
    match config.binning {
        Binning::Separate => Ok([
            build_joint_histogram(sample_a.xs(), sample_a.ys(), b, b)?,
            build_joint_histogram(sample_b.xs(), sample_b.ys(), b, b)?,
        ]),
        Binning::Pooled => {
            if sample_a.is_empty() || sample_b.is_empty() {
                return Err(StatsError::EmptySample);
            }
            let pooled_xs = [sample_a.xs(), sample_b.xs()].concat();
            let pooled_ys = [sample_a.ys(), sample_b.ys()].concat();
            let x_edges = BinEdges::from_reference(&pooled_xs, b)?;
            let y_edges = BinEdges::from_reference(&pooled_ys, b)?;
            tracing::debug!(
                x_edges = ?x_edges.upper_edges(),
                y_edges = ?y_edges.upper_edges(),
                "pooled bin edges"
            );
            Ok([
                build_joint_histogram_with_edges(sample_a.xs(), sample_a.ys(), &x_edges, &y_edges)?,
                build_joint_histogram_with_edges(sample_b.xs(), sample_b.ys(), &x_edges, &y_edges)?,
            ])
        }
    }
}

/// Tests whether two bivariate samples share the same joint distribution.
///
/// # Errors
///
/// * [`StatsError::TooFewBuckets`] if `config.bucket_count < 2`
/// * [`StatsError::EmptySample`] if either sample is empty
/// * [`StatsError::NonFiniteValue`] if a sample contains NaN or infinity
/// * [`StatsError::NoSimulations`] if simulating with zero simulations
/// * [`StatsError::TooFewInformativeCells`] if fewer than 2 cells are
///   populated; retry with a different bucket count
///
/// Use [`StatsError::kind`] to tell invalid arguments from degenerate input.
///
/// # Examples
///
/// ```
/// use jointfit::{config::SimilarityConfig, sample::BivariateSample, tester::test_similarity};
///
/// let minutes = (0..200).map(f64::from).collect::<Vec<_>>();
/// let a = BivariateSample::new(minutes.iter().map(|m| (m * 7.0) % 13.0).collect(), minutes).unwrap();
/// let b = a.resorted_x();
///
/// let config = SimilarityConfig::default().with_bucket_count(4).simulated(1);
/// let verdict = test_similarity(&a, &b, &config).unwrap();
/// assert!(verdict.rejects_at(0.05));
/// ```
pub fn test_similarity(
    sample_a: &BivariateSample,
    sample_b: &BivariateSample,
    config: &SimilarityConfig,
) -> Result<Verdict, StatsError> {
    let [hist_a, hist_b] = joint_histograms(sample_a, sample_b, config)?;
    tracing::debug!(
        a = sample_a.len(),
        b = sample_b.len(),
        bucket_count = config.bucket_count,
        binning = ?config.binning,
        "built joint histograms"
    );

    let cells = reduce_joint_pair(&hist_a, &hist_b)?;
    tracing::debug!(
        informative_cells = cells.len(),
        total_cells = hist_a.flattened().len(),
        "dropped mutually empty cells"
    );

    let test = chi_squared_homogeneity(cells.a(), cells.b(), config.p_value_method())?;
    tracing::info!(
        statistic = test.statistic,
        p_value = test.p_value,
        reliable = test.reliable,
        "similarity test finished"
    );

    Ok(Verdict {
        statistic: test.statistic,
        p_value: test.p_value,
        reliable: test.reliable,
        bucket_count: config.bucket_count,
        binning: config.binning,
        cells,
        test,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn sample(xs: &[f64], ys: &[f64]) -> BivariateSample {
        BivariateSample::new(xs.to_vec(), ys.to_vec()).unwrap()
    }

    #[test]
    fn test_single_bucket_is_invalid() {
        let a = sample(&[1.0, 2.0, 3.0], &[3.0, 1.0, 2.0]);
        let config = SimilarityConfig::default().with_bucket_count(1);
        let err = test_similarity(&a, &a, &config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_empty_sample_is_invalid() {
        let a = sample(&[1.0, 2.0, 3.0], &[3.0, 1.0, 2.0]);
        let empty = sample(&[], &[]);
        for binning in [Binning::Separate, Binning::Pooled] {
            let config = SimilarityConfig::default().with_binning(binning);
            let err = test_similarity(&a, &empty, &config).unwrap_err();
            assert_eq!(err, StatsError::EmptySample);
        }
    }

    #[test]
    fn test_degenerate_input() {
        let constant = sample(&[2.0; 10], &[5.0; 10]);
        let config = SimilarityConfig::default()
            .with_bucket_count(3)
            .with_binning(Binning::Pooled);
        let err = test_similarity(&constant, &constant, &config).unwrap_err();
        assert!(err.kind().is_degenerate_input());
    }

    #[test]
    fn test_more_buckets_than_distinct_values() {
        let a = sample(&[1.0, 2.0, 1.0, 2.0, 1.0, 2.0], &[0.0, 0.0, 1.0, 1.0, 2.0, 2.0]);
        let b = sample(&[2.0, 1.0, 2.0, 1.0, 2.0, 1.0], &[0.0, 0.0, 1.0, 1.0, 2.0, 2.0]);
        let config = SimilarityConfig::default().with_bucket_count(8);
        let verdict = test_similarity(&a, &b, &config).unwrap();
        assert!(verdict.informative_cells() >= 2);
        assert!(!verdict.reliable);
    }

    #[test]
    fn test_identical_samples_do_not_differ() {
        let xs = (0..400_u32).map(|i| f64::from((i * 37) % 101)).collect::<Vec<_>>();
        let ys = (0..400_u32).map(|i| f64::from((i * 53) % 97)).collect::<Vec<_>>();
        let a = sample(&xs, &ys);
        let config = SimilarityConfig::default().with_bucket_count(4);
        let verdict = test_similarity(&a, &a, &config).unwrap();
        assert!(verdict.statistic.abs() < 1e-9);
        assert!(!verdict.rejects_at(0.05));
        assert_eq!(verdict.test.degrees_of_freedom, Some(verdict.informative_cells() - 1));
    }

    #[test]
    fn test_pooled_binning_detects_marginal_shift() {
        let ys = (0..300_u32).map(f64::from).collect::<Vec<_>>();
        let xs = ys.iter().map(|y| (y * 17.0) % 29.0).collect::<Vec<_>>();
        let shifted = xs.iter().map(|x| x + 15.0).collect::<Vec<_>>();
        let a = sample(&xs, &ys);
        let b = sample(&shifted, &ys);

        // Separate binning only sees the (unchanged) joint arrangement
        let separate = SimilarityConfig::default().with_bucket_count(4);
        let verdict = test_similarity(&a, &b, &separate).unwrap();
        assert!(verdict.statistic.abs() < 1e-9);

        let pooled = separate.with_binning(Binning::Pooled);
        let verdict = test_similarity(&a, &b, &pooled).unwrap();
        assert!(verdict.rejects_at(0.001));
        assert_eq!(verdict.binning, Binning::Pooled);
    }
}
