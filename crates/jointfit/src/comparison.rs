//! Side-by-side comparison of mean-based tests and the similarity test.

use jointfit_stats::{
    descriptive::DescriptiveStats,
    location::{HotellingTest, TTest, hotelling_t2, welch_t_test},
};
use serde::Serialize;

use crate::{
    StatsError,
    config::SimilarityConfig,
    sample::BivariateSample,
    tester::{Verdict, test_similarity},
};

/// Mean-based tests of two bivariate samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeanComparison {
    /// Welch's t-test on the x column.
    pub x: TTest,
    /// Welch's t-test on the y column.
    pub y: TTest,
    pub hotelling: HotellingTest,
}

impl MeanComparison {
    /// Whether any of the tests rejects equal means at level `alpha`.
    #[must_use]
    pub fn rejects_at(&self, alpha: f64) -> bool {
        [self.x.p_value, self.y.p_value, self.hotelling.p_value]
            .iter()
            .any(|&p| p < alpha)
    }
}

/// Runs Welch's t-test per dimension and Hotelling's T² on both samples.
///
/// # Errors
///
/// Fails when a sample has fewer than two observations, contains
/// non-finite values, or the pooled covariance is singular.
pub fn compare_means(
    sample_a: &BivariateSample,
    sample_b: &BivariateSample,
) -> Result<MeanComparison, StatsError> {
    Ok(MeanComparison {
        x: welch_t_test(sample_a.xs(), sample_b.xs())?,
        y: welch_t_test(sample_a.ys(), sample_b.ys())?,
        hotelling: hotelling_t2(
            (sample_a.xs(), sample_a.ys()),
            (sample_b.xs(), sample_b.ys()),
        )?,
    })
}

/// Per-dimension summary of a sample.
///
/// Resorting keeps both marginals, so a sample and its resorted
/// counterpart share this summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarginalSummary {
    pub x: DescriptiveStats,
    pub y: DescriptiveStats,
}

impl MarginalSummary {
    /// `None` for an empty sample.
    #[must_use]
    pub fn of(sample: &BivariateSample) -> Option<Self> {
        Some(Self {
            x: DescriptiveStats::new(sample.xs().iter().copied())?,
            y: DescriptiveStats::new(sample.ys().iter().copied())?,
        })
    }
}

/// Everything the resorting demonstration reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResortReport {
    pub observations: usize,
    pub marginals: Option<MarginalSummary>,
    pub means: MeanComparison,
    /// Similarity test with the caller's configuration.
    pub similarity: Verdict,
    /// Asymptotic similarity test on the same pair, reported as-is.
    pub asymptotic: Verdict,
}

/// Compares a sample with its [`BivariateSample::resorted_x`] counterpart.
///
/// The two samples share both marginals, so the mean-based tests are
/// expected to find nothing while the similarity test sees the rearranged
/// joint distribution. The asymptotic run is always included next to the
/// configured one and is not reconciled with it.
///
/// # Errors
///
/// Any error of [`compare_means`] or [`test_similarity`].
pub fn resort_report(
    sample: &BivariateSample,
    config: &SimilarityConfig,
) -> Result<ResortReport, StatsError> {
    let resorted = sample.resorted_x();
    let means = compare_means(sample, &resorted)?;
    let similarity = test_similarity(sample, &resorted, config)?;
    let asymptotic_config = SimilarityConfig {
        simulate: false,
        ..config.clone()
    };
    let asymptotic = test_similarity(sample, &resorted, &asymptotic_config)?;
    Ok(ResortReport {
        observations: sample.len(),
        marginals: MarginalSummary::of(sample),
        means,
        similarity,
        asymptotic,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::sensor_log;

    #[test]
    fn test_resorted_sample_hides_from_mean_tests() {
        let sample = sensor_log(720, 17);
        let config = SimilarityConfig::default().with_bucket_count(8).simulated(2024);
        let report = resort_report(&sample, &config).unwrap();

        assert_eq!(report.observations, 720);
        let marginals = report.marginals.as_ref().unwrap();
        assert_eq!(Some(marginals), MarginalSummary::of(&sample.resorted_x()).as_ref());
        assert_eq!(marginals.y.min, 0.0);
        assert_eq!(marginals.y.max, 719.0);
        assert!(!report.means.rejects_at(0.05), "{:?}", report.means);
        assert!(report.means.x.p_value > 0.99);
        assert!(report.means.hotelling.p_value > 0.99);

        assert!(report.similarity.test.method.is_simulated());
        assert!(report.similarity.p_value < 0.05);
        assert!(report.similarity.rejects_at(0.05));

        assert!(!report.asymptotic.test.method.is_simulated());
        assert!((0.0..=1.0).contains(&report.asymptotic.p_value));
        assert_eq!(report.asymptotic.statistic, report.similarity.statistic);
    }

    #[test]
    fn test_simulated_p_value_is_reproducible() {
        let a = sensor_log(400, 3);
        let b = sensor_log(400, 4);
        let config = SimilarityConfig::default()
            .with_bucket_count(4)
            .simulated(99)
            .with_simulations(300);
        let first = test_similarity(&a, &b, &config).unwrap();
        let second = test_similarity(&a, &b, &config).unwrap();
        assert_eq!(first.p_value.to_bits(), second.p_value.to_bits());
        assert_eq!(first, second);
    }

    #[test]
    fn test_same_distribution_not_rejected() {
        // Two independent draws from the same process
        let a = sensor_log(600, 1);
        let b = sensor_log(600, 2);
        let config = SimilarityConfig::default().with_bucket_count(4).simulated(5);
        let verdict = test_similarity(&a, &b, &config).unwrap();
        assert!(verdict.p_value > 0.001, "{verdict:?}");
    }

    #[test]
    fn test_compare_means_too_small() {
        let tiny = BivariateSample::new(vec![1.0], vec![2.0]).unwrap();
        let err = compare_means(&tiny, &tiny).unwrap_err();
        assert!(err.kind().is_invalid_argument());
    }
}
