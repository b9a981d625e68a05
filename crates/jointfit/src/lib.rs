//! Distributional similarity testing for paired bivariate samples.
//!
//! Two samples can agree on every mean and still be distributed very
//! differently: sorting one column of a sample and re-pairing it with the
//! other column keeps both marginals, so t-tests and Hotelling's T² see no
//! difference, but the joint distribution is completely rearranged.
//!
//! This crate discretizes both samples into joint quantile histograms,
//! drops the cells neither sample populates, and compares the rest with a
//! chi-squared homogeneity test (asymptotic or Monte Carlo).
//!
//! # Modules
//!
//! - [`sample`]: Paired bivariate samples
//! - [`config`]: Test parameters
//! - [`tester`]: The similarity test pipeline and its [`tester::Verdict`]
//! - [`comparison`]: Mean-based tests next to the similarity test
//! - [`synthetic`]: Seeded synthetic sensor logs
//!
//! # Examples
//!
//! ```
//! use jointfit::{
//!     comparison::compare_means, config::SimilarityConfig, synthetic::sensor_log,
//!     tester::test_similarity,
//! };
//!
//! let sample = sensor_log(480, 42);
//! let resorted = sample.resorted_x();
//!
//! // Same marginals: mean-based tests find nothing
//! let means = compare_means(&sample, &resorted).unwrap();
//! assert!(!means.rejects_at(0.05));
//!
//! // The joint distribution differs
//! let config = SimilarityConfig::default().simulated(42);
//! let verdict = test_similarity(&sample, &resorted, &config).unwrap();
//! assert!(verdict.rejects_at(0.05));
//! ```

pub use jointfit_stats::{ErrorKind, StatsError};

pub mod comparison;
pub mod config;
pub mod sample;
pub mod synthetic;
pub mod tester;
