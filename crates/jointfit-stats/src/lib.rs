//! Statistical primitives for comparing paired bivariate samples.
//!
//! This crate provides the numeric building blocks used by the `jointfit`
//! similarity tester:
//!
//! - **Descriptive statistics**: mean, median, variance, standard deviation
//! - **Quantile binning**: equal-population bin labels and reference bin edges
//! - **Joint histograms**: `b × b` occupancy tables over binned pairs
//! - **Contingency reduction**: removal of cells neither sample populates
//! - **Chi-squared homogeneity**: Pearson test with asymptotic or Monte Carlo p-values
//! - **Random tables**: margin-conditioned random contingency tables
//! - **Location tests**: Welch's t-test and two-sample Hotelling's T²
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`quantile`]: Rank-based quantile binning and quantile bin edges
//! - [`joint_histogram`]: Joint occupancy tables over two binned dimensions
//! - [`contingency`]: Flattening and zero-cell reduction of histogram pairs
//! - [`chi_squared`]: Pearson chi-squared homogeneity test
//! - [`random_table`]: Random r×c tables with fixed margins
//! - [`location`]: Mean-comparison tests
//!
//! # Examples
//!
//! ## Binning values into equal-population buckets
//!
//! ```
//! use jointfit_stats::quantile::quantile_bin;
//!
//! let values = [0.3, 9.1, 4.2, 7.7, 1.5, 5.0];
//! let bins = quantile_bin(&values, 3).unwrap();
//! assert_eq!(bins.labels(), &[1, 3, 2, 3, 1, 2]);
//! ```
//!
//! ## Testing two rows of counts for homogeneity
//!
//! ```
//! use jointfit_stats::chi_squared::{PValueMethod, chi_squared_homogeneity};
//!
//! let a = [30, 10, 20];
//! let b = [10, 30, 20];
//! let test = chi_squared_homogeneity(&a, &b, PValueMethod::Asymptotic).unwrap();
//! assert_eq!(test.degrees_of_freedom, Some(2));
//! assert!(test.p_value < 0.001);
//! ```

pub mod chi_squared;
pub mod contingency;
pub mod descriptive;
pub mod joint_histogram;
pub mod location;
pub mod quantile;
pub mod random_table;

/// Broad category of a [`StatsError`].
///
/// Callers can branch on the category without matching every variant:
/// invalid arguments are caller bugs, degenerate input means the data does
/// not support the requested test (e.g. too few populated cells).
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum ErrorKind {
    #[display("invalid argument")]
    InvalidArgument,
    #[display("degenerate input")]
    DegenerateInput,
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum StatsError {
    #[display("bucket count must be at least 2, got {bucket_count}")]
    TooFewBuckets { bucket_count: usize },
    #[display("sample is empty")]
    EmptySample,
    #[display("non-finite value {value} at index {index}")]
    NonFiniteValue { index: usize, value: f64 },
    #[display("paired dimensions differ in length: {x_len} x values, {y_len} y values")]
    LengthMismatch { x_len: usize, y_len: usize },
    #[display("histograms use different bucket counts: {left} and {right}")]
    BucketCountMismatch { left: usize, right: usize },
    #[display("simulation count must be positive")]
    NoSimulations,
    #[display("row totals sum to {row_sum} but column totals sum to {column_sum}")]
    MarginMismatch { row_sum: u64, column_sum: u64 },
    #[display("contingency table row {row} has no observations")]
    EmptyRow { row: usize },
    #[display("sample needs at least {required} values, got {actual}")]
    TooFewValues { required: usize, actual: usize },
    #[display(
        "only {informative_cells} informative cell(s) left after dropping empty cells, at least 2 required"
    )]
    TooFewInformativeCells { informative_cells: usize },
    #[display("pooled covariance matrix is singular")]
    SingularCovariance,
}

impl StatsError {
    /// Returns the category this error belongs to.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TooFewInformativeCells { .. } | Self::SingularCovariance => {
                ErrorKind::DegenerateInput
            }
            Self::TooFewBuckets { .. }
            | Self::EmptySample
            | Self::NonFiniteValue { .. }
            | Self::LengthMismatch { .. }
            | Self::BucketCountMismatch { .. }
            | Self::NoSimulations
            | Self::MarginMismatch { .. }
            | Self::EmptyRow { .. }
            | Self::TooFewValues { .. } => ErrorKind::InvalidArgument,
        }
    }
}

/// Fails with [`StatsError::NonFiniteValue`] on the first NaN or infinite value.
pub(crate) fn ensure_finite(values: &[f64]) -> Result<(), StatsError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(StatsError::NonFiniteValue {
            index,
            value: values[index],
        }),
        None => Ok(()),
    }
}
