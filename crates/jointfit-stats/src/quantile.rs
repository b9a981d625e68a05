//! Quantile (equal-population) binning.
//!
//! Two flavors are provided:
//!
//! - [`quantile_bin`] labels each value by its rank within the values
//!   themselves. Every bin receives `floor(n / b)` or `ceil(n / b)` values,
//!   regardless of ties.
//! - [`BinEdges`] computes cut points from a reference distribution and then
//!   assigns arbitrary values against those cut points. Equal values always
//!   share a bin, so bins are only approximately balanced when the reference
//!   has ties.
//!
//! Bin labels are 1-based, in `[1, b]`.

use serde::Serialize;

use crate::{StatsError, ensure_finite};

/// Per-value bin labels produced by quantile binning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BinAssignment {
    bucket_count: usize,
    labels: Vec<usize>,
}

impl BinAssignment {
    /// The number of bins `b`.
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.bucket_count
    }

    /// One label in `[1, b]` per input value, in input order.
    #[must_use]
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Number of values assigned to each bin, indexed by `label - 1`.
    ///
    /// # Examples
    ///
    /// ```
    /// use jointfit_stats::quantile::quantile_bin;
    ///
    /// let bins = quantile_bin(&[1.0, 1.0, 1.0, 1.0, 1.0], 2).unwrap();
    /// assert_eq!(bins.counts(), vec![3, 2]);
    /// ```
    #[must_use]
    pub fn counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.bucket_count];
        for &label in &self.labels {
            counts[label - 1] += 1;
        }
        counts
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

fn check_arguments(values: &[f64], bucket_count: usize) -> Result<(), StatsError> {
    if bucket_count < 2 {
        return Err(StatsError::TooFewBuckets { bucket_count });
    }
    if values.is_empty() {
        return Err(StatsError::EmptySample);
    }
    ensure_finite(values)
}

/// Assigns each value to one of `bucket_count` equal-population bins.
///
/// Values are ranked by a stable ascending sort, so tied values keep their
/// input order and the earlier one lands in the lower bin. The value with
/// rank `r` (0-based) out of `n` gets label `floor(r * b / n) + 1`.
///
/// More buckets than values (or than distinct values) is allowed; some bins
/// then stay empty or split runs of equal values.
///
/// # Errors
///
/// * [`StatsError::TooFewBuckets`] if `bucket_count < 2`
/// * [`StatsError::EmptySample`] if `values` is empty
/// * [`StatsError::NonFiniteValue`] if any value is NaN or infinite
///
/// # Examples
///
/// ```
/// use jointfit_stats::quantile::quantile_bin;
///
/// // Ties are split by input order.
/// let bins = quantile_bin(&[2.0, 1.0, 2.0, 2.0], 2).unwrap();
/// assert_eq!(bins.labels(), &[1, 1, 2, 2]);
///
/// assert!(quantile_bin(&[1.0, 2.0], 1).is_err());
/// ```
pub fn quantile_bin(values: &[f64], bucket_count: usize) -> Result<BinAssignment, StatsError> {
    check_arguments(values, bucket_count)?;

    let n = values.len();
    let mut order = (0..n).collect::<Vec<_>>();
    // `sort_by` is stable
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut labels = vec![0; n];
    for (rank, &index) in order.iter().enumerate() {
        labels[index] = rank * bucket_count / n + 1;
    }

    Ok(BinAssignment {
        bucket_count,
        labels,
    })
}

/// Quantile cut points of a reference distribution.
///
/// Holds `b` non-decreasing upper edges; edge `i` is the nearest-rank
/// quantile at `i / b`. The last edge is the reference maximum.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinEdges {
    upper_edges: Vec<f64>,
}

impl BinEdges {
    /// Computes `bucket_count` quantile edges from `reference`.
    ///
    /// # Errors
    ///
    /// Same as [`quantile_bin`].
    ///
    /// # Examples
    ///
    /// ```
    /// use jointfit_stats::quantile::BinEdges;
    ///
    /// let edges = BinEdges::from_reference(&[4.0, 1.0, 3.0, 2.0, 6.0, 5.0], 3).unwrap();
    /// assert_eq!(edges.upper_edges(), &[2.0, 4.0, 6.0]);
    /// ```
    pub fn from_reference(reference: &[f64], bucket_count: usize) -> Result<Self, StatsError> {
        check_arguments(reference, bucket_count)?;

        let mut sorted = reference.to_vec();
        sorted.sort_by(f64::total_cmp);
        let n = sorted.len();
        let upper_edges = (1..=bucket_count)
            .map(|i| sorted[(i * n).div_ceil(bucket_count).max(1) - 1])
            .collect();
        Ok(Self { upper_edges })
    }

    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.upper_edges.len()
    }

    #[must_use]
    pub fn upper_edges(&self) -> &[f64] {
        &self.upper_edges
    }

    /// Label in `[1, b]` of a single value.
    ///
    /// A value equal to an edge belongs to the lower bin. Values above the
    /// last edge fall into the last bin, values below the first edge into
    /// the first.
    #[must_use]
    pub fn label_of(&self, value: f64) -> usize {
        let index = self.upper_edges.partition_point(|&edge| edge < value);
        index.min(self.upper_edges.len() - 1) + 1
    }

    /// Assigns every value against these edges.
    ///
    /// # Errors
    ///
    /// * [`StatsError::EmptySample`] if `values` is empty
    /// * [`StatsError::NonFiniteValue`] if any value is NaN or infinite
    ///
    /// # Examples
    ///
    /// ```
    /// use jointfit_stats::quantile::BinEdges;
    ///
    /// let edges = BinEdges::from_reference(&[1.0, 2.0, 3.0, 4.0], 2).unwrap();
    /// let bins = edges.assign(&[0.0, 2.0, 2.5, 10.0]).unwrap();
    /// assert_eq!(bins.labels(), &[1, 1, 2, 2]);
    /// ```
    pub fn assign(&self, values: &[f64]) -> Result<BinAssignment, StatsError> {
        check_arguments(values, self.bucket_count())?;
        Ok(BinAssignment {
            bucket_count: self.bucket_count(),
            labels: values.iter().map(|&v| self.label_of(v)).collect(),
        })
    }
}
