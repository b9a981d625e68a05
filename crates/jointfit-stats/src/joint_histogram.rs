use serde::Serialize;

use crate::{
    StatsError,
    quantile::{BinAssignment, BinEdges, quantile_bin},
};

/// A two-dimensional occupancy table over binned pairs of values.
///
/// Rows are x-bins and columns are y-bins. Counts are stored densely in
/// row-major order, so a table built from `n` pairs always sums to `n`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JointHistogram {
    x_buckets: usize,
    y_buckets: usize,
    counts: Vec<u64>,
}

impl JointHistogram {
    /// Counts co-occurrences of two label sequences describing the same pairs.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::LengthMismatch`] if the assignments label a
    /// different number of values.
    pub fn from_assignments(x: &BinAssignment, y: &BinAssignment) -> Result<Self, StatsError> {
        if x.len() != y.len() {
            return Err(StatsError::LengthMismatch {
                x_len: x.len(),
                y_len: y.len(),
            });
        }

        let x_buckets = x.bucket_count();
        let y_buckets = y.bucket_count();
        let mut counts = vec![0; x_buckets * y_buckets];
        for (&bx, &by) in x.labels().iter().zip(y.labels()) {
            counts[(bx - 1) * y_buckets + (by - 1)] += 1;
        }

        Ok(Self {
            x_buckets,
            y_buckets,
            counts,
        })
    }

    #[must_use]
    pub fn x_buckets(&self) -> usize {
        self.x_buckets
    }

    #[must_use]
    pub fn y_buckets(&self) -> usize {
        self.y_buckets
    }

    /// Count of the cell at 1-based labels `(bin_x, bin_y)`.
    ///
    /// # Panics
    ///
    /// Panics if either label is outside its dimension.
    #[must_use]
    pub fn get(&self, bin_x: usize, bin_y: usize) -> u64 {
        assert!((1..=self.x_buckets).contains(&bin_x), "x bin out of range");
        assert!((1..=self.y_buckets).contains(&bin_y), "y bin out of range");
        self.counts[(bin_x - 1) * self.y_buckets + (bin_y - 1)]
    }

    /// All cells in row-major order.
    #[must_use]
    pub fn flattened(&self) -> &[u64] {
        &self.counts
    }

    /// Iterates over the rows (one slice per x-bin).
    pub fn rows(&self) -> impl Iterator<Item = &[u64]> + '_ {
        self.counts.chunks(self.y_buckets)
    }

    /// Total number of pairs counted.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

fn check_paired(xs: &[f64], ys: &[f64]) -> Result<(), StatsError> {
    if xs.len() == ys.len() {
        Ok(())
    } else {
        Err(StatsError::LengthMismatch {
            x_len: xs.len(),
            y_len: ys.len(),
        })
    }
}

/// Builds a joint histogram by quantile-binning each dimension on its own values.
///
/// `xs[i]` and `ys[i]` are the two coordinates of one observation. Each
/// dimension is binned with [`quantile_bin`], so the marginal counts are
/// balanced and only the joint arrangement of the pairs shapes the table.
///
/// # Errors
///
/// * [`StatsError::LengthMismatch`] if `xs` and `ys` differ in length
/// * any error of [`quantile_bin`]
///
/// # Examples
///
/// ```
/// use jointfit_stats::joint_histogram::build_joint_histogram;
///
/// let xs = [1.0, 2.0, 3.0, 4.0];
/// let ys = [10.0, 20.0, 30.0, 40.0];
/// let hist = build_joint_histogram(&xs, &ys, 2, 2).unwrap();
/// assert_eq!(hist.flattened(), &[2, 0, 0, 2]);
/// ```
pub fn build_joint_histogram(
    xs: &[f64],
    ys: &[f64],
    x_buckets: usize,
    y_buckets: usize,
) -> Result<JointHistogram, StatsError> {
    check_paired(xs, ys)?;
    let x = quantile_bin(xs, x_buckets)?;
    let y = quantile_bin(ys, y_buckets)?;
    JointHistogram::from_assignments(&x, &y)
}

/// Builds a joint histogram against precomputed bin edges.
///
/// Use this when several samples must share the same cut points, e.g.
/// edges computed from the pooled samples.
///
/// # Errors
///
/// * [`StatsError::LengthMismatch`] if `xs` and `ys` differ in length
/// * any error of [`BinEdges::assign`]
pub fn build_joint_histogram_with_edges(
    xs: &[f64],
    ys: &[f64],
    x_edges: &BinEdges,
    y_edges: &BinEdges,
) -> Result<JointHistogram, StatsError> {
    check_paired(xs, ys)?;
    let x = x_edges.assign(xs)?;
    let y = y_edges.assign(ys)?;
    JointHistogram::from_assignments(&x, &y)
}
