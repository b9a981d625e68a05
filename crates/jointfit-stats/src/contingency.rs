//! Reduction of a pair of joint histograms to their informative cells.
//!
//! A cell that neither sample populates carries no information about
//! whether the two distributions differ, and keeping it would inflate the
//! degrees of freedom of a chi-squared comparison. [`reduce_joint_pair`]
//! flattens both tables in the same row-major order and drops those cells.

use serde::Serialize;

use crate::{StatsError, joint_histogram::JointHistogram};

/// Two aligned count vectors with mutually-empty cells removed.
///
/// Position `i` in [`Self::a`], [`Self::b`] and [`Self::cells`] always
/// refers to the same histogram cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReducedCellPair {
    a: Vec<u64>,
    b: Vec<u64>,
    cells: Vec<usize>,
}

impl ReducedCellPair {
    /// Counts of the first sample.
    #[must_use]
    pub fn a(&self) -> &[u64] {
        &self.a
    }

    /// Counts of the second sample.
    #[must_use]
    pub fn b(&self) -> &[u64] {
        &self.b
    }

    /// Row-major index of each retained cell in the original histograms.
    #[must_use]
    pub fn cells(&self) -> &[usize] {
        &self.cells
    }

    /// Number of retained cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Flattens two histograms and removes cells that are empty in both.
///
/// # Errors
///
/// * [`StatsError::BucketCountMismatch`] if the histograms have different shapes
/// * [`StatsError::TooFewInformativeCells`] if fewer than 2 cells remain
///
/// # Examples
///
/// ```
/// use jointfit_stats::{contingency::reduce_joint_pair, joint_histogram::build_joint_histogram};
///
/// let a = build_joint_histogram(&[1.0, 2.0, 3.0, 4.0], &[1.0, 2.0, 3.0, 4.0], 2, 2).unwrap();
/// let b = build_joint_histogram(&[1.0, 2.0, 3.0, 4.0], &[4.0, 1.0, 2.0, 3.0], 2, 2).unwrap();
/// let reduced = reduce_joint_pair(&a, &b).unwrap();
/// assert_eq!(reduced.a(), &[2, 0, 0, 2]);
/// assert_eq!(reduced.b(), &[1, 1, 1, 1]);
/// ```
pub fn reduce_joint_pair(
    hist_a: &JointHistogram,
    hist_b: &JointHistogram,
) -> Result<ReducedCellPair, StatsError> {
    if hist_a.x_buckets() != hist_b.x_buckets() {
        return Err(StatsError::BucketCountMismatch {
            left: hist_a.x_buckets(),
            right: hist_b.x_buckets(),
        });
    }
    if hist_a.y_buckets() != hist_b.y_buckets() {
        return Err(StatsError::BucketCountMismatch {
            left: hist_a.y_buckets(),
            right: hist_b.y_buckets(),
        });
    }

    let mut reduced = ReducedCellPair {
        a: vec![],
        b: vec![],
        cells: vec![],
    };
    let cells = hist_a.flattened().iter().zip(hist_b.flattened());
    for (index, (&a, &b)) in cells.enumerate() {
        if a == 0 && b == 0 {
            continue;
        }
        reduced.a.push(a);
        reduced.b.push(b);
        reduced.cells.push(index);
    }

    if reduced.len() < 2 {
        return Err(StatsError::TooFewInformativeCells {
            informative_cells: reduced.len(),
        });
    }
    Ok(reduced)
}
