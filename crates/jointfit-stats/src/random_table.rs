//! Random contingency tables with fixed margins.
//!
//! Under the null hypothesis of homogeneity (or independence), the cell
//! counts of an r×c table conditioned on its row and column totals follow
//! the multivariate hypergeometric distribution. [`RandomTableSampler`]
//! draws from it exactly, one row at a time: each row's total is split
//! across the columns by successive hypergeometric draws from the items
//! not yet assigned to earlier rows, which is the conditional
//! decomposition behind Patefield's algorithm.

use rand::{Rng, distr::Distribution as _};
use rand_distr::Hypergeometric;

use crate::StatsError;

/// Samples r×c tables with given row and column totals.
///
/// # Examples
///
/// ```
/// use jointfit_stats::random_table::RandomTableSampler;
/// use rand::SeedableRng as _;
/// use rand_pcg::Pcg32;
///
/// let sampler = RandomTableSampler::new(vec![3, 5], vec![2, 4, 2]).unwrap();
/// let mut rng = Pcg32::seed_from_u64(7);
/// let mut table = vec![0; 6];
/// sampler.sample_into(&mut rng, &mut table);
///
/// assert_eq!(table[..3].iter().sum::<u64>(), 3);
/// assert_eq!(table[3..].iter().sum::<u64>(), 5);
/// assert_eq!(table[1] + table[4], 4);
/// ```
#[derive(Debug, Clone)]
pub struct RandomTableSampler {
    row_totals: Vec<u64>,
    column_totals: Vec<u64>,
}

impl RandomTableSampler {
    /// Creates a sampler for the given margins.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::MarginMismatch`] if the row and column totals
    /// do not add up to the same grand total, and [`StatsError::EmptySample`]
    /// if either margin has no entries.
    pub fn new(row_totals: Vec<u64>, column_totals: Vec<u64>) -> Result<Self, StatsError> {
        if row_totals.is_empty() || column_totals.is_empty() {
            return Err(StatsError::EmptySample);
        }
        let row_sum = row_totals.iter().sum::<u64>();
        let column_sum = column_totals.iter().sum::<u64>();
        if row_sum != column_sum {
            return Err(StatsError::MarginMismatch {
                row_sum,
                column_sum,
            });
        }
        Ok(Self {
            row_totals,
            column_totals,
        })
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.row_totals.len()
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        self.column_totals.len()
    }

    /// Fills `table` (row-major, `rows × columns`) with a random table.
    ///
    /// # Panics
    ///
    /// Panics if `table` does not have exactly `rows × columns` cells.
    pub fn sample_into<R>(&self, rng: &mut R, table: &mut [u64])
    where
        R: Rng + ?Sized,
    {
        let columns = self.columns();
        assert_eq!(table.len(), self.rows() * columns, "table size mismatch");

        let mut column_left = self.column_totals.clone();
        let (last_row, rows) = self
            .row_totals
            .split_last()
            .expect("sampler has at least one row");

        for (row, &row_total) in rows.iter().enumerate() {
            let cells = &mut table[row * columns..(row + 1) * columns];
            let mut need = row_total;
            let mut pool = column_left.iter().sum::<u64>();
            for (cell, left) in cells.iter_mut().zip(&mut column_left) {
                let drawn = draw_hypergeometric(rng, pool, *left, need);
                pool -= *left;
                *left -= drawn;
                need -= drawn;
                *cell = drawn;
            }
            debug_assert_eq!(need, 0);
        }

        let last = &mut table[rows.len() * columns..];
        last.copy_from_slice(&column_left);
        debug_assert_eq!(last.iter().sum::<u64>(), *last_row);
    }
}

/// Number of marked items among `sample` draws without replacement from
/// `population` items of which `marked` are marked.
fn draw_hypergeometric<R>(rng: &mut R, population: u64, marked: u64, sample: u64) -> u64
where
    R: Rng + ?Sized,
{
    if sample == 0 || marked == 0 {
        return 0;
    }
    if marked == population {
        return sample;
    }
    if sample == population {
        return marked;
    }
    Hypergeometric::new(population, marked, sample)
        .expect("margins keep hypergeometric parameters within the population")
        .sample(rng)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn margins(table: &[u64], rows: usize, columns: usize) -> (Vec<u64>, Vec<u64>) {
        let row_totals = table.chunks(columns).map(|r| r.iter().sum()).collect();
        let column_totals = (0..columns)
            .map(|c| (0..rows).map(|r| table[r * columns + c]).sum())
            .collect();
        (row_totals, column_totals)
    }

    #[test]
    fn test_margin_mismatch() {
        let err = RandomTableSampler::new(vec![3, 4], vec![2, 2]).unwrap_err();
        assert_eq!(
            err,
            StatsError::MarginMismatch {
                row_sum: 7,
                column_sum: 4
            }
        );
    }

    #[test]
    fn test_preserves_margins() {
        let rows = vec![40, 7, 0, 13];
        let columns = vec![1, 0, 22, 9, 28];
        let sampler = RandomTableSampler::new(rows.clone(), columns.clone()).unwrap();
        let mut rng = Pcg32::seed_from_u64(42);
        let mut table = vec![0; 20];
        for _ in 0..200 {
            sampler.sample_into(&mut rng, &mut table);
            assert_eq!(margins(&table, 4, 5), (rows.clone(), columns.clone()));
        }
    }

    #[test]
    fn test_same_seed_same_tables() {
        let sampler = RandomTableSampler::new(vec![30, 50], vec![10, 20, 25, 25]).unwrap();
        let mut rng_a = Pcg32::seed_from_u64(9);
        let mut rng_b = Pcg32::seed_from_u64(9);
        let mut table_a = vec![0; 8];
        let mut table_b = vec![0; 8];
        for _ in 0..50 {
            sampler.sample_into(&mut rng_a, &mut table_a);
            sampler.sample_into(&mut rng_b, &mut table_b);
            assert_eq!(table_a, table_b);
        }
    }

    #[test]
    #[expect(clippy::cast_precision_loss)]
    fn test_cell_mean_matches_expectation() {
        // E[n_ij] = r_i * c_j / n
        let sampler = RandomTableSampler::new(vec![60, 40], vec![50, 30, 20]).unwrap();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut table = vec![0; 6];
        let mut sums = [0_u64; 6];
        let draws = 4000;
        for _ in 0..draws {
            sampler.sample_into(&mut rng, &mut table);
            for (sum, cell) in sums.iter_mut().zip(&table) {
                *sum += cell;
            }
        }
        let expected = [30.0, 18.0, 12.0, 20.0, 12.0, 8.0];
        for (sum, expected) in sums.iter().zip(expected) {
            let mean = *sum as f64 / f64::from(draws);
            assert!((mean - expected).abs() < 0.3, "{mean} vs {expected}");
        }
    }
}
