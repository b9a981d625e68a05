use serde::{Deserialize, Serialize};

use crate::StatsError;

/// One paired observation, e.g. `(temperature, minute)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub x: f64,
    pub y: f64,
}

/// An ordered sample of paired bivariate observations.
///
/// Stored column-wise so each dimension can be binned directly. The two
/// columns always have the same length.
///
/// Serializes as `{"observations": [{"x": .., "y": ..}, ...]}`.
///
/// # Examples
///
/// ```
/// use jointfit::sample::BivariateSample;
///
/// let sample = BivariateSample::new(vec![3.0, 1.0, 2.0], vec![10.0, 20.0, 30.0]).unwrap();
/// let resorted = sample.resorted_x();
/// assert_eq!(resorted.xs(), &[1.0, 2.0, 3.0]);
/// assert_eq!(resorted.ys(), sample.ys());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SampleRecord", into = "SampleRecord")]
pub struct BivariateSample {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SampleRecord {
    observations: Vec<Observation>,
}

impl From<SampleRecord> for BivariateSample {
    fn from(record: SampleRecord) -> Self {
        record.observations.into_iter().collect()
    }
}

impl From<BivariateSample> for SampleRecord {
    fn from(sample: BivariateSample) -> Self {
        Self {
            observations: sample.observations().collect(),
        }
    }
}

impl FromIterator<Observation> for BivariateSample {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Observation>,
    {
        let (xs, ys) = iter.into_iter().map(|o| (o.x, o.y)).unzip();
        Self { xs, ys }
    }
}

impl BivariateSample {
    /// Builds a sample from its two columns.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::LengthMismatch`] if the columns differ in length.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self, StatsError> {
        if xs.len() != ys.len() {
            return Err(StatsError::LengthMismatch {
                x_len: xs.len(),
                y_len: ys.len(),
            });
        }
        Ok(Self { xs, ys })
    }

    #[must_use]
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    #[must_use]
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn observations(&self) -> impl Iterator<Item = Observation> + '_ {
        self.xs.iter().zip(&self.ys).map(|(&x, &y)| Observation { x, y })
    }

    /// Sorts the x column and pairs it with the original y sequence.
    ///
    /// Both marginal distributions are unchanged, so mean-based tests cannot
    /// tell the result from the original, while the joint distribution is
    /// rearranged into a monotone pairing.
    #[must_use]
    pub fn resorted_x(&self) -> Self {
        let mut xs = self.xs.clone();
        xs.sort_by(f64::total_cmp);
        Self {
            xs,
            ys: self.ys.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_mismatch() {
        let err = BivariateSample::new(vec![1.0], vec![]).unwrap_err();
        assert_eq!(err, StatsError::LengthMismatch { x_len: 1, y_len: 0 });
    }

    #[test]
    fn test_json_shape() {
        let sample = BivariateSample::new(vec![21.5, 22.0], vec![0.0, 1.0]).unwrap();
        let json = serde_json::to_value(&sample).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "observations": [{"x": 21.5, "y": 0.0}, {"x": 22.0, "y": 1.0}]
            })
        );
        let parsed: BivariateSample = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, sample);
    }

    #[test]
    fn test_resorted_keeps_marginals() {
        let sample = BivariateSample::new(vec![5.0, 1.0, 4.0, 2.0], vec![0.0, 1.0, 2.0, 3.0])
            .unwrap();
        let resorted = sample.resorted_x();
        let mut original_xs = sample.xs().to_vec();
        original_xs.sort_by(f64::total_cmp);
        assert_eq!(resorted.xs(), original_xs);
        assert_eq!(resorted.ys(), sample.ys());
        assert_eq!(resorted.len(), sample.len());
    }
}
