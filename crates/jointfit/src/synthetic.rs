//! Seeded synthetic sensor logs.
//!
//! A stand-in for a timestamped temperature log: one observation per
//! minute, temperature following one full daily cycle plus Gaussian noise.
//! `x` is the temperature and `y` the minute.

use std::f64::consts::TAU;

use rand::{SeedableRng as _, distr::Distribution as _};
use rand_distr::Normal;
use rand_pcg::Pcg32;

use crate::sample::{BivariateSample, Observation};

const BASE_TEMPERATURE: f64 = 21.0;
const DAILY_AMPLITUDE: f64 = 2.5;
const NOISE_STD_DEV: f64 = 0.8;

/// Generates `len` observations `(temperature, minute)`.
///
/// The same `seed` always produces the same sample.
///
/// # Examples
///
/// ```
/// use jointfit::synthetic::sensor_log;
///
/// let log = sensor_log(1440, 7);
/// assert_eq!(log.len(), 1440);
/// assert_eq!(log.ys()[0], 0.0);
/// assert_eq!(log, sensor_log(1440, 7));
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn sensor_log(len: usize, seed: u64) -> BivariateSample {
    let mut rng = Pcg32::seed_from_u64(seed);
    let noise = Normal::new(0.0, NOISE_STD_DEV).expect("standard deviation is positive");
    let period = len.max(1) as f64;
    (0..len)
        .map(|minute| {
            let minute = minute as f64;
            let cycle = (TAU * minute / period).sin();
            Observation {
                x: BASE_TEMPERATURE + DAILY_AMPLITUDE * cycle + noise.sample(&mut rng),
                y: minute,
            }
        })
        .collect()
}
