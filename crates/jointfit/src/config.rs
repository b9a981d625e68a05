use jointfit_stats::chi_squared::{DEFAULT_SIMULATIONS, PValueMethod};
use serde::{Deserialize, Serialize};

/// Default number of quantile bins per dimension.
pub const DEFAULT_BUCKET_COUNT: usize = 8;

/// Where the quantile cut points of each dimension come from.
#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::FromStr,
)]
#[serde(rename_all = "snake_case")]
pub enum Binning {
    /// Each sample is binned on its own values.
    ///
    /// Marginals become uniform by construction, so only the joint
    /// arrangement of the pairs is compared.
    #[default]
    Separate,
    /// Both samples are binned against cut points of the pooled values.
    ///
    /// Differences in the marginal distributions show up as well.
    Pooled,
}

/// Parameters of a similarity test.
///
/// Every field has a default, so a partial JSON object is a valid
/// configuration:
///
/// ```
/// use jointfit::config::{Binning, SimilarityConfig};
///
/// let config: SimilarityConfig = serde_json::from_str(r#"{"simulate": true}"#).unwrap();
/// assert_eq!(config.bucket_count, 8);
/// assert_eq!(config.binning, Binning::Separate);
/// assert!(config.p_value_method().is_simulated());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    /// Quantile bins per dimension; the joint histogram has `bucket_count²` cells.
    pub bucket_count: usize,
    pub binning: Binning,
    /// Use a Monte Carlo p-value instead of the asymptotic one.
    pub simulate: bool,
    /// Number of simulated tables when `simulate` is set.
    pub simulations: usize,
    /// Seed of the simulation random number generator.
    pub seed: u64,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            bucket_count: DEFAULT_BUCKET_COUNT,
            binning: Binning::default(),
            simulate: false,
            simulations: DEFAULT_SIMULATIONS,
            seed: 0,
        }
    }
}

impl SimilarityConfig {
    #[must_use]
    pub fn with_bucket_count(mut self, bucket_count: usize) -> Self {
        self.bucket_count = bucket_count;
        self
    }

    #[must_use]
    pub fn with_binning(mut self, binning: Binning) -> Self {
        self.binning = binning;
        self
    }

    /// Switches to a Monte Carlo p-value with the given seed.
    #[must_use]
    pub fn simulated(mut self, seed: u64) -> Self {
        self.simulate = true;
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_simulations(mut self, simulations: usize) -> Self {
        self.simulations = simulations;
        self
    }

    #[must_use]
    pub fn p_value_method(&self) -> PValueMethod {
        if self.simulate {
            PValueMethod::MonteCarlo {
                simulations: self.simulations,
                seed: self.seed,
            }
        } else {
            PValueMethod::Asymptotic
        }
    }
}
