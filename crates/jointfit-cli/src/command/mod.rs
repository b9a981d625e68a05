use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use jointfit::config::{Binning, SimilarityConfig};

use self::{compare::CompareArg, resort_demo::ResortDemoArg};
use crate::util;

mod compare;
mod resort_demo;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Test whether two sample files share the same joint distribution
    Compare(#[clap(flatten)] CompareArg),
    /// Compare a sample with its x-sorted counterpart using mean-based and distributional tests
    ResortDemo(#[clap(flatten)] ResortDemoArg),
}

/// Test parameters shared by all subcommands.
///
/// Values given on the command line override those from `--config`.
#[derive(Debug, Clone, Args)]
pub(crate) struct ConfigArg {
    /// JSON file with a similarity test configuration
    #[arg(long)]
    config: Option<PathBuf>,
    /// Quantile bins per dimension
    #[arg(long)]
    buckets: Option<usize>,
    /// Where bin cut points come from (separate or pooled)
    #[arg(long)]
    binning: Option<Binning>,
    /// Estimate the p-value by Monte Carlo simulation
    #[arg(long)]
    simulate: bool,
    /// Number of simulated tables
    #[arg(long)]
    simulations: Option<usize>,
    /// Seed of the simulation random number generator
    #[arg(long)]
    seed: Option<u64>,
}

impl ConfigArg {
    pub(crate) fn load(&self) -> anyhow::Result<SimilarityConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_json_file("configuration", path)?,
            None => SimilarityConfig::default(),
        };
        if let Some(buckets) = self.buckets {
            config.bucket_count = buckets;
        }
        if let Some(binning) = self.binning {
            config.binning = binning;
        }
        if self.simulate {
            config.simulate = true;
        }
        if let Some(simulations) = self.simulations {
            config.simulations = simulations;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        tracing::debug!(?config, "loaded configuration");
        Ok(config)
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Compare(arg) => compare::run(&arg)?,
        Mode::ResortDemo(arg) => resort_demo::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let args = CommandArgs::try_parse_from([
            "jointfit",
            "compare",
            "a.json",
            "b.json",
            "--buckets",
            "4",
            "--binning",
            "pooled",
            "--simulate",
            "--seed",
            "9",
        ])
        .unwrap();
        let Mode::Compare(arg) = args.mode else {
            panic!("expected compare");
        };
        let config = arg.config().load().unwrap();
        assert_eq!(config.bucket_count, 4);
        assert_eq!(config.binning, Binning::Pooled);
        assert!(config.simulate);
        assert_eq!(config.seed, 9);
        assert_eq!(config.simulations, SimilarityConfig::default().simulations);
    }

    #[test]
    fn test_resort_demo_defaults() {
        let args = CommandArgs::try_parse_from(["jointfit", "resort-demo", "--synthetic", "60"])
            .unwrap();
        let Mode::ResortDemo(arg) = args.mode else {
            panic!("expected resort-demo");
        };
        assert_eq!(arg.config().load().unwrap(), SimilarityConfig::default());
    }
}
