use std::path::PathBuf;

use anyhow::Context as _;
use jointfit::tester;

use crate::{command::ConfigArg, util};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct CompareArg {
    /// Path to the first sample JSON file
    sample_a: PathBuf,
    /// Path to the second sample JSON file
    sample_b: PathBuf,
    #[clap(flatten)]
    config: ConfigArg,
    /// Output file path for the verdict (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

impl CompareArg {
    #[cfg(test)]
    pub(crate) fn config(&self) -> &ConfigArg {
        &self.config
    }
}

pub(crate) fn run(arg: &CompareArg) -> anyhow::Result<()> {
    let CompareArg {
        sample_a,
        sample_b,
        config,
        output,
    } = arg;
    let config = config.load()?;
    let a = util::read_sample_file(sample_a)?;
    let b = util::read_sample_file(sample_b)?;
    tracing::info!(a = a.len(), b = b.len(), "loaded samples");

    let verdict = tester::test_similarity(&a, &b, &config).with_context(|| {
        format!(
            "Failed to compare {} and {}",
            sample_a.display(),
            sample_b.display()
        )
    })?;
    if !verdict.reliable {
        tracing::warn!(
            min_expected = verdict.test.min_expected,
            "some expected cell counts are below 5; consider --simulate"
        );
    }

    util::Output::save_json(&verdict, output.clone())
}
