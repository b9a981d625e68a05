use std::path::PathBuf;

use anyhow::Context as _;
use jointfit::{comparison, synthetic};

use crate::{command::ConfigArg, util};

const DEFAULT_SYNTHETIC_LEN: usize = 1440;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ResortDemoArg {
    /// Path to a sample JSON file; a synthetic sensor log is used if omitted
    sample: Option<PathBuf>,
    /// Length of the synthetic sensor log
    #[arg(long = "synthetic", default_value_t = DEFAULT_SYNTHETIC_LEN)]
    synthetic_len: usize,
    #[clap(flatten)]
    config: ConfigArg,
    /// Output file path for the report (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

impl ResortDemoArg {
    #[cfg(test)]
    pub(crate) fn config(&self) -> &ConfigArg {
        &self.config
    }
}

pub(crate) fn run(arg: &ResortDemoArg) -> anyhow::Result<()> {
    let ResortDemoArg {
        sample,
        synthetic_len,
        config,
        output,
    } = arg;
    let config = config.load()?;
    let sample = match sample {
        Some(path) => util::read_sample_file(path)?,
        None => {
            tracing::info!(
                len = synthetic_len,
                seed = config.seed,
                "generating synthetic sensor log"
            );
            synthetic::sensor_log(*synthetic_len, config.seed)
        }
    };

    let report = comparison::resort_report(&sample, &config)
        .context("Failed to compare the sample with its resorted counterpart")?;

    eprintln!("Mean-based tests (sample vs resorted):");
    eprintln!("  t-test x:     p = {:.4}", report.means.x.p_value);
    eprintln!("  t-test y:     p = {:.4}", report.means.y.p_value);
    eprintln!("  Hotelling T²: p = {:.4}", report.means.hotelling.p_value);
    eprintln!("Similarity test ({} bins):", config.bucket_count);
    eprintln!(
        "  chi-squared = {:.3}, p = {:.4}{}",
        report.similarity.statistic,
        report.similarity.p_value,
        if report.similarity.reliable {
            ""
        } else {
            " (unreliable)"
        }
    );
    eprintln!(
        "  asymptotic p = {:.4}, informative cells = {}",
        report.asymptotic.p_value,
        report.asymptotic.informative_cells()
    );

    util::Output::save_json(&report, output.clone())
}
