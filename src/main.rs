use std::path::PathBuf;

use anyhow::{Context, Result};
use argh::FromArgs;
use log::info;

use rusty_ribosome::config::AnalysisConfig;
use rusty_ribosome::data::loader::load_file;
use rusty_ribosome::pipeline;

#[derive(FromArgs, Debug)]
/// Protein size and mRNA copy-number statistics
struct Args {
    /// measurement table (.csv, .json or .parquet)
    #[argh(positional)]
    input: PathBuf,

    /// JSON file with analysis settings and column names
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// cell doubling time in hours
    #[argh(option)]
    doubling_time: Option<f64>,

    /// translation rate assumed by the best-rate estimate, per hour
    #[argh(option)]
    best_rate: Option<f64>,

    /// highest measured rate the median-rate estimate accepts, per hour
    #[argh(option)]
    rate_cutoff: Option<f64>,

    /// print the report as JSON
    #[argh(switch)]
    json: bool,
}

impl Args {
    fn analysis_config(&self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::from_file(path)?,
            None => AnalysisConfig::default(),
        };
        if let Some(hours) = self.doubling_time {
            config.doubling_time_hours = hours;
        }
        if let Some(rate) = self.best_rate {
            config.best_rate_per_hour = rate;
        }
        if let Some(cutoff) = self.rate_cutoff {
            config.rate_cutoff_per_hour = cutoff;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Args = argh::from_env();
    let config = args.analysis_config()?;
    info!(
        "doubling time {}h, best rate {}/h, rate cutoff {}/h",
        config.doubling_time_hours, config.best_rate_per_hour, config.rate_cutoff_per_hour
    );

    let table = load_file(&args.input, &config.columns)?;
    let report = pipeline::run(&table, &config);

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("serializing report")?;
        println!("{json}");
    } else {
        print!("{report}");
    }
    Ok(())
}
