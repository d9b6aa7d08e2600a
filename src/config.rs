use std::path::Path;

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::data::model::ColumnMapping;

/// Seconds per hour; rates below are quoted per hour.
const SECONDS_PER_HOUR: f64 = 3600.0;

/// Assumed doubling time of the cultured cell line, in hours.
pub const DEFAULT_DOUBLING_TIME_HOURS: f64 = 27.0;

/// One protein per ribosome every three seconds.
pub const DEFAULT_BEST_RATE_PER_HOUR: f64 = SECONDS_PER_HOUR / 3.0;

/// Half the theoretical maximum of one protein per second.
pub const DEFAULT_RATE_CUTOFF_PER_HOUR: f64 = SECONDS_PER_HOUR / 2.0;

/// Knobs for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub doubling_time_hours: f64,
    /// Translation rate assumed by the best-rate strategy.
    pub best_rate_per_hour: f64,
    /// Rates above this are ignored when the median-rate strategy picks its rate.
    pub rate_cutoff_per_hour: f64,
    pub columns: ColumnMapping,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            doubling_time_hours: DEFAULT_DOUBLING_TIME_HOURS,
            best_rate_per_hour: DEFAULT_BEST_RATE_PER_HOUR,
            rate_cutoff_per_hour: DEFAULT_RATE_CUTOFF_PER_HOUR,
            columns: ColumnMapping::default(),
        }
    }
}

impl AnalysisConfig {
    /// Read a JSON config file. Omitted fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.doubling_time_hours.is_finite() && self.doubling_time_hours > 0.0,
            "doubling time must be positive, got {}",
            self.doubling_time_hours
        );
        ensure!(
            self.best_rate_per_hour.is_finite() && self.best_rate_per_hour > 0.0,
            "best translation rate must be positive, got {}",
            self.best_rate_per_hour
        );
        ensure!(
            self.rate_cutoff_per_hour > 0.0,
            "translation rate cutoff must be positive, got {}",
            self.rate_cutoff_per_hour
        );
        Ok(())
    }
}
