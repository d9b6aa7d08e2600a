use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Scenario – one way of deriving mRNA copy numbers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    BestRate,
    MedianRate,
    Normalized,
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scenario::BestRate => write!(f, "Best Rate"),
            Scenario::MedianRate => write!(f, "Median Rate"),
            Scenario::Normalized => write!(f, "Normalized"),
        }
    }
}

// ---------------------------------------------------------------------------
// Report – everything one run produces
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioReport {
    pub scenario: Scenario,
    /// Translation rate used to impute or rescale (proteins per mRNA per hour).
    pub translation_rate: Option<f64>,
    pub adjusted_rows: usize,
    /// Copy-number-weighted median of protein length, in amino acids.
    pub median_mrna_length: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub rows: usize,
    /// Copy-number-weighted mean protein length, in amino acids.
    pub mean_protein_size: Option<f64>,
    pub scenarios: Vec<ScenarioReport>,
}

impl Report {
    pub fn scenario(&self, scenario: Scenario) -> Option<&ScenarioReport> {
        self.scenarios.iter().find(|s| s.scenario == scenario)
    }
}

struct Value(Option<f64>);

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v:.4}"),
            None => write!(f, "undefined"),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Rows: {}", self.rows)?;
        writeln!(f, "Mean Protein Size: {}", Value(self.mean_protein_size))?;
        for s in &self.scenarios {
            let label = match s.scenario {
                Scenario::Normalized => "Normalized Median mRNA Coding Sequence Length".to_string(),
                other => format!("Median mRNA Coding Sequence Length ({other})"),
            };
            writeln!(
                f,
                "{label}: {} [rate {}, {} rows adjusted]",
                Value(s.median_mrna_length),
                Value(s.translation_rate),
                s.adjusted_rows
            )?;
        }
        Ok(())
    }
}
