use log::info;

use crate::config::AnalysisConfig;
use crate::data::model::MeasurementTable;
use crate::estimate::{
    normalize_by_translation_rate, BestRate, DerivedTable, ImputationStrategy, MedianRate,
};
use crate::report::{Report, Scenario, ScenarioReport};
use crate::stats::{weighted_mean, weighted_median};

/// Protein length averaged over protein molecules rather than genes.
pub fn mean_protein_size(table: &MeasurementTable) -> Option<f64> {
    weighted_mean(
        table
            .rows
            .iter()
            .map(|r| (r.valid_length(), r.protein_copy_number)),
    )
}

/// Median coding length over mRNA molecules, using protein length as the proxy
/// for coding sequence length.
pub fn median_mrna_length(table: &MeasurementTable) -> Option<f64> {
    weighted_median(
        table
            .rows
            .iter()
            .map(|r| (r.valid_length(), r.mrna_copy_number)),
    )
}

fn summarize(scenario: Scenario, derived: DerivedTable) -> ScenarioReport {
    let median_mrna_length = median_mrna_length(&derived.table);
    info!("{scenario}: median mRNA length {median_mrna_length:?}");
    ScenarioReport {
        scenario,
        translation_rate: derived.translation_rate,
        adjusted_rows: derived.adjusted_rows,
        median_mrna_length,
    }
}

/// Run the mean protein size and all three mRNA scenarios over `table`.
/// Every scenario starts from the same untouched table.
pub fn run(table: &MeasurementTable, config: &AnalysisConfig) -> Report {
    let mean_protein_size = mean_protein_size(table);
    info!("mean protein size {mean_protein_size:?}");

    let best = BestRate {
        rate_per_hour: config.best_rate_per_hour,
    };
    let median = MedianRate {
        cutoff_per_hour: config.rate_cutoff_per_hour,
    };

    let scenarios = vec![
        summarize(
            Scenario::BestRate,
            best.impute(table, config.doubling_time_hours),
        ),
        summarize(
            Scenario::MedianRate,
            median.impute(table, config.doubling_time_hours),
        ),
        summarize(Scenario::Normalized, normalize_by_translation_rate(table)),
    ];

    Report {
        rows: table.len(),
        mean_protein_size,
        scenarios,
    }
}
