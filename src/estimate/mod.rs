//! Derivation of mRNA copy numbers: imputation of missing values and
//! rescaling by translation rate.
//!
//! ```text
//!   MeasurementTable (loaded, never mutated)
//!        │
//!        ├──► BestRate    ──► DerivedTable
//!        ├──► MedianRate  ──► DerivedTable
//!        └──► normalize   ──► DerivedTable
//! ```
//!
//! Each path clones the rows it touches into a fresh table, so the three
//! scenarios never share storage.

pub mod normalize;

use log::{debug, warn};

use crate::data::model::MeasurementTable;
use crate::stats::median;

pub use normalize::normalize_by_translation_rate;

/// Output of one derivation step.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedTable {
    pub table: MeasurementTable,
    /// Translation rate the step used, if one could be determined.
    pub translation_rate: Option<f64>,
    /// Rows whose mRNA copy number the step filled in or rescaled.
    pub adjusted_rows: usize,
}

/// mRNA molecules needed to build `protein_copy_number` proteins within one
/// doubling time at `translation_rate` proteins per mRNA per hour.
///
/// Missing inputs, or a rate that is not strictly positive, give `None`.
pub fn estimate_mrna_copy_number(
    protein_copy_number: Option<f64>,
    translation_rate: Option<f64>,
    doubling_time_hours: f64,
) -> Option<f64> {
    let rate = translation_rate.filter(|r| r.is_finite() && *r > 0.0)?;
    Some(protein_copy_number? / (rate * doubling_time_hours))
}

// ---------------------------------------------------------------------------
// Strategy interface
// ---------------------------------------------------------------------------

/// A way to fill in missing mRNA copy numbers from protein copy numbers.
pub trait ImputationStrategy {
    /// Short label used in logs and reports.
    fn name(&self) -> &'static str;

    /// Translation rate (proteins per mRNA per hour) applied to every row
    /// that needs an estimate.
    fn translation_rate(&self, table: &MeasurementTable) -> Option<f64>;

    /// Return a copy of `table` with missing mRNA copy numbers estimated.
    /// Present values pass through untouched.
    fn impute(&self, table: &MeasurementTable, doubling_time_hours: f64) -> DerivedTable {
        let rate = self.translation_rate(table);
        match rate {
            Some(r) => debug!("{}: translation rate {r:.3} per hour", self.name()),
            None => warn!("{}: no usable translation rate, estimates stay missing", self.name()),
        }

        let mut adjusted_rows = 0;
        let imputed = table.map_rows(|row| {
            if row.mrna_copy_number.is_some() {
                return *row;
            }
            let estimate =
                estimate_mrna_copy_number(row.protein_copy_number, rate, doubling_time_hours);
            if estimate.is_some() {
                adjusted_rows += 1;
            }
            row.with_mrna_copy_number(estimate)
        });
        debug!("{}: imputed {adjusted_rows} of {} rows", self.name(), table.len());

        DerivedTable {
            table: imputed,
            translation_rate: rate,
            adjusted_rows,
        }
    }
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Assume every mRNA translates at a fixed, optimistic rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestRate {
    pub rate_per_hour: f64,
}

impl ImputationStrategy for BestRate {
    fn name(&self) -> &'static str {
        "best rate"
    }

    fn translation_rate(&self, _table: &MeasurementTable) -> Option<f64> {
        Some(self.rate_per_hour)
    }
}

/// Use the median of the measured rates, ignoring rates above `cutoff_per_hour`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MedianRate {
    pub cutoff_per_hour: f64,
}

impl ImputationStrategy for MedianRate {
    fn name(&self) -> &'static str {
        "median rate"
    }

    fn translation_rate(&self, table: &MeasurementTable) -> Option<f64> {
        median(
            table
                .translation_rates()
                .filter(|r| *r <= self.cutoff_per_hour),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Measurement;

    fn row(protein: Option<f64>, mrna: Option<f64>, rate: Option<f64>) -> Measurement {
        Measurement::from_cells([Some(300.0), protein, mrna, rate])
    }

    #[test]
    fn best_rate_estimate() {
        let table = MeasurementTable::new(vec![row(Some(10800.0), None, None)]);
        let derived = BestRate { rate_per_hour: 1200.0 }.impute(&table, 27.0);
        let estimate = derived.table.rows[0].mrna_copy_number.unwrap();
        assert!((estimate - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(derived.translation_rate, Some(1200.0));
        assert_eq!(derived.adjusted_rows, 1);
    }

    #[test]
    fn present_values_pass_through() {
        let table = MeasurementTable::new(vec![row(Some(10800.0), Some(42.0), Some(5.0))]);
        let derived = BestRate { rate_per_hour: 1200.0 }.impute(&table, 27.0);
        assert_eq!(derived.table, table);
        assert_eq!(derived.adjusted_rows, 0);
    }

    #[test]
    fn missing_protein_stays_missing() {
        let table = MeasurementTable::new(vec![row(None, None, Some(10.0))]);
        let best = BestRate { rate_per_hour: 1200.0 }.impute(&table, 27.0);
        let med = MedianRate { cutoff_per_hour: 1800.0 }.impute(&table, 27.0);
        assert_eq!(best.table.rows[0].mrna_copy_number, None);
        assert_eq!(med.table.rows[0].mrna_copy_number, None);
    }

    #[test]
    fn median_rate_ignores_outliers() {
        let table = MeasurementTable::new(vec![
            row(Some(1.0), Some(1.0), Some(100.0)),
            row(Some(1.0), Some(1.0), Some(300.0)),
            row(Some(1.0), Some(1.0), Some(2000.0)),
            row(Some(1.0), Some(1.0), Some(1800.0)),
            row(Some(2700.0), None, None),
        ]);
        let strategy = MedianRate { cutoff_per_hour: 1800.0 };
        // 2000 is dropped: median of [100, 300, 1800]
        assert_eq!(strategy.translation_rate(&table), Some(300.0));

        let derived = strategy.impute(&table, 27.0);
        assert_eq!(derived.table.rows[4].mrna_copy_number, Some(2700.0 / (300.0 * 27.0)));
    }

    #[test]
    fn median_rate_without_rates_leaves_rows_missing() {
        let table = MeasurementTable::new(vec![row(Some(100.0), None, Some(5000.0))]);
        let derived = MedianRate { cutoff_per_hour: 1800.0 }.impute(&table, 27.0);
        assert_eq!(derived.translation_rate, None);
        assert_eq!(derived.table.rows[0].mrna_copy_number, None);
        assert_eq!(derived.adjusted_rows, 0);
    }

    #[test]
    fn imputing_does_not_touch_the_source() {
        let table = MeasurementTable::new(vec![row(Some(100.0), None, None)]);
        let _ = BestRate { rate_per_hour: 1200.0 }.impute(&table, 27.0);
        assert_eq!(table.rows[0].mrna_copy_number, None);
    }

    #[test]
    fn zero_rate_gives_no_estimate() {
        assert_eq!(estimate_mrna_copy_number(Some(10.0), Some(0.0), 27.0), None);
        assert_eq!(estimate_mrna_copy_number(Some(10.0), None, 27.0), None);
    }
}
