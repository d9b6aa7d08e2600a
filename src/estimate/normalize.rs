use log::debug;

use super::DerivedTable;
use crate::data::model::MeasurementTable;
use crate::stats::median;

/// Rescale mRNA copy numbers as if every mRNA translated at the median rate.
///
/// Each row with a positive translation rate has its copy number multiplied by
/// `median_rate / row_rate`. Rows without a usable rate, or without a copy
/// number, come through unchanged. The median is taken over all present
/// rates without an outlier cutoff and is recomputed on every call, so a
/// second pass over an already normalized table rescales again.
pub fn normalize_by_translation_rate(table: &MeasurementTable) -> DerivedTable {
    let reference = median(table.translation_rates());

    let mut adjusted_rows = 0;
    let normalized = table.map_rows(|row| {
        let (Some(reference), Some(rate), Some(mrna)) =
            (reference, row.translation_rate, row.mrna_copy_number)
        else {
            return *row;
        };
        if !(rate.is_finite() && rate > 0.0) {
            return *row;
        }
        adjusted_rows += 1;
        row.with_mrna_copy_number(Some(mrna * (reference / rate)))
    });
    debug!(
        "normalized {adjusted_rows} of {} rows to reference rate {reference:?}",
        table.len()
    );

    DerivedTable {
        table: normalized,
        translation_rate: reference,
        adjusted_rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Measurement;

    fn row(mrna: Option<f64>, rate: Option<f64>) -> Measurement {
        Measurement::from_cells([Some(100.0), Some(1.0), mrna, rate])
    }

    #[test]
    fn rescales_towards_median_rate() {
        let table = MeasurementTable::new(vec![
            row(Some(10.0), Some(10.0)),
            row(Some(10.0), Some(20.0)),
            row(Some(10.0), Some(40.0)),
        ]);
        let derived = normalize_by_translation_rate(&table);
        assert_eq!(derived.translation_rate, Some(20.0));
        let mrna: Vec<_> = derived.table.rows.iter().map(|r| r.mrna_copy_number).collect();
        assert_eq!(mrna, vec![Some(20.0), Some(10.0), Some(5.0)]);
        assert_eq!(derived.adjusted_rows, 3);
    }

    #[test]
    fn never_fabricates_values() {
        let table = MeasurementTable::new(vec![
            row(None, Some(10.0)),
            row(Some(7.0), None),
            row(Some(3.0), Some(0.0)),
            row(Some(4.0), Some(20.0)),
        ]);
        let derived = normalize_by_translation_rate(&table);
        // median of [10, 0, 20] is 10
        let mrna: Vec<_> = derived.table.rows.iter().map(|r| r.mrna_copy_number).collect();
        assert_eq!(mrna, vec![None, Some(7.0), Some(3.0), Some(2.0)]);
        assert_eq!(derived.adjusted_rows, 1);
    }

    #[test]
    fn second_pass_is_not_idempotent() {
        // Rates stay the same, but the reference for the second pass is
        // computed afresh, so copy numbers move again whenever a rate differs
        // from the median.
        let table = MeasurementTable::new(vec![
            row(Some(8.0), Some(10.0)),
            row(Some(8.0), Some(40.0)),
        ]);
        let once = normalize_by_translation_rate(&table);
        let twice = normalize_by_translation_rate(&once.table);
        assert_eq!(once.translation_rate, Some(25.0));
        assert_eq!(twice.translation_rate, Some(25.0));
        assert_ne!(once.table, twice.table);
        assert_eq!(twice.table.rows[0].mrna_copy_number, Some(8.0 * 2.5 * 2.5));
    }

    #[test]
    fn empty_table() {
        let derived = normalize_by_translation_rate(&MeasurementTable::default());
        assert_eq!(derived.translation_rate, None);
        assert!(derived.table.is_empty());
    }
}
