use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ColumnMapping – source headers for the four measured fields
// ---------------------------------------------------------------------------

pub const DEFAULT_PROTEIN_LENGTH: &str = "Protein length [amino acids]";
pub const DEFAULT_PROTEIN_COPY_NUMBER: &str = "Protein copy number average [molecules/cell]";
pub const DEFAULT_MRNA_COPY_NUMBER: &str = "mRNA copy number average [molecules/cell]";
pub const DEFAULT_TRANSLATION_RATE: &str =
    "translation rate constant (ksp) average [molecules/(mRNA*h)]";

/// Which source column feeds each field of a [`Measurement`].
///
/// Defaults match the headers of Schwanhäusser et al. (2011), Supplementary Table 3.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub protein_length: String,
    pub protein_copy_number: String,
    pub mrna_copy_number: String,
    pub translation_rate: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            protein_length: DEFAULT_PROTEIN_LENGTH.to_string(),
            protein_copy_number: DEFAULT_PROTEIN_COPY_NUMBER.to_string(),
            mrna_copy_number: DEFAULT_MRNA_COPY_NUMBER.to_string(),
            translation_rate: DEFAULT_TRANSLATION_RATE.to_string(),
        }
    }
}

impl ColumnMapping {
    /// Column names in [`Measurement`] field order.
    pub fn names(&self) -> [&str; 4] {
        [
            self.protein_length.as_str(),
            self.protein_copy_number.as_str(),
            self.mrna_copy_number.as_str(),
            self.translation_rate.as_str(),
        ]
    }
}

// ---------------------------------------------------------------------------
// Measurement – one row of the source table
// ---------------------------------------------------------------------------

/// One protein/gene. `None` marks a missing cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Amino acid count.
    pub protein_length: Option<f64>,
    /// Molecules per cell.
    pub protein_copy_number: Option<f64>,
    /// Molecules per cell.
    pub mrna_copy_number: Option<f64>,
    /// Proteins per mRNA per hour (ksp).
    pub translation_rate: Option<f64>,
}

impl Measurement {
    /// Build a row from raw cells in [`ColumnMapping::names`] order.
    /// NaN is folded into `None` so downstream code has one notion of "missing".
    pub fn from_cells(cells: [Option<f64>; 4]) -> Self {
        let [protein_length, protein_copy_number, mrna_copy_number, translation_rate] =
            cells.map(|c| c.filter(|v| !v.is_nan()));
        Self {
            protein_length,
            protein_copy_number,
            mrna_copy_number,
            translation_rate,
        }
    }

    /// Protein length if it can act as a size (strictly positive, finite).
    pub fn valid_length(&self) -> Option<f64> {
        self.protein_length.filter(|l| l.is_finite() && *l > 0.0)
    }

    /// Copy of this row with a different mRNA copy number.
    pub fn with_mrna_copy_number(self, mrna_copy_number: Option<f64>) -> Self {
        Self {
            mrna_copy_number,
            ..self
        }
    }
}

// ---------------------------------------------------------------------------
// MeasurementTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// All rows of a dataset. Transforms take `&MeasurementTable` and return a new
/// table, so the loaded original is never mutated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementTable {
    pub rows: Vec<Measurement>,
}

impl MeasurementTable {
    pub fn new(rows: Vec<Measurement>) -> Self {
        Self { rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All present translation rates, in table order.
    pub fn translation_rates(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().filter_map(|r| r.translation_rate)
    }

    /// Apply `f` to every row, producing a new table.
    pub fn map_rows<F>(&self, f: F) -> Self
    where
        F: FnMut(&Measurement) -> Measurement,
    {
        Self {
            rows: self.rows.iter().map(f).collect(),
        }
    }

    /// Per-field count of missing cells, in [`ColumnMapping::names`] order.
    pub fn missing_counts(&self) -> [usize; 4] {
        self.rows.iter().fold([0; 4], |mut acc, r| {
            let fields = [
                r.protein_length,
                r.protein_copy_number,
                r.mrna_copy_number,
                r.translation_rate,
            ];
            for (slot, field) in acc.iter_mut().zip(fields) {
                if field.is_none() {
                    *slot += 1;
                }
            }
            acc
        })
    }
}

impl FromIterator<Measurement> for MeasurementTable {
    fn from_iter<I: IntoIterator<Item = Measurement>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_cells_become_missing() {
        let row = Measurement::from_cells([Some(300.0), Some(f64::NAN), None, Some(12.0)]);
        assert_eq!(row.protein_length, Some(300.0));
        assert_eq!(row.protein_copy_number, None);
        assert_eq!(row.mrna_copy_number, None);
        assert_eq!(row.translation_rate, Some(12.0));
    }

    #[test]
    fn valid_length_rejects_non_positive() {
        let mut row = Measurement::default();
        assert_eq!(row.valid_length(), None);
        row.protein_length = Some(0.0);
        assert_eq!(row.valid_length(), None);
        row.protein_length = Some(-4.0);
        assert_eq!(row.valid_length(), None);
        row.protein_length = Some(120.0);
        assert_eq!(row.valid_length(), Some(120.0));
    }

    #[test]
    fn map_rows_leaves_source_untouched() {
        let table: MeasurementTable = vec![Measurement::default(); 3].into_iter().collect();
        let derived = table.map_rows(|r| r.with_mrna_copy_number(Some(1.0)));
        assert!(table.rows.iter().all(|r| r.mrna_copy_number.is_none()));
        assert!(derived.rows.iter().all(|r| r.mrna_copy_number == Some(1.0)));
    }

    #[test]
    fn missing_counts_per_field() {
        let table = MeasurementTable::new(vec![
            Measurement::from_cells([Some(1.0), None, None, Some(2.0)]),
            Measurement::from_cells([None, Some(1.0), None, None]),
        ]);
        assert_eq!(table.missing_counts(), [1, 1, 2, 1]);
    }
}
