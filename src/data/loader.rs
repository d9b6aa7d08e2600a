use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use log::{debug, info};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{ColumnMapping, Measurement, MeasurementTable};

/// Structural problems with an otherwise readable file.
#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("missing column '{column}'")]
    MissingColumn { column: String },
    #[error("row {row}, column '{column}': '{value}' is not a number")]
    InvalidCell {
        row: usize,
        column: String,
        value: String,
    },
    #[error("column '{column}' has type {data_type}, expected a numeric type")]
    UnsupportedType { column: String, data_type: String },
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a measurement table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – numeric columns, nulls are missing values
/// * `.json`    – `[{ "<column>": 12.5, ... }, ...]`
/// * `.csv`     – header row plus one row per protein
///
/// Only the four columns named in `columns` are read; any others are ignored.
pub fn load_file(path: &Path, columns: &ColumnMapping) -> Result<MeasurementTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path, columns),
        "json" => load_json(path, columns),
        "csv" => load_csv(path, columns),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    info!("loaded {} rows from {}", table.len(), path.display());
    for (name, missing) in columns.names().iter().zip(table.missing_counts()) {
        debug!("column '{name}': {missing} missing values");
    }
    Ok(table)
}

/// Parse one textual cell. Blank and NA-style markers are missing values.
fn parse_cell(s: &str, row: usize, column: &str) -> Result<Option<f64>, SchemaError> {
    let s = s.trim();
    if s.is_empty() || matches!(s, "NA" | "N/A" | "NaN" | "nan" | "null") {
        return Ok(None);
    }
    s.parse::<f64>()
        .map(Some)
        .map_err(|_| SchemaError::InvalidCell {
            row,
            column: column.to_string(),
            value: s.to_string(),
        })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path, columns: &ColumnMapping) -> Result<MeasurementTable> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?.clone();

    let names = columns.names();
    let mut indices = [0usize; 4];
    for (slot, name) in indices.iter_mut().zip(names) {
        *slot = headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| SchemaError::MissingColumn {
                column: name.to_string(),
            })?;
    }

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let mut cells = [None; 4];
        for ((cell, &idx), name) in cells.iter_mut().zip(&indices).zip(names) {
            *cell = parse_cell(record.get(idx).unwrap_or(""), row_no, name)?;
        }
        rows.push(Measurement::from_cells(cells));
    }

    Ok(MeasurementTable::new(rows))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`:
///
/// ```json
/// [
///   { "Protein length [amino acids]": 412, "mRNA copy number ...": null, ... },
///   ...
/// ]
/// ```
fn load_json(path: &Path, columns: &ColumnMapping) -> Result<MeasurementTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let names = columns.names();
    let mut seen = [false; 4];
    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let mut cells = [None; 4];
        for (k, name) in names.iter().enumerate() {
            let Some(val) = obj.get(*name) else {
                continue;
            };
            seen[k] = true;
            cells[k] = json_to_f64(val, i, name)?;
        }
        rows.push(Measurement::from_cells(cells));
    }

    if !rows.is_empty() {
        if let Some(k) = seen.iter().position(|s| !s) {
            return Err(SchemaError::MissingColumn {
                column: names[k].to_string(),
            }
            .into());
        }
    }

    Ok(MeasurementTable::new(rows))
}

fn json_to_f64(val: &JsonValue, row: usize, column: &str) -> Result<Option<f64>, SchemaError> {
    match val {
        JsonValue::Null => Ok(None),
        JsonValue::Number(n) => Ok(n.as_f64()),
        JsonValue::String(s) => parse_cell(s, row, column),
        other => Err(SchemaError::InvalidCell {
            row,
            column: column.to_string(),
            value: other.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file. Works with files written by both **Pandas**
/// (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path, columns: &ColumnMapping) -> Result<MeasurementTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let names = columns.names();
    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let mut values: Vec<Vec<Option<f64>>> = Vec::with_capacity(names.len());
        for name in names {
            let idx = schema
                .index_of(name)
                .map_err(|_| SchemaError::MissingColumn {
                    column: name.to_string(),
                })?;
            values.push(numeric_column(batch.column(idx), name)?);
        }

        for row in 0..batch.num_rows() {
            rows.push(Measurement::from_cells([
                values[0][row],
                values[1][row],
                values[2][row],
                values[3][row],
            ]));
        }
    }

    Ok(MeasurementTable::new(rows))
}

/// Read a whole Arrow column as optional `f64`s.
fn numeric_column(col: &ArrayRef, name: &str) -> Result<Vec<Option<f64>>, SchemaError> {
    let values: Vec<Option<f64>> = match col.data_type() {
        DataType::Float64 => col.as_primitive::<Float64Type>().iter().collect(),
        DataType::Float32 => col
            .as_primitive::<Float32Type>()
            .iter()
            .map(|v| v.map(f64::from))
            .collect(),
        DataType::Int64 => col
            .as_primitive::<Int64Type>()
            .iter()
            .map(|v| v.map(|i| i as f64))
            .collect(),
        DataType::Int32 => col
            .as_primitive::<Int32Type>()
            .iter()
            .map(|v| v.map(f64::from))
            .collect(),
        DataType::Null => vec![None; col.len()],
        other => {
            return Err(SchemaError::UnsupportedType {
                column: name.to_string(),
                data_type: format!("{other:?}"),
            });
        }
    };
    Ok(values)
}
