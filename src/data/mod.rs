//! Data layer: typed rows and loading.
//!
//! Architecture:
//! ```text
//!  .parquet / .json / .csv
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  locate configured columns → MeasurementTable
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────────────┐
//!   │ MeasurementTable  │  Vec<Measurement>, Option per cell
//!   └──────────────────┘
//! ```

pub mod loader;
pub mod model;
