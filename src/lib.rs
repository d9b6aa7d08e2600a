//! Protein size and mRNA copy-number statistics from abundance tables.
//!
//! Load a [`MeasurementTable`](data::model::MeasurementTable), then
//! [`pipeline::run`] it under an [`AnalysisConfig`](config::AnalysisConfig).

pub mod config;
pub mod data;
pub mod estimate;
pub mod pipeline;
pub mod report;
pub mod stats;
