//! Ingestion, sanitization and statistics engine for filament measurement
//! spreadsheets.
//!
//! The pipeline turns a semi-structured spreadsheet export (title row,
//! header row, data rows) into a clean set of typed records, then serves
//! derived statistics and aggregations to downstream visualizations.
//! Everything past byte acquisition is synchronous and purely functional;
//! the produced [`Dataset`](data::model::Dataset) is an immutable value.

pub mod aggregate;
pub mod config;
pub mod data;
pub mod error;
pub mod stats;

pub use aggregate::{group_by_material, top_n_comparison};
pub use config::PipelineConfig;
pub use data::filter::{apply_filters, FilterCriteria, NumericRange};
pub use data::ingest::{ingest, DropStats, Ingested};
pub use data::model::{Dataset, Record, Value};
pub use data::validate::validate;
pub use error::IngestError;
