/// Data layer: core types, decoding, ingestion, and filtering.
///
/// Architecture:
/// ```text
///  .xlsx / .xls bytes
///        │
///        ▼
///   ┌──────────┐
///   │  decode   │  container → RawSheet (size/type gate, sheet heuristic)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  ingest   │  row filter → sanitize/map → identify → Dataset + drops
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ validate  │  whole-dataset diagnostics (gate)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply FilterCriteria → new Dataset
///   └──────────┘
/// ```

pub mod decode;
pub mod filter;
pub mod ingest;
pub mod model;
pub mod sanitize;
pub mod validate;
