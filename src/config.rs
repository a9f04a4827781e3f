use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Pipeline configuration
// ---------------------------------------------------------------------------

/// MIME type declared by xlsx uploads.
pub const MEDIA_TYPE_XLSX: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
/// MIME type declared by legacy xls uploads.
pub const MEDIA_TYPE_XLS: &str = "application/vnd.ms-excel";

/// Every allow-list and structural constant the pipeline relies on.
///
/// The defaults reproduce the layout of the upstream measurement-tool export
/// (title row, header row at index 1, data from index 2, identifying column
/// at position 1).  Tests inject synthetic variants instead of patching
/// globals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Hard ceiling on the input file size, in bytes.
    pub max_input_bytes: u64,
    /// Declared media types accepted by the decoder.
    pub accepted_media_types: Vec<String>,

    /// Case-folded substring that marks the target sheet name.
    pub sheet_name_hint: String,
    /// Case-folded substring that disqualifies a sheet name.
    pub sheet_name_veto: String,

    /// Row index of the header row.
    pub header_row: usize,
    /// Row index where data rows begin.
    pub data_start_row: usize,
    /// Minimum number of rows a usable sheet must carry.
    pub min_sheet_rows: usize,
    /// Positional index of the primary identifying column.
    pub id_column: usize,

    /// Lowercase markers of stray annotation rows inside the data region.
    pub noise_markers: Vec<String>,
    /// Minimum non-empty cells for a row to count as data.
    pub min_meaningful_cells: usize,
    /// Identification fallback: a record with strictly more populated fields
    /// than this is kept even without a canonical identifying column.
    pub min_breadth: usize,
    /// Canonical identifying column keys.
    pub identifying_columns: Vec<String>,

    /// Hostnames allowed for URL-typed cells (exact or dot-suffixed subdomain).
    pub trusted_hosts: Vec<String>,

    /// Hard cap on accepted records.
    pub max_records: usize,
    /// Maximum length of a column key.
    pub max_key_length: usize,
    /// Number of leading records sampled by the quality check.
    pub sample_rows: usize,
    /// Maximum length of a string cell retained by the mapper.
    pub max_cell_chars: usize,
    /// String length treated as a quality issue by the sampler.
    pub max_sampled_chars: usize,
    /// Numeric magnitude treated as a quality issue by the sampler.
    pub max_magnitude: f64,
    /// Case-folded substrings identifying measurement columns.
    pub measurement_keywords: Vec<String>,

    /// Column keys tried, in order, to resolve a record's base material.
    pub material_aliases: Vec<String>,
    /// Case-folded substrings resolving the two strength columns that make
    /// up the top-N composite score.
    pub strength_keywords: Vec<String>,
    /// Columns projected into the free-text filter.
    pub text_search_columns: Vec<String>,

    /// Numeric columns included in the per-material averages.
    pub group_column_limit: usize,
    /// Numeric columns included in the top-N comparison.
    pub comparison_column_limit: usize,
    /// Number of records ranked by the top-N comparison.
    pub top_n: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            max_input_bytes: 50 * 1024 * 1024,
            accepted_media_types: vec![
                MEDIA_TYPE_XLSX.to_string(),
                MEDIA_TYPE_XLS.to_string(),
            ],
            sheet_name_hint: "filament".to_string(),
            sheet_name_veto: "flexible".to_string(),
            header_row: 1,
            data_start_row: 2,
            min_sheet_rows: 3,
            id_column: 1,
            noise_markers: [
                "new rows",
                "orange bg",
                "metadata",
                "header",
                "note:",
                "comment",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            min_meaningful_cells: 2,
            min_breadth: 3,
            identifying_columns: ["Brand", "Filament type", "Material", "Type"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            trusted_hosts: ["youtube.com", "youtu.be", "vimeo.com"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_records: 10_000,
            max_key_length: 100,
            sample_rows: 100,
            max_cell_chars: 1000,
            max_sampled_chars: 500,
            max_magnitude: 1e10,
            measurement_keywords: ["tensile", "layer", "izod"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            material_aliases: ["Material", "Base material", "Filament type", "Type"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            strength_keywords: ["tensile", "izod"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            text_search_columns: ["Brand", "Filament type", "Material", "Color", "Name"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            group_column_limit: 5,
            comparison_column_limit: 6,
            top_n: 3,
        }
    }
}
