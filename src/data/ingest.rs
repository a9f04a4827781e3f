use serde::Serialize;

use crate::config::PipelineConfig;
use crate::error::IngestError;

use super::decode::decode_workbook;
use super::model::{Dataset, RawCell, RawSheet, Record, Value};
use super::sanitize::{sanitize_number, sanitize_string, validate_url};

// ---------------------------------------------------------------------------
// Ingestion entry point
// ---------------------------------------------------------------------------

/// Row-level drop counters.  Rejections below the whole-file level are
/// silent and non-fatal; these counts are the only trace they leave.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DropStats {
    /// Data-region rows inspected.
    pub rows_scanned: usize,
    /// Rows discarded by the structural noise filter.
    pub noise_rows: usize,
    /// Mapped records dropped for lacking an identification signal.
    pub unidentified_records: usize,
}

/// The two-output ingestion result: the accepted dataset plus the drop
/// counters, so callers and tests can assert on losses deterministically.
#[derive(Debug, Clone)]
pub struct Ingested {
    pub dataset: Dataset,
    pub dropped: DropStats,
}

/// Run the full decode → filter → map → validate pipeline over one uploaded
/// file.  Once bytes are in hand the pipeline runs to completion or fails
/// atomically; there is no partial dataset and no retry.
pub fn ingest(
    bytes: &[u8],
    declared_len: u64,
    media_type: &str,
    cfg: &PipelineConfig,
) -> Result<Ingested, IngestError> {
    let sheet = decode_workbook(bytes, declared_len, media_type, cfg)?;
    let headers = header_row(&sheet, cfg);
    if headers.is_empty() {
        return Err(IngestError::parse(format!(
            "sheet {:?}: no usable header cells at row {}",
            sheet.name, cfg.header_row
        )));
    }
    let columns: Vec<String> = headers.iter().map(|(_, key)| key.clone()).collect();

    let mut dropped = DropStats::default();
    let mut records = Vec::new();

    for row in sheet.rows.iter().skip(cfg.data_start_row) {
        dropped.rows_scanned += 1;
        if is_noise_row(row, cfg) {
            dropped.noise_rows += 1;
            continue;
        }
        let record = map_row(&headers, row, cfg);
        if !has_identification_signal(&record, cfg) {
            dropped.unidentified_records += 1;
            continue;
        }
        records.push(record);
    }

    log::info!(
        "ingested {} records from sheet {:?} ({} noise rows, {} unidentified)",
        records.len(),
        sheet.name,
        dropped.noise_rows,
        dropped.unidentified_records,
    );

    Ok(Ingested {
        dataset: Dataset::from_records(columns, records),
        dropped,
    })
}

// ---------------------------------------------------------------------------
// Header derivation
// ---------------------------------------------------------------------------

/// Sanitize the header row into `(column index, key)` pairs.  Cells that
/// sanitize to nothing are dropped and never produce a column.
fn header_row(sheet: &RawSheet, cfg: &PipelineConfig) -> Vec<(usize, String)> {
    let Some(row) = sheet.rows.get(cfg.header_row) else {
        return Vec::new();
    };
    row.iter()
        .enumerate()
        .filter_map(|(idx, cell)| {
            let key = sanitize_string(&cell.text());
            if key.is_empty() {
                None
            } else {
                Some((idx, key))
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Row filter – cheap structural rejection before per-cell work
// ---------------------------------------------------------------------------

/// Whether a data-region row is noise: empty rows, human annotation rows
/// recognized by their markers, rows with too little content, and rows
/// whose identifying cell carries nothing usable.
fn is_noise_row(row: &[RawCell], cfg: &PipelineConfig) -> bool {
    if row.is_empty() {
        return true;
    }

    let joined = row
        .iter()
        .map(RawCell::text)
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    if cfg.noise_markers.iter().any(|m| joined.contains(m)) {
        return true;
    }

    let meaningful = row.iter().filter(|c| !c.is_empty()).count();
    if meaningful < cfg.min_meaningful_cells {
        return true;
    }

    match row.get(cfg.id_column) {
        None | Some(RawCell::Empty) => true,
        Some(RawCell::Str(s)) => {
            let s = s.trim();
            s.is_empty() || s.eq_ignore_ascii_case("undefined")
        }
        Some(_) => false,
    }
}

// ---------------------------------------------------------------------------
// Record mapper
// ---------------------------------------------------------------------------

/// Map one surviving raw row into a record against the retained headers.
/// Every header key is present in the result; skipped cells store `Null`.
fn map_row(headers: &[(usize, String)], row: &[RawCell], cfg: &PipelineConfig) -> Record {
    let fields = headers
        .iter()
        .map(|(idx, key)| {
            let value = row
                .get(*idx)
                .map(|cell| map_cell(key, cell, cfg))
                .unwrap_or(Value::Null);
            (key.clone(), value)
        })
        .collect();
    Record { fields }
}

fn map_cell(key: &str, cell: &RawCell, cfg: &PipelineConfig) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    if let RawCell::Str(s) = cell {
        if s.trim().eq_ignore_ascii_case("undefined") {
            return Value::Null;
        }
    }

    let folded = key.to_lowercase();
    if folded.contains("link") || folded.contains("url") {
        let sanitized = sanitize_string(&cell.text());
        return match validate_url(&sanitized, &cfg.trusted_hosts) {
            Some(u) => Value::Str(u),
            None => Value::Null,
        };
    }

    let numeric = match cell {
        RawCell::Num(_) => true,
        RawCell::Str(s) => {
            let t = s.trim();
            !t.is_empty() && t.parse::<f64>().is_ok()
        }
        _ => false,
    };
    if numeric {
        return Value::Num(sanitize_number(cell));
    }

    let sanitized = sanitize_string(&cell.text());
    if sanitized.is_empty() || sanitized.chars().count() > cfg.max_cell_chars {
        Value::Null
    } else {
        Value::Str(sanitized)
    }
}

// ---------------------------------------------------------------------------
// Record validator – identification heuristic
// ---------------------------------------------------------------------------

/// A record is kept when any canonical identifying column is populated, or
/// when it is broad enough that a dataset with unconventional column names
/// still gets through.
fn has_identification_signal(record: &Record, cfg: &PipelineConfig) -> bool {
    let identified = cfg
        .identifying_columns
        .iter()
        .any(|col| !record.get(col).is_null());
    identified || record.populated() > cfg.min_breadth
}
