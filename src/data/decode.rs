use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use crate::config::PipelineConfig;
use crate::error::IngestError;

use super::model::{RawCell, RawSheet};

// ---------------------------------------------------------------------------
// Workbook decoder
// ---------------------------------------------------------------------------

/// Decode the spreadsheet container held in `bytes` and return the target
/// sheet as raw rows.
///
/// The declared size and media type are checked before any decoding work;
/// violations are [`IngestError::Input`].  An undecodable container, or a
/// sheet without the mandatory title / header / data layout, is
/// [`IngestError::Parse`].
pub fn decode_workbook(
    bytes: &[u8],
    declared_len: u64,
    media_type: &str,
    cfg: &PipelineConfig,
) -> Result<RawSheet, IngestError> {
    if declared_len > cfg.max_input_bytes {
        return Err(IngestError::input(format!(
            "file size {declared_len} exceeds the {} byte limit",
            cfg.max_input_bytes
        )));
    }
    if !cfg.accepted_media_types.iter().any(|t| t == media_type) {
        return Err(IngestError::input(format!(
            "unsupported media type: {media_type}"
        )));
    }

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| IngestError::parse(format!("unreadable container: {e}")))?;

    let names: Vec<String> = workbook.sheet_names().to_vec();
    if names.is_empty() {
        return Err(IngestError::parse("workbook contains no sheets"));
    }
    let selected = select_sheet(&names, cfg);
    log::debug!("selected sheet {selected:?} out of {}", names.len());

    let range = workbook
        .worksheet_range(&selected)
        .map_err(|e| IngestError::parse(format!("sheet {selected:?} unreadable: {e}")))?;

    // Restore the used-range offset so row and column indices stay absolute;
    // the layout constants (header row, identifying column) address the
    // sheet, not the first populated cell.
    let (row_offset, col_offset) = match range.start() {
        Some((r, c)) => (r as usize, c as usize),
        None => (0, 0),
    };

    let mut rows: Vec<Vec<RawCell>> = vec![Vec::new(); row_offset];
    for raw_row in range.rows() {
        let mut row: Vec<RawCell> = vec![RawCell::Empty; col_offset];
        row.extend(raw_row.iter().map(fold_cell));
        rows.push(row);
    }

    if rows.len() < cfg.min_sheet_rows {
        return Err(IngestError::parse(format!(
            "sheet {selected:?} has {} rows, expected at least {}",
            rows.len(),
            cfg.min_sheet_rows
        )));
    }
    let header_missing = rows
        .get(cfg.header_row)
        .map(|r| r.iter().all(RawCell::is_empty))
        .unwrap_or(true);
    if header_missing {
        return Err(IngestError::parse(format!(
            "sheet {selected:?} has no header row at index {}",
            cfg.header_row
        )));
    }

    Ok(RawSheet {
        name: selected,
        rows,
    })
}

/// Pick the first sheet name whose case-folded form contains the hint but
/// not the veto; fall back to the first sheet.
fn select_sheet(names: &[String], cfg: &PipelineConfig) -> String {
    names
        .iter()
        .find(|name| {
            let folded = name.to_lowercase();
            folded.contains(&cfg.sheet_name_hint) && !folded.contains(&cfg.sheet_name_veto)
        })
        .unwrap_or(&names[0])
        .clone()
}

/// Fold every container cell type into the four-variant [`RawCell`] model.
/// Date/time serials become numbers, ISO datetime/duration text stays text,
/// cell errors carry no usable content.
fn fold_cell(data: &Data) -> RawCell {
    match data {
        Data::Empty => RawCell::Empty,
        Data::String(s) => RawCell::Str(s.clone()),
        Data::Float(f) => RawCell::Num(*f),
        Data::Int(i) => RawCell::Num(*i as f64),
        Data::Bool(b) => RawCell::Bool(*b),
        Data::DateTime(dt) => RawCell::Num(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => RawCell::Str(s.clone()),
        Data::Error(_) => RawCell::Empty,
    }
}
