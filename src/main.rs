use std::path::Path;

use anyhow::{bail, Context, Result};

use filastat::config::{MEDIA_TYPE_XLS, MEDIA_TYPE_XLSX};
use filastat::{group_by_material, ingest, top_n_comparison, validate, PipelineConfig};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let as_json = args.iter().any(|a| a == "--json");
    let path = args
        .iter()
        .find(|a| !a.starts_with("--"))
        .context("usage: filastat [--json] <file.xlsx|file.xls>")?;
    let path = Path::new(path);

    let media_type = match path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
        .as_str()
    {
        "xlsx" => MEDIA_TYPE_XLSX,
        "xls" => MEDIA_TYPE_XLS,
        other => bail!("unsupported file extension: .{other}"),
    };

    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let cfg = PipelineConfig::default();

    let ingested = ingest(&bytes, bytes.len() as u64, media_type, &cfg)
        .with_context(|| format!("ingesting {}", path.display()))?;

    let diagnostics = validate(&ingested.dataset, &cfg);
    if !diagnostics.is_empty() {
        for diag in &diagnostics {
            eprintln!("diagnostic: {diag}");
        }
        bail!("dataset rejected with {} diagnostic(s)", diagnostics.len());
    }

    let ds = &ingested.dataset;

    if as_json {
        let report = serde_json::json!({
            "dataset": ds,
            "dropped": ingested.dropped,
            "materials": group_by_material(ds, &cfg),
            "top": top_n_comparison(ds, &cfg),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} records, {} columns ({} noise rows and {} unidentified records dropped)",
        ds.len(),
        ds.columns.len(),
        ingested.dropped.noise_rows,
        ingested.dropped.unidentified_records,
    );

    println!("\nPer-material averages:");
    for group in group_by_material(ds, &cfg) {
        let means: Vec<String> = group
            .means
            .iter()
            .map(|m| match m.mean {
                Some(v) => format!("{}={v}", m.column),
                None => format!("{}=-", m.column),
            })
            .collect();
        println!(
            "  {:<12} ({} records)  {}",
            group.material,
            group.records,
            means.join("  ")
        );
    }

    let top = top_n_comparison(ds, &cfg);
    println!("\nTop {} by combined strength:", top.entries.len());
    for entry in &top.entries {
        let cells: Vec<String> = top
            .columns
            .iter()
            .zip(&entry.cells)
            .map(|(col, cell)| match (cell.value, cell.normalized) {
                (Some(v), Some(n)) => format!("{col}={v} ({n})"),
                _ => format!("{col}=-"),
            })
            .collect();
        println!(
            "  {:<20} score {:<8} {}",
            entry.label,
            entry.score,
            cells.join("  ")
        );
    }

    Ok(())
}
