//! Derived views over an accepted dataset: per-material averages and the
//! top-N strength comparison.  Everything here recomputes from the dataset
//! slice it is handed; nothing is cached or mutated in place.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::PipelineConfig;
use crate::data::model::{Dataset, Record};

// ---------------------------------------------------------------------------
// Group-by-material averaging
// ---------------------------------------------------------------------------

/// Mean of one numeric column within a group.  `None` when the group holds
/// no value for the column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnMean {
    pub column: String,
    pub mean: Option<f64>,
}

/// One material partition with its per-column averages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialGroup {
    pub material: String,
    pub records: usize,
    pub means: Vec<ColumnMean>,
}

/// Partition records by base material and average the first
/// `group_column_limit` numeric columns per group over non-missing values,
/// rounded to 2 decimal digits.  Groups come back in material order.
pub fn group_by_material(dataset: &Dataset, cfg: &PipelineConfig) -> Vec<MaterialGroup> {
    let columns: Vec<&str> = dataset
        .numeric_columns()
        .into_iter()
        .take(cfg.group_column_limit)
        .collect();

    let mut groups: BTreeMap<String, Vec<&Record>> = BTreeMap::new();
    for rec in &dataset.records {
        if let Some(material) = base_material(rec, cfg) {
            groups.entry(material).or_default().push(rec);
        }
    }

    groups
        .into_iter()
        .map(|(material, members)| {
            let means = columns
                .iter()
                .map(|col| {
                    let values: Vec<f64> =
                        members.iter().filter_map(|r| r.number(col)).collect();
                    let mean = if values.is_empty() {
                        None
                    } else {
                        Some(round2(values.iter().sum::<f64>() / values.len() as f64))
                    };
                    ColumnMean {
                        column: col.to_string(),
                        mean,
                    }
                })
                .collect();
            MaterialGroup {
                material,
                records: members.len(),
                means,
            }
        })
        .collect()
}

/// First non-null material alias of a record, rendered as text.  The
/// literal "undefined" disqualifies the record from every group.
fn base_material(rec: &Record, cfg: &PipelineConfig) -> Option<String> {
    for alias in &cfg.material_aliases {
        let value = rec.get(alias);
        if value.is_null() {
            continue;
        }
        let rendered = value.to_string();
        if rendered.eq_ignore_ascii_case("undefined") {
            return None;
        }
        return Some(rendered);
    }
    None
}

// ---------------------------------------------------------------------------
// Top-N ranked comparison
// ---------------------------------------------------------------------------

/// One compared cell: the raw value kept for display next to its min-max
/// normalized position within the whole dataset's range for that column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonCell {
    pub value: Option<f64>,
    pub normalized: Option<f64>,
}

/// One ranked record of the comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopEntry {
    /// Position of the record in the source dataset.
    pub index: usize,
    /// Display label: the first populated identifying column.
    pub label: String,
    /// Composite strength score the ranking is based on.
    pub score: f64,
    /// One cell per comparison column.
    pub cells: Vec<ComparisonCell>,
}

/// The ranked comparison structure consumed by the comparison chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopComparison {
    /// The compared numeric columns, in key-discovery order.
    pub columns: Vec<String>,
    /// The top records, strongest first.
    pub entries: Vec<TopEntry>,
}

/// Rank all records by a composite score (the sum of the resolved strength
/// columns, 0 when absent), descending with stable ties, and compare the
/// top `top_n` across the first `comparison_column_limit` numeric columns.
/// Normalization is against the entire dataset's per-column range, rounded
/// to 1 decimal digit.
pub fn top_n_comparison(dataset: &Dataset, cfg: &PipelineConfig) -> TopComparison {
    let columns: Vec<String> = dataset
        .numeric_columns()
        .into_iter()
        .take(cfg.comparison_column_limit)
        .map(|s| s.to_string())
        .collect();

    let strength_columns = resolve_strength_columns(dataset, cfg);

    let mut ranked: Vec<(usize, f64)> = dataset
        .records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            let score: f64 = strength_columns
                .iter()
                .map(|col| rec.number(col).unwrap_or(0.0))
                .sum();
            (i, score)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(cfg.top_n);

    // Per-column dataset-wide ranges, computed once.
    let ranges: Vec<(f64, f64)> = columns
        .iter()
        .map(|col| {
            let values = dataset.column_values(col);
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            (min, max)
        })
        .collect();

    let entries = ranked
        .into_iter()
        .map(|(index, score)| {
            let rec = &dataset.records[index];
            let cells = columns
                .iter()
                .zip(&ranges)
                .map(|(col, (min, max))| {
                    let value = rec.number(col);
                    let normalized = value.map(|v| {
                        let range = max - min;
                        if range == 0.0 {
                            0.0
                        } else {
                            round1((v - min) / range * 100.0)
                        }
                    });
                    ComparisonCell { value, normalized }
                })
                .collect();
            TopEntry {
                index,
                label: entry_label(rec, index, cfg),
                score,
                cells,
            }
        })
        .collect();

    TopComparison { columns, entries }
}

/// Resolve each strength keyword to the first numeric column containing it.
fn resolve_strength_columns(dataset: &Dataset, cfg: &PipelineConfig) -> Vec<String> {
    let numeric = dataset.numeric_columns();
    cfg.strength_keywords
        .iter()
        .filter_map(|kw| {
            numeric
                .iter()
                .find(|col| col.to_lowercase().contains(kw))
                .map(|col| col.to_string())
        })
        .collect()
}

fn entry_label(rec: &Record, index: usize, cfg: &PipelineConfig) -> String {
    cfg.identifying_columns
        .iter()
        .map(|col| rec.get(col))
        .find(|v| !v.is_null())
        .map(|v| v.to_string())
        .unwrap_or_else(|| format!("row {index}"))
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Value;
    use std::collections::BTreeMap;

    fn record(pairs: &[(&str, Value)]) -> Record {
        let fields: BTreeMap<String, Value> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        Record { fields }
    }

    fn dataset() -> Dataset {
        Dataset::from_records(
            vec![
                "Brand".into(),
                "Material".into(),
                "Tensile strength".into(),
                "Izod impact".into(),
            ],
            vec![
                record(&[
                    ("Brand", Value::Str("Acme".into())),
                    ("Material", Value::Str("PLA".into())),
                    ("Tensile strength", Value::Num(40.0)),
                    ("Izod impact", Value::Num(3.0)),
                ]),
                record(&[
                    ("Brand", Value::Str("Bolt".into())),
                    ("Material", Value::Str("PLA".into())),
                    ("Tensile strength", Value::Num(50.0)),
                    ("Izod impact", Value::Null),
                ]),
                record(&[
                    ("Brand", Value::Str("Core".into())),
                    ("Material", Value::Str("PETG".into())),
                    ("Tensile strength", Value::Num(60.0)),
                    ("Izod impact", Value::Num(5.0)),
                ]),
                record(&[
                    ("Brand", Value::Str("Dust".into())),
                    ("Material", Value::Null),
                    ("Tensile strength", Value::Num(70.0)),
                    ("Izod impact", Value::Num(1.0)),
                ]),
            ],
        )
    }

    #[test]
    fn groups_average_over_non_missing_values() {
        let cfg = PipelineConfig::default();
        let groups = group_by_material(&dataset(), &cfg);

        // "Dust" has no populated material alias and joins no group
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].material, "PETG");
        assert_eq!(groups[1].material, "PLA");
        assert_eq!(groups[1].records, 2);

        let pla_tensile = &groups[1].means[0];
        assert_eq!(pla_tensile.column, "Tensile strength");
        assert_eq!(pla_tensile.mean, Some(45.0));
        // Izod mean skips Bolt's missing value
        assert_eq!(groups[1].means[1].mean, Some(3.0));
    }

    #[test]
    fn means_are_rounded_to_two_digits() {
        let cfg = PipelineConfig::default();
        let ds = Dataset::from_records(
            vec!["Material".into(), "Tensile strength".into()],
            vec![
                record(&[
                    ("Material", Value::Str("PLA".into())),
                    ("Tensile strength", Value::Num(1.0)),
                ]),
                record(&[
                    ("Material", Value::Str("PLA".into())),
                    ("Tensile strength", Value::Num(2.0)),
                ]),
                record(&[
                    ("Material", Value::Str("PLA".into())),
                    ("Tensile strength", Value::Num(2.0)),
                ]),
            ],
        );
        let groups = group_by_material(&ds, &cfg);
        assert_eq!(groups[0].means[0].mean, Some(1.67));
    }

    #[test]
    fn top_n_ranks_by_combined_strength_score() {
        let cfg = PipelineConfig::default();
        let top = top_n_comparison(&dataset(), &cfg);

        assert_eq!(top.columns, vec!["Tensile strength", "Izod impact"]);
        assert_eq!(top.entries.len(), 3);
        // scores: Dust 71, Core 65, Bolt 50 (missing izod counts as 0), Acme 43
        assert_eq!(top.entries[0].label, "Dust");
        assert_eq!(top.entries[0].score, 71.0);
        assert_eq!(top.entries[1].label, "Core");
        assert_eq!(top.entries[2].label, "Bolt");
    }

    #[test]
    fn normalization_spans_the_whole_dataset_range() {
        let cfg = PipelineConfig::default();
        let top = top_n_comparison(&dataset(), &cfg);

        // tensile range over ALL records is [40, 70]
        let dust = &top.entries[0];
        assert_eq!(dust.cells[0].value, Some(70.0));
        assert_eq!(dust.cells[0].normalized, Some(100.0));

        let bolt = &top.entries[2];
        assert_eq!(bolt.cells[0].value, Some(50.0));
        assert_eq!(bolt.cells[0].normalized, Some(33.3));
        assert_eq!(bolt.cells[1].value, None);
        assert_eq!(bolt.cells[1].normalized, None);
    }

    #[test]
    fn literal_undefined_material_is_excluded_from_every_group() {
        let cfg = PipelineConfig::default();
        let ds = Dataset::from_records(
            vec!["Material".into(), "Tensile strength".into()],
            vec![record(&[
                ("Material", Value::Str("undefined".into())),
                ("Tensile strength", Value::Num(1.0)),
            ])],
        );
        assert!(group_by_material(&ds, &cfg).is_empty());
    }
}
