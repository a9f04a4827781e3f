use crate::config::PipelineConfig;

use super::model::{Dataset, Value};

// ---------------------------------------------------------------------------
// Schema validator – post-ingestion acceptance gate
// ---------------------------------------------------------------------------

/// Number of sampled quality issues surfaced verbatim before the remainder
/// folds into a single count.
const MAX_LISTED_ISSUES: usize = 5;

/// Validate a full dataset and return an ordered diagnostic list.  Empty
/// means pass.  Diagnostics are data, not errors: the caller decides what a
/// non-empty list means (the reference policy rejects the whole ingestion).
pub fn validate(dataset: &Dataset, cfg: &PipelineConfig) -> Vec<String> {
    let mut diagnostics = Vec::new();

    if dataset.is_empty() {
        diagnostics.push("dataset is empty: no records survived ingestion".to_string());
        return diagnostics;
    }
    if dataset.len() > cfg.max_records {
        diagnostics.push(format!(
            "row count {} exceeds the maximum of {}",
            dataset.len(),
            cfg.max_records
        ));
        return diagnostics;
    }

    let bad_keys: Vec<&str> = dataset
        .columns
        .iter()
        .filter(|key| {
            key.contains('<')
                || key.contains('>')
                || key.to_lowercase().contains("script")
                || key.chars().count() > cfg.max_key_length
        })
        .map(|s| s.as_str())
        .collect();
    if !bad_keys.is_empty() {
        diagnostics.push(format!(
            "unsafe or oversized column keys: {}",
            bad_keys.join(", ")
        ));
    }

    let first = &dataset.records[0];
    let has_identifying = cfg
        .identifying_columns
        .iter()
        .any(|col| first.fields.contains_key(col));
    if !has_identifying {
        diagnostics.push(format!(
            "no identifying column present; expected one of: {}",
            cfg.identifying_columns.join(", ")
        ));
    }

    let has_measurement = dataset.numeric_columns().iter().any(|col| {
        let folded = col.to_lowercase();
        cfg.measurement_keywords.iter().any(|kw| folded.contains(kw))
    });
    if !has_measurement {
        diagnostics.push("no numeric measurement columns found".to_string());
    }

    diagnostics.extend(sample_quality_issues(dataset, cfg));
    diagnostics
}

/// Scan the first `sample_rows` records for out-of-contract values.  The
/// first few issues are reported individually; any remainder collapses into
/// one summary line.
fn sample_quality_issues(dataset: &Dataset, cfg: &PipelineConfig) -> Vec<String> {
    let mut issues = Vec::new();

    for (row, record) in dataset.records.iter().take(cfg.sample_rows).enumerate() {
        for (key, value) in &record.fields {
            match value {
                Value::Num(n) if !n.is_finite() || n.abs() > cfg.max_magnitude => {
                    issues.push(format!("record {row}, column {key:?}: out-of-range number {n}"));
                }
                Value::Str(s) if s.chars().count() > cfg.max_sampled_chars => {
                    issues.push(format!(
                        "record {row}, column {key:?}: string of {} characters",
                        s.chars().count()
                    ));
                }
                _ => {}
            }
        }
    }

    if issues.len() > MAX_LISTED_ISSUES {
        let remainder = issues.len() - MAX_LISTED_ISSUES;
        issues.truncate(MAX_LISTED_ISSUES);
        issues.push(format!("... and {remainder} more quality issues in the sample"));
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Record;

    fn record(pairs: &[(&str, Value)]) -> Record {
        Record {
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        }
    }

    fn healthy_dataset() -> Dataset {
        let records = vec![record(&[
            ("Brand", Value::Str("Acme".into())),
            ("Tensile strength", Value::Num(40.0)),
        ])];
        Dataset::from_records(
            vec!["Brand".into(), "Tensile strength".into()],
            records,
        )
    }

    #[test]
    fn healthy_dataset_passes() {
        let cfg = PipelineConfig::default();
        assert!(validate(&healthy_dataset(), &cfg).is_empty());
    }

    #[test]
    fn empty_dataset_short_circuits() {
        let cfg = PipelineConfig::default();
        let ds = Dataset::from_records(vec!["Brand".into()], Vec::new());
        let diags = validate(&ds, &cfg);
        assert_eq!(diags.len(), 1);
        assert!(diags[0].contains("empty"));
    }

    #[test]
    fn row_cap_short_circuits_before_other_checks() {
        let cfg = PipelineConfig::default();
        let rec = record(&[("mystery", Value::Num(f64::NAN))]);
        let records = vec![rec; cfg.max_records + 1];
        let ds = Dataset::from_records(vec!["mystery".into()], records);
        let diags = validate(&ds, &cfg);
        assert_eq!(diags.len(), 1);
        assert!(diags[0].contains("exceeds the maximum"));
    }

    #[test]
    fn unsafe_column_keys_are_listed() {
        let cfg = PipelineConfig::default();
        let records = vec![record(&[
            ("Brand", Value::Str("Acme".into())),
            ("Tensile strength", Value::Num(40.0)),
            ("<script>x", Value::Str("y".into())),
        ])];
        let ds = Dataset::from_records(
            vec!["Brand".into(), "Tensile strength".into(), "<script>x".into()],
            records,
        );
        let diags = validate(&ds, &cfg);
        assert_eq!(diags.len(), 1);
        assert!(diags[0].contains("<script>x"));
    }

    #[test]
    fn missing_identifying_column_is_reported() {
        let cfg = PipelineConfig::default();
        let records = vec![record(&[("Tensile strength", Value::Num(40.0))])];
        let ds = Dataset::from_records(vec!["Tensile strength".into()], records);
        let diags = validate(&ds, &cfg);
        assert_eq!(diags.len(), 1);
        assert!(diags[0].contains("identifying column"));
    }

    #[test]
    fn missing_measurement_column_is_reported() {
        let cfg = PipelineConfig::default();
        let records = vec![record(&[
            ("Brand", Value::Str("Acme".into())),
            ("Color", Value::Str("red".into())),
        ])];
        let ds = Dataset::from_records(vec!["Brand".into(), "Color".into()], records);
        let diags = validate(&ds, &cfg);
        assert_eq!(diags, vec!["no numeric measurement columns found".to_string()]);
    }

    #[test]
    fn quality_issues_beyond_five_fold_into_a_count() {
        let cfg = PipelineConfig::default();
        let records: Vec<Record> = (0..7)
            .map(|_| {
                record(&[
                    ("Brand", Value::Str("Acme".into())),
                    ("Tensile strength", Value::Num(1e12)),
                ])
            })
            .collect();
        let ds = Dataset::from_records(
            vec!["Brand".into(), "Tensile strength".into()],
            records,
        );
        let diags = validate(&ds, &cfg);
        assert_eq!(diags.len(), MAX_LISTED_ISSUES + 1);
        assert!(diags.last().unwrap().contains("2 more quality issues"));
    }
}
