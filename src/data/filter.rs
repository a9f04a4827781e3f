use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;

use super::model::{Dataset, Value};

// ---------------------------------------------------------------------------
// Filter criteria: what the external widgets hand across the boundary
// ---------------------------------------------------------------------------

/// Inclusive numeric range over one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

impl NumericRange {
    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }
}

/// The full filter selection.  Every clause is optional: an empty category
/// set, an empty query, or an absent range constrains nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Per-column selected categorical values.
    pub categories: BTreeMap<String, BTreeSet<String>>,
    /// Case-insensitive substring query over the configured text projection.
    pub query: String,
    /// Per-column inclusive numeric ranges.
    pub ranges: BTreeMap<String, NumericRange>,
}

// ---------------------------------------------------------------------------
// Filter application
// ---------------------------------------------------------------------------

/// Return a new dataset holding the records that satisfy every active
/// clause, in their original relative order.  The input is never mutated.
pub fn apply_filters(
    dataset: &Dataset,
    criteria: &FilterCriteria,
    cfg: &PipelineConfig,
) -> Dataset {
    let query = criteria.query.trim().to_lowercase();

    let records = dataset
        .records
        .iter()
        .filter(|rec| {
            for (col, selected) in &criteria.categories {
                if selected.is_empty() {
                    continue; // nothing selected → no constraint
                }
                let value = rec.get(col);
                if value.is_null() || !selected.contains(&value.to_string()) {
                    return false;
                }
            }

            for (col, range) in &criteria.ranges {
                // non-numeric and missing values are exempt from the clause
                if let Some(v) = rec.number(col) {
                    if !range.contains(v) {
                        return false;
                    }
                }
            }

            if !query.is_empty() {
                let hit = cfg.text_search_columns.iter().any(|col| {
                    rec.get(col).to_string().to_lowercase().contains(&query)
                });
                if !hit {
                    return false;
                }
            }

            true
        })
        .cloned()
        .collect();

    Dataset::from_records(dataset.columns.clone(), records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Record;

    fn record(brand: &str, material: &str, tensile: Option<f64>) -> Record {
        let mut fields = BTreeMap::new();
        fields.insert("Brand".to_string(), Value::Str(brand.to_string()));
        fields.insert("Material".to_string(), Value::Str(material.to_string()));
        fields.insert(
            "Tensile strength".to_string(),
            tensile.map(Value::Num).unwrap_or(Value::Null),
        );
        Record { fields }
    }

    fn dataset() -> Dataset {
        Dataset::from_records(
            vec![
                "Brand".into(),
                "Material".into(),
                "Tensile strength".into(),
            ],
            vec![
                record("Acme", "PLA", Some(40.0)),
                record("Bolt", "PETG", Some(55.0)),
                record("Acme", "ABS", None),
            ],
        )
    }

    #[test]
    fn empty_criteria_pass_everything_in_order() {
        let cfg = PipelineConfig::default();
        let out = apply_filters(&dataset(), &FilterCriteria::default(), &cfg);
        assert_eq!(out.len(), 3);
        assert_eq!(out.records[0].text("Brand"), Some("Acme"));
        assert_eq!(out.records[1].text("Brand"), Some("Bolt"));
    }

    #[test]
    fn category_clause_is_set_membership() {
        let cfg = PipelineConfig::default();
        let mut criteria = FilterCriteria::default();
        criteria
            .categories
            .insert("Material".into(), ["PLA", "ABS"].iter().map(|s| s.to_string()).collect());
        let out = apply_filters(&dataset(), &criteria, &cfg);
        assert_eq!(out.len(), 2);
        assert!(out.records.iter().all(|r| r.text("Brand") == Some("Acme")));
    }

    #[test]
    fn empty_selection_means_no_constraint() {
        let cfg = PipelineConfig::default();
        let mut criteria = FilterCriteria::default();
        criteria.categories.insert("Material".into(), BTreeSet::new());
        assert_eq!(apply_filters(&dataset(), &criteria, &cfg).len(), 3);
    }

    #[test]
    fn range_clause_exempts_missing_values() {
        let cfg = PipelineConfig::default();
        let mut criteria = FilterCriteria::default();
        criteria.ranges.insert(
            "Tensile strength".into(),
            NumericRange { min: 50.0, max: 60.0 },
        );
        let out = apply_filters(&dataset(), &criteria, &cfg);
        // Bolt is inside the range; Acme/ABS has no value and is exempt
        assert_eq!(out.len(), 2);
        assert_eq!(out.records[0].text("Brand"), Some("Bolt"));
        assert_eq!(out.records[1].text("Material"), Some("ABS"));
    }

    #[test]
    fn text_query_searches_the_configured_projection() {
        let cfg = PipelineConfig::default();
        let mut criteria = FilterCriteria::default();
        criteria.query = "petg".into();
        let out = apply_filters(&dataset(), &criteria, &cfg);
        assert_eq!(out.len(), 1);
        assert_eq!(out.records[0].text("Brand"), Some("Bolt"));
    }

    #[test]
    fn clauses_combine_as_a_conjunction() {
        let cfg = PipelineConfig::default();
        let mut criteria = FilterCriteria::default();
        criteria
            .categories
            .insert("Brand".into(), std::iter::once("Acme".to_string()).collect());
        criteria.ranges.insert(
            "Tensile strength".into(),
            NumericRange { min: 0.0, max: 30.0 },
        );
        let out = apply_filters(&dataset(), &criteria, &cfg);
        // Acme/PLA fails the range, Acme/ABS is exempt from it, Bolt fails the brand
        assert_eq!(out.len(), 1);
        assert_eq!(out.records[0].text("Material"), Some("ABS"));
    }

    #[test]
    fn original_dataset_is_untouched() {
        let cfg = PipelineConfig::default();
        let ds = dataset();
        let mut criteria = FilterCriteria::default();
        criteria.query = "acme".into();
        let _ = apply_filters(&ds, &criteria, &cfg);
        assert_eq!(ds.len(), 3);
    }
}
