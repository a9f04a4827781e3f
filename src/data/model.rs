use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// RawCell – one undecoded cell at the container boundary
// ---------------------------------------------------------------------------

/// A raw cell as decoded from the spreadsheet container, before any
/// sanitization.  All container cell types fold into these four variants;
/// downstream code pattern-matches instead of coercing implicitly.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Str(String),
    Num(f64),
    Bool(bool),
    Empty,
}

impl RawCell {
    /// Whether the cell carries any content at all.
    pub fn is_empty(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::Str(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Textual rendering used by the row-noise scan.
    pub fn text(&self) -> String {
        match self {
            RawCell::Str(s) => s.clone(),
            RawCell::Num(n) => n.to_string(),
            RawCell::Bool(b) => b.to_string(),
            RawCell::Empty => String::new(),
        }
    }
}

/// One decoded sheet: the selected sheet name plus its raw rows.  Exists
/// only for the duration of one ingestion call.
#[derive(Debug, Clone)]
pub struct RawSheet {
    pub name: String,
    pub rows: Vec<Vec<RawCell>>,
}

// ---------------------------------------------------------------------------
// Value – a sanitized record field
// ---------------------------------------------------------------------------

/// A sanitized, typed record value.  Skipped or rejected cells are `Null`,
/// never absent, so every record exposes the same key set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Str(String),
    Num(f64),
    Null,
}

// -- Manual Eq/Ord so Value can live in BTreeSet --

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use Value::*;
        fn discriminant(v: &Value) -> u8 {
            match v {
                Null => 0,
                Num(_) => 1,
                Str(_) => 2,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Num(a), Num(b)) => a.total_cmp(b),
            (Str(a), Str(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Str(s) => s.hash(state),
            Value::Num(n) => n.to_bits().hash(state),
            Value::Null => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{s}"),
            Value::Num(n) => write!(f, "{n}"),
            Value::Null => Ok(()),
        }
    }
}

impl Value {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Num(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

// ---------------------------------------------------------------------------
// Record – one sanitized logical row
// ---------------------------------------------------------------------------

/// One sanitized row, keyed by the retained header keys.  Every record of a
/// dataset carries the full key universe; missing cells hold `Value::Null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn get(&self, key: &str) -> &Value {
        self.fields.get(key).unwrap_or(&Value::Null)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).as_f64()
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).as_str()
    }

    /// Count of non-null fields.
    pub fn populated(&self) -> usize {
        self.fields.values().filter(|v| !v.is_null()).count()
    }
}

// ---------------------------------------------------------------------------
// Dataset – the accepted, ordered record sequence
// ---------------------------------------------------------------------------

/// The full accepted dataset with pre-computed column indices.
///
/// `columns` preserves header-discovery order (the source column order),
/// which the aggregation engine relies on when it picks "the first N numeric
/// columns".  `unique_values` backs the categorical filter widgets outside
/// the core.
#[derive(Debug, Clone, Serialize)]
pub struct Dataset {
    /// All records, in source row order.
    pub records: Vec<Record>,
    /// Column keys in header order.
    pub columns: Vec<String>,
    /// For each column the sorted set of unique non-null values.
    pub unique_values: BTreeMap<String, BTreeSet<Value>>,
}

impl Dataset {
    /// Build column indices from accepted records.  `columns` must be the
    /// retained header keys in source order.
    pub fn from_records(columns: Vec<String>, records: Vec<Record>) -> Self {
        let mut unique_values: BTreeMap<String, BTreeSet<Value>> = BTreeMap::new();

        for rec in &records {
            for (col, val) in &rec.fields {
                if val.is_null() {
                    continue;
                }
                unique_values
                    .entry(col.clone())
                    .or_default()
                    .insert(val.clone());
            }
        }
        Dataset {
            records,
            columns,
            unique_values,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Column keys, in source order, that hold at least one numeric value.
    pub fn numeric_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|col| {
                self.records
                    .iter()
                    .any(|r| matches!(r.get(col), Value::Num(_)))
            })
            .map(|s| s.as_str())
            .collect()
    }

    /// All numeric values of one column, in record order, missing cells
    /// skipped.
    pub fn column_values(&self, key: &str) -> Vec<f64> {
        self.records.iter().filter_map(|r| r.number(key)).collect()
    }
}
