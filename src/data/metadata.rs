//! Sample metadata reading and per-column type inference.

use crate::error::{Result, RrvError};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// A metadata cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// String value (includes boolean-literal columns, see [`SampleMetadata`]).
    Str(String),
    /// Floating-point value.
    Float(f64),
    /// Integer value.
    Int(i64),
    /// Missing value.
    Missing,
}

impl Value {
    /// Check if this is a missing value.
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Try to get as a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as a float.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Convert to a JSON value. Missing cells and non-finite floats become
    /// `null` (JSON has no NaN).
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Str(s) => serde_json::Value::String(s.clone()),
            Value::Float(v) => serde_json::Number::from_f64(*v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Int(v) => serde_json::Value::Number((*v).into()),
            Value::Missing => serde_json::Value::Null,
        }
    }
}

/// Inferred type of a metadata column.
///
/// There is deliberately no boolean variant: columns whose every non-missing
/// cell is the literal `True` or `False` are stored as strings so the exact
/// casing survives into the serialized output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Str,
    Float,
    Int,
}

/// Sample metadata indexed by sample ID.
///
/// Loaded from tab-delimited text with a header row whose first column holds
/// unique sample IDs. Column types are inferred per column:
///
/// 1. every non-missing value is exactly `True` or `False` (case-sensitive)
///    → the column would be boolean; it is coerced to [`ColumnType::Str`],
///    preserving the literals;
/// 2. else every value parses as `i64` and no cell is missing → `Int`
///    (missing cells force the wider float representation);
/// 3. else every non-missing value parses as `f64` → `Float`;
/// 4. otherwise `Str` — mixed columns keep every raw value as a string, so
///    `"5"` alongside `"Missing: Not provided"` stays the string `"5"`.
///
/// Empty cells, `NA`, and `na` are treated as missing.
#[derive(Debug, Clone)]
pub struct SampleMetadata {
    /// Sample IDs in file order.
    sample_ids: Vec<String>,
    /// Column names in file order.
    column_names: Vec<String>,
    /// Data stored as sample_id -> column_name -> Value.
    data: HashMap<String, HashMap<String, Value>>,
    /// Inferred type of each column.
    column_types: HashMap<String, ColumnType>,
}

fn is_missing_token(raw: &str) -> bool {
    raw.is_empty() || raw == "NA" || raw == "na"
}

fn infer_column_type(cells: &[Option<String>]) -> ColumnType {
    let non_missing: Vec<&str> = cells.iter().flatten().map(|s| s.as_str()).collect();
    let has_missing = non_missing.len() < cells.len();

    if !non_missing.is_empty() && non_missing.iter().all(|v| *v == "True" || *v == "False") {
        // Generic inference would make this a boolean column; keep strings
        // instead so "True"/"False" never turn into native booleans.
        return ColumnType::Str;
    }
    if !has_missing && non_missing.iter().all(|v| v.parse::<i64>().is_ok()) {
        return ColumnType::Int;
    }
    if non_missing.iter().all(|v| v.parse::<f64>().is_ok()) {
        // All-missing columns land here too, mirroring the float-typed
        // all-NaN columns the original reader produced.
        return ColumnType::Float;
    }
    ColumnType::Str
}

impl SampleMetadata {
    /// Load metadata from a tab-delimited file.
    pub fn from_tsv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Load metadata from any reader producing tab-delimited text.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        if headers.is_empty() {
            return Err(RrvError::EmptyData("Empty metadata file".to_string()));
        }
        if headers.get(0).map_or(true, |h| h.trim().is_empty()) {
            return Err(RrvError::MissingColumn("sample ID".to_string()));
        }
        if headers.len() < 2 {
            return Err(RrvError::EmptyData(
                "Metadata must have at least one variable column".to_string(),
            ));
        }
        let column_names: Vec<String> = headers.iter().skip(1).map(|s| s.to_string()).collect();

        // First pass: collect raw cells (None = missing) to infer types.
        let mut sample_ids: Vec<String> = Vec::new();
        let mut raw_rows: Vec<Vec<Option<String>>> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for record in rdr.records() {
            let record = record?;
            if record.iter().all(|f| f.trim().is_empty()) {
                continue;
            }
            let sample_id = record.get(0).unwrap_or("").trim().to_string();
            if !seen.insert(sample_id.clone()) {
                return Err(RrvError::DuplicateId(sample_id));
            }
            let cells: Vec<Option<String>> = (0..column_names.len())
                .map(|idx| {
                    record
                        .get(idx + 1)
                        .map(str::trim)
                        .filter(|raw| !is_missing_token(raw))
                        .map(|raw| raw.to_string())
                })
                .collect();
            sample_ids.push(sample_id);
            raw_rows.push(cells);
        }

        if raw_rows.is_empty() {
            return Err(RrvError::EmptyData("No samples in metadata".to_string()));
        }

        // Infer column types
        let mut column_types = HashMap::new();
        for (col_idx, col_name) in column_names.iter().enumerate() {
            let column: Vec<Option<String>> =
                raw_rows.iter().map(|row| row[col_idx].clone()).collect();
            column_types.insert(col_name.clone(), infer_column_type(&column));
        }

        // Build typed cells
        let mut data = HashMap::new();
        for (sample_id, cells) in sample_ids.iter().zip(raw_rows) {
            let mut sample_data = HashMap::new();
            for (col_idx, col_name) in column_names.iter().enumerate() {
                let value = match &cells[col_idx] {
                    None => Value::Missing,
                    Some(raw) => match column_types[col_name] {
                        ColumnType::Int => raw
                            .parse::<i64>()
                            .map(Value::Int)
                            .unwrap_or(Value::Missing),
                        ColumnType::Float => raw
                            .parse::<f64>()
                            .map(Value::Float)
                            .unwrap_or(Value::Missing),
                        ColumnType::Str => Value::Str(raw.clone()),
                    },
                };
                sample_data.insert(col_name.clone(), value);
            }
            data.insert(sample_id.clone(), sample_data);
        }

        Ok(Self {
            sample_ids,
            column_names,
            data,
            column_types,
        })
    }

    /// Sample IDs in file order.
    pub fn sample_ids(&self) -> &[String] {
        &self.sample_ids
    }

    /// Column names in file order.
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Number of samples.
    pub fn n_samples(&self) -> usize {
        self.sample_ids.len()
    }

    /// Number of metadata columns.
    pub fn n_columns(&self) -> usize {
        self.column_names.len()
    }

    /// Get the value for a sample and column.
    pub fn get(&self, sample_id: &str, column: &str) -> Option<&Value> {
        self.data.get(sample_id).and_then(|m| m.get(column))
    }

    /// Get all values for a column, in sample order.
    pub fn column(&self, column: &str) -> Result<Vec<&Value>> {
        if !self.has_column(column) {
            return Err(RrvError::MissingColumn(column.to_string()));
        }
        Ok(self
            .sample_ids
            .iter()
            .map(|sid| {
                self.data
                    .get(sid)
                    .and_then(|m| m.get(column))
                    .unwrap_or(&Value::Missing)
            })
            .collect())
    }

    /// Get the inferred type of a column.
    pub fn column_type(&self, column: &str) -> Option<ColumnType> {
        self.column_types.get(column).copied()
    }

    /// Check if a sample exists.
    pub fn has_sample(&self, sample_id: &str) -> bool {
        self.data.contains_key(sample_id)
    }

    /// Check if a column exists.
    pub fn has_column(&self, column: &str) -> bool {
        self.column_names.iter().any(|c| c == column)
    }
}
