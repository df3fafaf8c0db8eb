//! Column-name compression for the sample plot.

use crate::error::{Result, RrvError};
use serde_json::Value;
use std::collections::HashMap;

/// A bidirectional mapping from column names to small-integer string tokens.
///
/// Feature labels can be long and number in the thousands; repeating each
/// one per sample record would dominate the serialized output. Records
/// therefore carry tokens ("0", "1", ...) assigned by column position, and
/// the reverse mapping is embedded in the document once so the front end
/// can rehydrate the names. Built once per sample-plot build, never
/// mutated afterwards.
#[derive(Debug, Clone)]
pub struct ColumnTokens {
    /// Column names in token order: `names[i]` owns token `i.to_string()`.
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl ColumnTokens {
    /// Assign tokens to the given column names by position.
    ///
    /// Duplicate names are rejected: the mapping must stay invertible.
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        for column in columns {
            let name = column.into();
            if positions.contains_key(&name) {
                return Err(RrvError::DuplicateColumn(name));
            }
            positions.insert(name.clone(), names.len());
            names.push(name);
        }
        Ok(Self { names, positions })
    }

    /// The token for a column name.
    pub fn token(&self, name: &str) -> Option<String> {
        self.positions.get(name).map(|idx| idx.to_string())
    }

    /// The column name behind a token.
    pub fn name(&self, token: &str) -> Option<&str> {
        let idx: usize = token.parse().ok()?;
        // Only canonical tokens resolve ("07" is not a token).
        if idx.to_string() != token {
            return None;
        }
        self.names.get(idx).map(|name| name.as_str())
    }

    /// Number of mapped columns.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no columns are mapped.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Column names in token order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The name-to-token mapping as a JSON object.
    pub fn to_json(&self) -> Value {
        let mut map = serde_json::Map::new();
        for (idx, name) in self.names.iter().enumerate() {
            map.insert(name.clone(), Value::String(idx.to_string()));
        }
        Value::Object(map)
    }
}
