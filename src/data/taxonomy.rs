//! Feature metadata: taxonomic annotations used to relabel features.

use crate::error::{Result, RrvError};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Taxonomic annotations for features.
///
/// Loaded from a TSV file whose first column holds feature IDs. A `Taxon`
/// column is required; a `Confidence` column is optional. When confidence
/// values are present, feature labels combine all three pieces:
/// `<taxon>|(<conf>)|<feature-id>`, with whitespace stripped from the taxon
/// and confidence portions and the confidence truncated to four characters.
/// Without confidence values the label is the bare taxon string.
#[derive(Debug, Clone)]
pub struct TaxonomyTable {
    /// Feature IDs in file order.
    feature_ids: Vec<String>,
    /// Feature ID -> taxon string.
    taxa: HashMap<String, String>,
    /// Feature ID -> confidence string, if the file had a Confidence column.
    confidences: Option<HashMap<String, String>>,
}

impl TaxonomyTable {
    /// Load taxonomy annotations from a TSV file.
    pub fn from_tsv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Load taxonomy annotations from any reader of TSV data.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let taxon_idx = headers
            .iter()
            .position(|h| h == "Taxon")
            .ok_or_else(|| RrvError::MissingColumn("Taxon".to_string()))?;
        let confidence_idx = headers.iter().position(|h| h == "Confidence");

        let mut feature_ids: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut taxa: HashMap<String, String> = HashMap::new();
        let mut confidences: HashMap<String, String> = HashMap::new();

        for record in csv_reader.records() {
            let record = record?;
            let id = record.get(0).unwrap_or("").to_string();
            if !seen.insert(id.clone()) {
                return Err(RrvError::DuplicateId(id));
            }
            taxa.insert(
                id.clone(),
                record.get(taxon_idx).unwrap_or("").to_string(),
            );
            if let Some(idx) = confidence_idx {
                confidences
                    .insert(id.clone(), record.get(idx).unwrap_or("").to_string());
            }
            feature_ids.push(id);
        }

        Ok(Self {
            feature_ids,
            taxa,
            confidences: confidence_idx.map(|_| confidences),
        })
    }

    /// Feature IDs annotated by this table, in file order.
    pub fn feature_ids(&self) -> &[String] {
        &self.feature_ids
    }

    /// Number of annotated features.
    pub fn n_features(&self) -> usize {
        self.feature_ids.len()
    }

    /// Whether the given feature has an annotation.
    pub fn has_feature(&self, feature_id: &str) -> bool {
        self.taxa.contains_key(feature_id)
    }

    /// Whether the source file carried a Confidence column.
    pub fn has_confidence(&self) -> bool {
        self.confidences.is_some()
    }

    /// The display label for a feature, or None if it is not annotated.
    pub fn label(&self, feature_id: &str) -> Option<String> {
        let taxon = self.taxa.get(feature_id)?;
        match &self.confidences {
            Some(confidences) => {
                let confidence = confidences.get(feature_id)?;
                Some(composite_label(taxon, confidence, feature_id))
            }
            None => Some(taxon.clone()),
        }
    }
}

/// Combine taxon, confidence, and feature ID into one display label.
fn composite_label(taxon: &str, confidence: &str, feature_id: &str) -> String {
    let trimmed_conf: String = confidence.chars().take(4).collect();
    let base = format!("{}|({})", taxon, trimmed_conf).replace(' ', "");
    format!("{}|{}", base, feature_id)
}
