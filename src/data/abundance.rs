//! Dense abundance table for microbiome/metabolomics feature data.

use crate::error::{Result, RrvError};
use nalgebra::DMatrix;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A dense abundance matrix storing per-sample feature abundances.
///
/// Rows represent samples, columns represent features. Cells are expected to
/// be non-negative counts or abundances; the loader parses whatever BIOM
/// exports produce (integers or floats) into `f64`.
#[derive(Debug, Clone)]
pub struct AbundanceTable {
    /// Dense matrix (samples × features).
    data: DMatrix<f64>,
    /// Sample identifiers (row names).
    sample_ids: Vec<String>,
    /// Feature identifiers (column names).
    feature_ids: Vec<String>,
}

impl AbundanceTable {
    /// Create a new AbundanceTable from a dense matrix and identifiers.
    pub fn new(
        data: DMatrix<f64>,
        sample_ids: Vec<String>,
        feature_ids: Vec<String>,
    ) -> Result<Self> {
        let (nrows, ncols) = data.shape();
        if nrows != sample_ids.len() {
            return Err(RrvError::DimensionMismatch {
                expected: nrows,
                actual: sample_ids.len(),
            });
        }
        if ncols != feature_ids.len() {
            return Err(RrvError::DimensionMismatch {
                expected: ncols,
                actual: feature_ids.len(),
            });
        }
        Ok(Self {
            data,
            sample_ids,
            feature_ids,
        })
    }

    /// Load an abundance table from a feature-table TSV file.
    ///
    /// Expected format (the orientation BIOM exports use):
    /// - First row: header with sample IDs (first column is the feature ID
    ///   header)
    /// - Subsequent rows: feature ID followed by abundances
    ///
    /// The table is transposed on load, so in memory rows are samples.
    pub fn from_tsv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut lines = reader.lines();

        // Parse header
        let header_line = lines
            .next()
            .ok_or_else(|| RrvError::EmptyData("Empty feature table".to_string()))??;
        let header: Vec<&str> = header_line.split('\t').collect();
        if header.len() < 2 {
            return Err(RrvError::EmptyData(
                "Feature table must have at least one sample".to_string(),
            ));
        }
        let sample_ids: Vec<String> = header[1..].iter().map(|s| s.to_string()).collect();
        let n_samples = sample_ids.len();

        let mut feature_ids: Vec<String> = Vec::new();
        let mut values: Vec<f64> = Vec::new();

        for (row_idx, line_result) in lines.enumerate() {
            let line = line_result?;
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() - 1 != n_samples {
                return Err(RrvError::DimensionMismatch {
                    expected: n_samples,
                    actual: fields.len() - 1,
                });
            }
            feature_ids.push(fields[0].to_string());

            for (col_idx, value_str) in fields[1..].iter().enumerate() {
                let value: f64 =
                    value_str
                        .trim()
                        .parse()
                        .map_err(|_| RrvError::InvalidAbundance {
                            value: value_str.to_string(),
                            row: row_idx,
                            col: col_idx,
                        })?;
                values.push(value);
            }
        }

        let n_features = feature_ids.len();
        if n_features == 0 {
            return Err(RrvError::EmptyData("No features in table".to_string()));
        }

        // File orientation is features × samples; flip to samples × features.
        let by_feature = DMatrix::from_row_slice(n_features, n_samples, &values);
        Self::new(by_feature.transpose(), sample_ids, feature_ids)
    }

    /// Get the abundance of a feature in a sample.
    #[inline]
    pub fn get(&self, sample: usize, feature: usize) -> f64 {
        self.data[(sample, feature)]
    }

    /// Number of samples (rows).
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.data.nrows()
    }

    /// Number of features (columns).
    #[inline]
    pub fn n_features(&self) -> usize {
        self.data.ncols()
    }

    /// Sample identifiers.
    #[inline]
    pub fn sample_ids(&self) -> &[String] {
        &self.sample_ids
    }

    /// Feature identifiers.
    #[inline]
    pub fn feature_ids(&self) -> &[String] {
        &self.feature_ids
    }

    /// All abundances for one sample, in feature order.
    pub fn sample_row(&self, sample: usize) -> Vec<f64> {
        self.data.row(sample).iter().copied().collect()
    }

    /// Subset the table to the specified features (by index), in the given
    /// order.
    pub fn subset_features(&self, indices: &[usize]) -> Result<Self> {
        for &idx in indices {
            if idx >= self.n_features() {
                return Err(RrvError::InvalidParameter(format!(
                    "Feature index {} out of bounds",
                    idx
                )));
            }
        }
        let data = DMatrix::from_fn(self.n_samples(), indices.len(), |r, c| {
            self.data[(r, indices[c])]
        });
        let feature_ids = indices
            .iter()
            .map(|&idx| self.feature_ids[idx].clone())
            .collect();
        Self::new(data, self.sample_ids.clone(), feature_ids)
    }

    /// Subset the table to the specified samples (by index), in the given
    /// order.
    pub fn subset_samples(&self, indices: &[usize]) -> Result<Self> {
        for &idx in indices {
            if idx >= self.n_samples() {
                return Err(RrvError::InvalidParameter(format!(
                    "Sample index {} out of bounds",
                    idx
                )));
            }
        }
        let data = DMatrix::from_fn(indices.len(), self.n_features(), |r, c| {
            self.data[(indices[r], c)]
        });
        let sample_ids = indices
            .iter()
            .map(|&idx| self.sample_ids[idx].clone())
            .collect();
        Self::new(data, sample_ids, self.feature_ids.clone())
    }

    /// Replace the feature identifiers wholesale (positionally).
    ///
    /// Used when taxonomy relabeling rewrites feature IDs; the label vector
    /// must cover every feature column.
    pub fn relabel_features(&self, labels: Vec<String>) -> Result<Self> {
        if labels.len() != self.n_features() {
            return Err(RrvError::DimensionMismatch {
                expected: self.n_features(),
                actual: labels.len(),
            });
        }
        Self::new(self.data.clone(), self.sample_ids.clone(), labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_table() -> AbundanceTable {
        // 2 samples × 3 features
        let data = DMatrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        AbundanceTable::new(
            data,
            vec!["S1".to_string(), "S2".to_string()],
            vec!["F1".to_string(), "F2".to_string(), "F3".to_string()],
        )
        .unwrap()
    }

    #[test]
    fn test_dimensions() {
        let table = create_test_table();
        assert_eq!(table.n_samples(), 2);
        assert_eq!(table.n_features(), 3);
    }

    #[test]
    fn test_dimension_check() {
        let data = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let result = AbundanceTable::new(
            data,
            vec!["S1".to_string()],
            vec!["F1".to_string(), "F2".to_string()],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_from_tsv_transposes() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "feature_id\tS1\tS2").unwrap();
        writeln!(file, "F1\t1\t4").unwrap();
        writeln!(file, "F2\t2\t5").unwrap();
        writeln!(file, "F3\t3.5\t6").unwrap();
        file.flush().unwrap();

        let table = AbundanceTable::from_tsv(file.path()).unwrap();
        assert_eq!(table.sample_ids(), &["S1", "S2"]);
        assert_eq!(table.feature_ids(), &["F1", "F2", "F3"]);
        // Row S2, column F1 held the file's (F1, S2) cell.
        assert_eq!(table.get(1, 0), 4.0);
        assert_eq!(table.get(0, 2), 3.5);
    }

    #[test]
    fn test_from_tsv_bad_cell() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "feature_id\tS1").unwrap();
        writeln!(file, "F1\tnot_a_number").unwrap();
        file.flush().unwrap();

        let result = AbundanceTable::from_tsv(file.path());
        assert!(matches!(
            result,
            Err(RrvError::InvalidAbundance { row: 0, col: 0, .. })
        ));
    }

    #[test]
    fn test_sample_row() {
        let table = create_test_table();
        assert_eq!(table.sample_row(0), vec![1.0, 2.0, 3.0]);
        assert_eq!(table.sample_row(1), vec![4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_subset_features_preserves_order() {
        let table = create_test_table();
        let subset = table.subset_features(&[2, 0]).unwrap();
        assert_eq!(subset.feature_ids(), &["F3", "F1"]);
        assert_eq!(subset.sample_row(0), vec![3.0, 1.0]);
    }

    #[test]
    fn test_subset_samples() {
        let table = create_test_table();
        let subset = table.subset_samples(&[1]).unwrap();
        assert_eq!(subset.sample_ids(), &["S2"]);
        assert_eq!(subset.sample_row(0), vec![4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_subset_out_of_bounds() {
        let table = create_test_table();
        assert!(table.subset_features(&[7]).is_err());
        assert!(table.subset_samples(&[7]).is_err());
    }

    #[test]
    fn test_relabel_features() {
        let table = create_test_table();
        let relabeled = table
            .relabel_features(vec!["a".to_string(), "b".to_string(), "c".to_string()])
            .unwrap();
        assert_eq!(relabeled.feature_ids(), &["a", "b", "c"]);
        assert_eq!(relabeled.get(0, 1), 2.0);

        assert!(table.relabel_features(vec!["a".to_string()]).is_err());
    }
}
