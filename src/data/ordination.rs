//! Ordination results: per-feature and per-sample loading scores.

use crate::error::{Result, RrvError};
use nalgebra::DMatrix;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// A dense table of per-ID scores on the ordination axes.
///
/// Rows are identified by unique IDs (feature or sample IDs); columns are
/// ordination axes. When the table holds feature loadings, each column is a
/// set of rank coefficients — the values the rank plot sorts on.
#[derive(Debug, Clone)]
pub struct ScoreTable {
    /// Row identifiers.
    ids: Vec<String>,
    /// Scores (IDs × axes).
    scores: DMatrix<f64>,
}

impl ScoreTable {
    /// Create a new ScoreTable from identifiers and a score matrix.
    pub fn new(ids: Vec<String>, scores: DMatrix<f64>) -> Result<Self> {
        if scores.nrows() != ids.len() {
            return Err(RrvError::DimensionMismatch {
                expected: scores.nrows(),
                actual: ids.len(),
            });
        }
        Ok(Self { ids, scores })
    }

    /// Row identifiers.
    #[inline]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Number of rows (IDs).
    #[inline]
    pub fn n_ids(&self) -> usize {
        self.ids.len()
    }

    /// Number of ordination axes (score columns).
    #[inline]
    pub fn n_axes(&self) -> usize {
        self.scores.ncols()
    }

    /// Get the score of a row on an axis.
    #[inline]
    pub fn get(&self, row: usize, axis: usize) -> f64 {
        self.scores[(row, axis)]
    }

    /// All scores for one axis, in row order.
    pub fn column(&self, axis: usize) -> Result<Vec<f64>> {
        if axis >= self.n_axes() {
            return Err(RrvError::InvalidParameter(format!(
                "Rank column {} out of bounds ({} axes)",
                axis,
                self.n_axes()
            )));
        }
        Ok((0..self.n_ids()).map(|r| self.scores[(r, axis)]).collect())
    }

    /// Subset the table to the specified rows (by index), in the given order.
    pub fn subset(&self, indices: &[usize]) -> Result<Self> {
        for &idx in indices {
            if idx >= self.n_ids() {
                return Err(RrvError::InvalidParameter(format!(
                    "Row index {} out of bounds",
                    idx
                )));
            }
        }
        let scores = DMatrix::from_fn(indices.len(), self.n_axes(), |r, c| {
            self.scores[(indices[r], c)]
        });
        let ids = indices.iter().map(|&idx| self.ids[idx].clone()).collect();
        Self::new(ids, scores)
    }

    /// Replace the row identifiers wholesale (positionally).
    ///
    /// Taxonomy relabeling may map distinct features to the same bare taxon,
    /// so no uniqueness check is applied here.
    pub fn with_ids(&self, ids: Vec<String>) -> Result<Self> {
        if ids.len() != self.n_ids() {
            return Err(RrvError::DimensionMismatch {
                expected: self.n_ids(),
                actual: ids.len(),
            });
        }
        Self::new(ids, self.scores.clone())
    }
}

/// A parsed ordination result: eigenvalues, proportion explained, and the
/// feature ("Species") and sample ("Site") loading tables.
///
/// Reads the scikit-bio ordination text serialization: tab-separated
/// sections headed by `<name>\t<rows>[\t<cols>]`, separated by blank lines,
/// in the fixed order `Eigvals`, `Proportion explained`, `Species`, `Site`,
/// then optional trailing sections (`Biplot`, `Site constraints`) whose
/// contents are skipped.
#[derive(Debug, Clone)]
pub struct OrdinationResults {
    eigvals: Vec<f64>,
    proportion_explained: Vec<f64>,
    features: ScoreTable,
    samples: ScoreTable,
}

impl OrdinationResults {
    /// Load ordination results from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Load ordination results from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut lines = BufReader::new(reader).lines();
        let mut next_nonblank = move || -> Result<Option<String>> {
            for line in lines.by_ref() {
                let line = line?;
                if !line.trim().is_empty() {
                    return Ok(Some(line.trim_end().to_string()));
                }
            }
            Ok(None)
        };

        let eigvals = parse_vector_section(&mut next_nonblank, "Eigvals")?;
        let proportion_explained =
            parse_vector_section(&mut next_nonblank, "Proportion explained")?;
        let features = parse_score_section(&mut next_nonblank, "Species")?;
        let samples = parse_score_section(&mut next_nonblank, "Site")?;

        // Trailing sections (Biplot, Site constraints) are not used here.
        Ok(Self {
            eigvals,
            proportion_explained,
            features,
            samples,
        })
    }

    /// Ordination eigenvalues.
    pub fn eigvals(&self) -> &[f64] {
        &self.eigvals
    }

    /// Proportion of variance explained per axis (may be empty).
    pub fn proportion_explained(&self) -> &[f64] {
        &self.proportion_explained
    }

    /// Per-feature loading scores (the feature rank table).
    pub fn features(&self) -> &ScoreTable {
        &self.features
    }

    /// Per-sample loading scores.
    pub fn samples(&self) -> &ScoreTable {
        &self.samples
    }
}

fn section_header(
    next: &mut impl FnMut() -> Result<Option<String>>,
    name: &str,
) -> Result<Vec<usize>> {
    let line = next()?.ok_or_else(|| {
        RrvError::OrdinationFormat(format!("missing '{}' section", name))
    })?;
    let fields: Vec<&str> = line.split('\t').collect();
    if fields[0] != name {
        return Err(RrvError::OrdinationFormat(format!(
            "expected '{}' section, found '{}'",
            name, fields[0]
        )));
    }
    fields[1..]
        .iter()
        .map(|f| {
            f.trim().parse::<usize>().map_err(|_| {
                RrvError::OrdinationFormat(format!(
                    "bad count '{}' in '{}' header",
                    f, name
                ))
            })
        })
        .collect()
}

fn parse_floats(raw: &str, expected: usize, section: &str) -> Result<Vec<f64>> {
    let values: Vec<&str> = raw.split('\t').collect();
    if values.len() != expected {
        return Err(RrvError::OrdinationFormat(format!(
            "'{}' row has {} values, expected {}",
            section,
            values.len(),
            expected
        )));
    }
    values
        .iter()
        .map(|v| {
            v.trim().parse::<f64>().map_err(|_| {
                RrvError::OrdinationFormat(format!(
                    "non-numeric value '{}' in '{}' section",
                    v, section
                ))
            })
        })
        .collect()
}

fn parse_vector_section(
    next: &mut impl FnMut() -> Result<Option<String>>,
    name: &str,
) -> Result<Vec<f64>> {
    let counts = section_header(next, name)?;
    let n = *counts.first().ok_or_else(|| {
        RrvError::OrdinationFormat(format!("'{}' header lacks a count", name))
    })?;
    if n == 0 {
        return Ok(Vec::new());
    }
    let line = next()?.ok_or_else(|| {
        RrvError::OrdinationFormat(format!("'{}' section ended early", name))
    })?;
    parse_floats(&line, n, name)
}

fn parse_score_section(
    next: &mut impl FnMut() -> Result<Option<String>>,
    name: &str,
) -> Result<ScoreTable> {
    let counts = section_header(next, name)?;
    if counts.len() != 2 {
        return Err(RrvError::OrdinationFormat(format!(
            "'{}' header must declare rows and columns",
            name
        )));
    }
    let (n_rows, n_cols) = (counts[0], counts[1]);

    let mut ids: Vec<String> = Vec::with_capacity(n_rows);
    let mut seen: HashSet<String> = HashSet::new();
    let mut values: Vec<f64> = Vec::with_capacity(n_rows * n_cols);

    for _ in 0..n_rows {
        let line = next()?.ok_or_else(|| {
            RrvError::OrdinationFormat(format!("'{}' section ended early", name))
        })?;
        let (id, rest) = line.split_once('\t').ok_or_else(|| {
            RrvError::OrdinationFormat(format!("'{}' row lacks score values", name))
        })?;
        if !seen.insert(id.to_string()) {
            return Err(RrvError::DuplicateId(id.to_string()));
        }
        ids.push(id.to_string());
        values.extend(parse_floats(rest, n_cols, name)?);
    }

    let scores = DMatrix::from_row_slice(n_rows, n_cols, &values);
    ScoreTable::new(ids, scores)
}
