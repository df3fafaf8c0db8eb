//! Visualization assembly: plot documents plus the static front end.

use crate::data::{AbundanceTable, SampleMetadata, ScoreTable};
use crate::error::{Result, RrvError};
use crate::plot::{rank_plot, sample_plot};
use std::fs;
use std::path::{Path, PathBuf};

/// Options controlling a visualization build.
#[derive(Debug, Clone)]
pub struct VizConfig {
    /// Metadata column that positions and colors samples in the sample plot.
    pub category: String,
    /// Ordination axis whose coefficients order the rank plot.
    pub rank_col: usize,
    /// Vega color scheme name for the sample plot's categorical color scale.
    /// `None` leaves the front end's default scheme in place.
    pub color_scheme: Option<String>,
    /// Directory holding the static front-end assets to stage alongside the
    /// plot documents.
    pub support_dir: PathBuf,
}

impl VizConfig {
    /// Configuration with defaults: rank column 0, no color scheme, and
    /// support files looked up next to the running executable.
    pub fn new(category: &str) -> Self {
        Self {
            category: category.to_string(),
            rank_col: 0,
            color_scheme: None,
            support_dir: default_support_dir(),
        }
    }

    /// Set the rank column index.
    pub fn rank_col(mut self, rank_col: usize) -> Self {
        self.rank_col = rank_col;
        self
    }

    /// Set the Vega color scheme for the sample plot.
    pub fn color_scheme(mut self, scheme: &str) -> Self {
        self.color_scheme = Some(scheme.to_string());
        self
    }

    /// Set the static-asset directory.
    pub fn support_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.support_dir = dir.into();
        self
    }
}

/// The `support_files` directory shipped next to the executable.
pub fn default_support_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("support_files")))
        .unwrap_or_else(|| PathBuf::from("support_files"))
}

/// Build the two plot documents and stage the static assets.
///
/// Writes `rank_plot.json` and `sample_logratio_plot.json` into
/// `output_dir` (created if needed), copies every support-file entry into
/// it, and returns the path of the copied entry point (the top-level entry
/// whose name contains `index.html`).
///
/// An absent support directory or a missing entry point is an incomplete
/// installation, surfaced as [`RrvError::MissingAsset`] rather than treated
/// as bad user input.
pub fn generate_visualization(
    ranks: &ScoreTable,
    table: &AbundanceTable,
    metadata: &SampleMetadata,
    config: &VizConfig,
    output_dir: &Path,
) -> Result<PathBuf> {
    let rank_spec = rank_plot(ranks, config.rank_col)?;
    let sample_spec = sample_plot(
        table,
        metadata,
        &config.category,
        config.color_scheme.as_deref(),
    )?;

    fs::create_dir_all(output_dir)?;

    if !config.support_dir.is_dir() {
        return Err(RrvError::MissingAsset(format!(
            "support files directory {} not found",
            config.support_dir.display()
        )));
    }

    let mut index_path: Option<PathBuf> = None;
    for entry in fs::read_dir(&config.support_dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if name.to_string_lossy() == ".DS_Store" {
            continue;
        }
        let dest = output_dir.join(&name);
        if entry.path().is_dir() {
            copy_dir_recursive(&entry.path(), &dest)?;
        } else {
            fs::copy(entry.path(), &dest)?;
        }
        if name.to_string_lossy().contains("index.html") {
            index_path = Some(dest);
        }
    }
    let index_path = index_path.ok_or_else(|| {
        RrvError::MissingAsset(format!(
            "no index.html found in {}",
            config.support_dir.display()
        ))
    })?;

    fs::write(
        output_dir.join("rank_plot.json"),
        serde_json::to_string_pretty(&rank_spec)?,
    )?;
    fs::write(
        output_dir.join("sample_logratio_plot.json"),
        serde_json::to_string_pretty(&sample_spec)?,
    )?;

    Ok(index_path)
}

fn copy_dir_recursive(src: &Path, dest: &Path) -> Result<()> {
    fs::create_dir_all(dest)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        if entry.file_name().to_string_lossy() == ".DS_Store" {
            continue;
        }
        let target = dest.join(entry.file_name());
        if entry.path().is_dir() {
            copy_dir_recursive(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DMatrix;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn create_test_ranks() -> ScoreTable {
        let scores = DMatrix::from_row_slice(2, 1, &[0.5, -0.5]);
        ScoreTable::new(vec!["F1".to_string(), "F2".to_string()], scores).unwrap()
    }

    fn create_test_table() -> AbundanceTable {
        let data = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        AbundanceTable::new(
            data,
            vec!["S1".to_string(), "S2".to_string()],
            vec!["F1".to_string(), "F2".to_string()],
        )
        .unwrap()
    }

    fn create_test_metadata() -> SampleMetadata {
        SampleMetadata::from_reader("ID\tBodySite\nS1\tgut\nS2\ttongue".as_bytes())
            .unwrap()
    }

    fn create_support_dir(root: &Path) -> PathBuf {
        let support = root.join("support_files");
        fs::create_dir_all(support.join("vendor")).unwrap();
        let mut index = File::create(support.join("index.html")).unwrap();
        writeln!(index, "<html></html>").unwrap();
        let mut js = File::create(support.join("vendor").join("chart.js")).unwrap();
        writeln!(js, "// chart library").unwrap();
        File::create(support.join(".DS_Store")).unwrap();
        support
    }

    #[test]
    fn test_generate_visualization() {
        let dir = tempdir().unwrap();
        let support = create_support_dir(dir.path());
        let output = dir.path().join("viz");

        let config = VizConfig::new("BodySite").support_dir(&support);
        let index_path = generate_visualization(
            &create_test_ranks(),
            &create_test_table(),
            &create_test_metadata(),
            &config,
            &output,
        )
        .unwrap();

        assert_eq!(index_path, output.join("index.html"));
        assert!(index_path.is_file());
        assert!(output.join("vendor").join("chart.js").is_file());
        assert!(!output.join(".DS_Store").exists());

        let rank_spec: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(output.join("rank_plot.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(rank_spec["title"], "Ranks");
        assert_eq!(
            rank_spec["datasets"]["rank_data"].as_array().unwrap().len(),
            2
        );

        let sample_spec: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(output.join("sample_logratio_plot.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(sample_spec["title"], "Log Ratio of Abundances in Samples");
        assert_eq!(
            sample_spec["datasets"]["rankratioviz_col_names"]["BodySite"],
            "2"
        );
    }

    #[test]
    fn test_missing_index_html_is_fatal() {
        let dir = tempdir().unwrap();
        let support = dir.path().join("support_files");
        fs::create_dir_all(&support).unwrap();
        File::create(support.join("main.js")).unwrap();

        let config = VizConfig::new("BodySite").support_dir(&support);
        let result = generate_visualization(
            &create_test_ranks(),
            &create_test_table(),
            &create_test_metadata(),
            &config,
            &dir.path().join("viz"),
        );
        assert!(matches!(result, Err(RrvError::MissingAsset(_))));
    }

    #[test]
    fn test_missing_support_dir_is_fatal() {
        let dir = tempdir().unwrap();
        let config =
            VizConfig::new("BodySite").support_dir(dir.path().join("nonexistent"));
        let result = generate_visualization(
            &create_test_ranks(),
            &create_test_table(),
            &create_test_metadata(),
            &config,
            &dir.path().join("viz"),
        );
        assert!(matches!(result, Err(RrvError::MissingAsset(_))));
    }

    #[test]
    fn test_output_dir_created() {
        let dir = tempdir().unwrap();
        let support = create_support_dir(dir.path());
        let output = dir.path().join("deeply").join("nested").join("viz");

        let config = VizConfig::new("BodySite").support_dir(&support);
        generate_visualization(
            &create_test_ranks(),
            &create_test_table(),
            &create_test_metadata(),
            &config,
            &output,
        )
        .unwrap();
        assert!(output.join("rank_plot.json").is_file());
    }

    #[test]
    fn test_config_builder() {
        let config = VizConfig::new("BodySite")
            .rank_col(2)
            .color_scheme("tableau10")
            .support_dir("/tmp/support");
        assert_eq!(config.category, "BodySite");
        assert_eq!(config.rank_col, 2);
        assert_eq!(config.color_scheme.as_deref(), Some("tableau10"));
        assert_eq!(config.support_dir, PathBuf::from("/tmp/support"));
    }
}
