//! rankratioviz - interactive visualization of feature ranks and log ratios
//!
//! This library turns differential abundance output (per-feature rank
//! coefficients from an ordination, a feature abundance table, optional
//! taxonomy annotations, and sample metadata) into two linked Vega-Lite
//! documents plus a static front end: a rank plot ordering features by a
//! rank coefficient, and a sample scatterplot whose log-ratio values the
//! front end fills in from interactive feature selections.
//!
//! # Overview
//!
//! - **data**: input tables (OrdinationResults, AbundanceTable,
//!   SampleMetadata, TaxonomyTable)
//! - **matching**: ID intersection across the inputs and taxonomy relabeling
//! - **plot**: Vega-Lite document builders for the two plots
//! - **viz**: output assembly (plot JSON files plus static assets)
//!
//! # Example
//!
//! ```no_run
//! use rankratioviz::prelude::*;
//! use std::path::Path;
//!
//! let ordination = OrdinationResults::from_file("ordination.txt").unwrap();
//! let table = AbundanceTable::from_tsv("table.tsv").unwrap();
//! let metadata = SampleMetadata::from_tsv("metadata.tsv").unwrap();
//!
//! let (ranks, matched) = process_input(&ordination, &table, None).unwrap();
//! let config = VizConfig::new("BodySite").support_dir("support_files");
//! let index = generate_visualization(
//!     &ranks,
//!     &matched,
//!     &metadata,
//!     &config,
//!     Path::new("viz_output"),
//! )
//! .unwrap();
//! println!("open {}", index.display());
//! ```

pub mod data;
pub mod error;
pub mod matching;
pub mod plot;
pub mod viz;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::data::{
        AbundanceTable, ColumnType, OrdinationResults, SampleMetadata, ScoreTable,
        TaxonomyTable, Value,
    };
    pub use crate::error::{Result, RrvError};
    pub use crate::matching::{match_features, match_samples, process_input};
    pub use crate::plot::{
        rank_plot, rank_points, sample_plot, Classification, ColumnTokens, RankPoint,
    };
    pub use crate::viz::{generate_visualization, VizConfig};
}
