//! rankratioviz - interactive differential abundance visualization
//!
//! Command-line interface for turning ordination feature ranks and an
//! abundance table into a browsable rank plot / sample plot pair.

use clap::Parser;
use rankratioviz::data::{AbundanceTable, OrdinationResults, SampleMetadata, TaxonomyTable};
use rankratioviz::error::Result;
use rankratioviz::matching::process_input;
use rankratioviz::viz::{generate_visualization, VizConfig};
use std::path::PathBuf;

/// Generate an interactive visualization of feature ranks and sample
/// log ratios
#[derive(Parser)]
#[command(name = "rankratioviz")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the ordination results file (feature and sample loadings)
    #[arg(short = 'r', long)]
    ordination: PathBuf,

    /// Path to the abundance table TSV (features x samples)
    #[arg(short = 't', long)]
    table: PathBuf,

    /// Path to the sample metadata TSV
    #[arg(short = 'm', long)]
    sample_metadata: PathBuf,

    /// Path to a feature metadata TSV with taxonomy annotations
    #[arg(short = 'f', long)]
    feature_metadata: Option<PathBuf>,

    /// Sample metadata column used to position and color samples
    #[arg(short = 'c', long)]
    category: String,

    /// Directory the visualization is written to
    #[arg(short = 'o', long)]
    output_dir: PathBuf,

    /// Directory holding the static front-end assets
    /// (default: support_files next to the executable)
    #[arg(long)]
    support_dir: Option<PathBuf>,

    /// Vega color scheme for the sample plot (e.g. "tableau10")
    #[arg(long)]
    color_scheme: Option<String>,

    /// Ordination axis used to order the rank plot (default: 0)
    #[arg(long, default_value = "0")]
    rank_column: usize,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    eprintln!("Loading ordination results from {:?}...", cli.ordination);
    let ordination = OrdinationResults::from_file(&cli.ordination)?;

    eprintln!("Loading abundance table from {:?}...", cli.table);
    let table = AbundanceTable::from_tsv(&cli.table)?;

    eprintln!("Loading sample metadata from {:?}...", cli.sample_metadata);
    let metadata = SampleMetadata::from_tsv(&cli.sample_metadata)?;

    let taxonomy = match &cli.feature_metadata {
        Some(path) => {
            eprintln!("Loading feature metadata from {:?}...", path);
            Some(TaxonomyTable::from_tsv(path)?)
        }
        None => None,
    };

    eprintln!(
        "Loaded {} ranked features and a {} sample x {} feature table",
        ordination.features().n_ids(),
        table.n_samples(),
        table.n_features()
    );

    let (ranks, matched) = process_input(&ordination, &table, taxonomy.as_ref())?;
    eprintln!(
        "Matched {} features across {} samples",
        ranks.n_ids(),
        matched.n_samples()
    );

    let mut config = VizConfig::new(&cli.category).rank_col(cli.rank_column);
    if let Some(scheme) = &cli.color_scheme {
        config = config.color_scheme(scheme);
    }
    if let Some(dir) = &cli.support_dir {
        config = config.support_dir(dir);
    }

    let index_path =
        generate_visualization(&ranks, &matched, &metadata, &config, &cli.output_dir)?;
    eprintln!("Visualization written to {:?}", index_path);

    Ok(())
}
