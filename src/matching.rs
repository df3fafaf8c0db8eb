//! Matching of abundance data against ordination scores and taxonomy.
//!
//! Rank plots and sample plots are only meaningful for the features and
//! samples shared between the abundance table and the ordination results.
//! The functions here reduce both sides to their shared IDs, keeping the
//! two tables aligned position by position so later relabeling stays
//! consistent.

use crate::data::{AbundanceTable, OrdinationResults, ScoreTable, TaxonomyTable};
use crate::error::Result;
use std::collections::HashMap;

/// Reduce the table and the feature score table to their shared features.
///
/// The surviving features keep the score table's order, and both outputs
/// list them identically.
pub fn match_features(
    table: &AbundanceTable,
    ranks: &ScoreTable,
) -> Result<(AbundanceTable, ScoreTable)> {
    let table_positions: HashMap<&str, usize> = table
        .feature_ids()
        .iter()
        .enumerate()
        .map(|(idx, id)| (id.as_str(), idx))
        .collect();

    let mut table_indices = Vec::new();
    let mut rank_indices = Vec::new();
    for (idx, id) in ranks.ids().iter().enumerate() {
        if let Some(&table_idx) = table_positions.get(id.as_str()) {
            table_indices.push(table_idx);
            rank_indices.push(idx);
        }
    }

    Ok((
        table.subset_features(&table_indices)?,
        ranks.subset(&rank_indices)?,
    ))
}

/// Reduce the table and the sample score table to their shared samples.
///
/// The surviving samples keep the score table's order, and both outputs
/// list them identically.
pub fn match_samples(
    table: &AbundanceTable,
    samples: &ScoreTable,
) -> Result<(AbundanceTable, ScoreTable)> {
    let table_positions: HashMap<&str, usize> = table
        .sample_ids()
        .iter()
        .enumerate()
        .map(|(idx, id)| (id.as_str(), idx))
        .collect();

    let mut table_indices = Vec::new();
    let mut score_indices = Vec::new();
    for (idx, id) in samples.ids().iter().enumerate() {
        if let Some(&table_idx) = table_positions.get(id.as_str()) {
            table_indices.push(table_idx);
            score_indices.push(idx);
        }
    }

    Ok((
        table.subset_samples(&table_indices)?,
        samples.subset(&score_indices)?,
    ))
}

/// Match the abundance table against the ordination results and apply
/// taxonomy labels, producing the aligned feature ranks and table the
/// plot generators consume.
///
/// Features are intersected with the ordination's feature loadings and
/// samples with its sample loadings. When taxonomy annotations are given,
/// features without an annotation are dropped and the rest are relabeled
/// in lockstep on both the rank table and the abundance table.
pub fn process_input(
    ordination: &OrdinationResults,
    table: &AbundanceTable,
    taxonomy: Option<&TaxonomyTable>,
) -> Result<(ScoreTable, AbundanceTable)> {
    let (table, ranks) = match_features(table, ordination.features())?;
    let (mut table, _sample_scores) = match_samples(&table, ordination.samples())?;

    let mut ranks = ranks;
    if let Some(taxonomy) = taxonomy {
        let annotated: Vec<usize> = ranks
            .ids()
            .iter()
            .enumerate()
            .filter(|(_, id)| taxonomy.has_feature(id))
            .map(|(idx, _)| idx)
            .collect();
        if annotated.len() < ranks.n_ids() {
            ranks = ranks.subset(&annotated)?;
            table = table.subset_features(&annotated)?;
        }

        let labels: Vec<String> = ranks
            .ids()
            .iter()
            .map(|id| {
                taxonomy
                    .label(id)
                    .unwrap_or_else(|| id.clone())
            })
            .collect();
        table = table.relabel_features(labels.clone())?;
        ranks = ranks.with_ids(labels)?;
    }

    Ok((ranks, table))
}
