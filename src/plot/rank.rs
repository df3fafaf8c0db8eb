//! Rank plot: one bar per feature, ordered by a rank coefficient.

use crate::data::ScoreTable;
use crate::error::Result;
use crate::plot::{RANK_DATA_NAME, VEGA_LITE_SCHEMA};
use serde::Serialize;
use serde_json::{json, Value};

/// Log-ratio classification of a feature in the rank plot.
///
/// Every feature starts out as `None`; the front end reclassifies features
/// as they are selected into the numerator or denominator of the current
/// log ratio. The builder never assigns the other three states itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Classification {
    None,
    Numerator,
    Denominator,
    Both,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::None => "None",
            Classification::Numerator => "Numerator",
            Classification::Denominator => "Denominator",
            Classification::Both => "Both",
        }
    }
}

/// Color scale domain for the four classification states.
pub const CLASSIFICATION_DOMAIN: [&str; 4] = ["None", "Numerator", "Denominator", "Both"];

/// Colors paired with [`CLASSIFICATION_DOMAIN`]: light gray, red, blue, purple.
pub const CLASSIFICATION_COLORS: [&str; 4] = ["#e0e0e0", "#f00", "#00f", "#949"];

/// One record in the rank plot's dataset.
#[derive(Debug, Clone, Serialize)]
pub struct RankPoint {
    /// 0-based position after sorting by the rank coefficient.
    pub x: usize,
    /// The feature's rank coefficient.
    pub coefs: f64,
    pub classification: Classification,
    /// Feature label (the ID, or the taxonomy label after relabeling).
    pub index: String,
}

/// Sort features ascending by the chosen rank coefficient and lay them out
/// at contiguous 0-based x positions.
///
/// Ties keep the feature order of the input table, so identical inputs
/// always produce identical output.
pub fn rank_points(ranks: &ScoreTable, rank_col: usize) -> Result<Vec<RankPoint>> {
    let coefs = ranks.column(rank_col)?;

    let mut order: Vec<usize> = (0..coefs.len()).collect();
    order.sort_by(|&a, &b| coefs[a].total_cmp(&coefs[b]));

    Ok(order
        .into_iter()
        .enumerate()
        .map(|(x, idx)| RankPoint {
            x,
            coefs: coefs[idx],
            classification: Classification::None,
            index: ranks.ids()[idx].clone(),
        })
        .collect())
}

/// Build the rank plot document.
///
/// The records live under the `rank_data` dataset entry. Bars are one unit
/// wide so the front end's interval selection lines up with them, and the
/// axis grid is faded so unselected (light gray) bars stay visible over it.
pub fn rank_plot(ranks: &ScoreTable, rank_col: usize) -> Result<Value> {
    let points = rank_points(ranks, rank_col)?;

    let mut datasets = serde_json::Map::new();
    datasets.insert(RANK_DATA_NAME.to_string(), serde_json::to_value(&points)?);

    let mut spec = json!({
        "$schema": VEGA_LITE_SCHEMA,
        "config": {
            "axis": {"gridOpacity": 0.35},
            "view": {"width": 400, "height": 300}
        },
        "data": {"name": RANK_DATA_NAME},
        "encoding": {
            "color": {
                "field": "classification",
                "scale": {
                    "domain": CLASSIFICATION_DOMAIN,
                    "range": CLASSIFICATION_COLORS
                },
                "type": "nominal"
            },
            "size": {"value": 1.0},
            "tooltip": [
                {"field": "x", "type": "quantitative"},
                {"field": "coefs", "type": "quantitative"},
                {"field": "classification", "type": "nominal"},
                {"field": "index", "type": "nominal"}
            ],
            "x": {"field": "x", "title": "Features", "type": "quantitative"},
            "y": {"field": "coefs", "title": "Ranks", "type": "quantitative"}
        },
        "mark": "bar",
        "selection": {
            "grid": {"bind": "scales", "encodings": ["x", "y"], "type": "interval"}
        },
        "title": "Ranks"
    });
    spec["datasets"] = Value::Object(datasets);
    Ok(spec)
}
