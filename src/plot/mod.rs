//! Vega-Lite document builders for the two linked plots.
//!
//! Both builders emit self-contained Vega-Lite v3 documents with their
//! records under named entries in the top-level `datasets` section, so the
//! front end can locate and patch them without re-parsing the whole spec.

mod rank;
mod sample;
mod tokens;

pub use rank::{rank_plot, rank_points, Classification, RankPoint};
pub use sample::sample_plot;
pub use tokens::ColumnTokens;

/// Schema URL stamped on every emitted document.
pub const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v3.json";

/// Name of the rank plot's record dataset.
pub const RANK_DATA_NAME: &str = "rank_data";

/// Name of the sample plot's record dataset.
pub const SAMPLE_DATA_NAME: &str = "sample_data";

/// Column holding the client-computed log ratio for each sample.
pub const BALANCE_COLUMN: &str = "rankratioviz_balance";

/// Dataset entry holding the column-name-to-token lookup.
pub const COL_NAMES_DATASET: &str = "rankratioviz_col_names";
