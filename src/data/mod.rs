//! Data structures for visualization inputs.

mod abundance;
mod metadata;
mod ordination;
mod taxonomy;

pub use abundance::AbundanceTable;
pub use metadata::{ColumnType, SampleMetadata, Value};
pub use ordination::{OrdinationResults, ScoreTable};
pub use taxonomy::TaxonomyTable;
