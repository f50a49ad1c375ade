//! Public result and option types.
//!
//! Every type in this module is immutable once constructed and is
//! (de)serializable with camelCase field names.

mod extraction;
mod options;
mod prediction;

pub use extraction::{ExtractionInstance, Walk};
pub use options::{PredictionOptions, PublishSlot};
pub use prediction::PredictionResult;
