//! Prelude for the docpredict-core crate.
//!
//! Re-exports the types most callers need in a single import.

pub use crate::decode::{RawPrediction, decode_entities, map_prediction};
pub use crate::types::{ExtractionInstance, PredictionOptions, PredictionResult, PublishSlot};
