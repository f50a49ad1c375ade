//! Pure decoders from raw service payloads to the public result types.

mod entity_tree;
mod result_mapper;

pub use entity_tree::{VERBOSE_KEY, decode_entities};
pub use result_mapper::{RawClassifier, RawPrediction, map_prediction};
