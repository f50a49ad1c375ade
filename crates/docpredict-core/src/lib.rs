#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod decode;
#[doc(hidden)]
pub mod prelude;
pub mod types;

pub use crate::decode::{RawClassifier, RawPrediction, decode_entities, map_prediction};
pub use crate::types::{
    ExtractionInstance, PredictionOptions, PredictionResult, PublishSlot, Walk,
};
