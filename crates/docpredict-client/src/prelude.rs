//! Prelude for the docpredict-client crate
//!
//! This module re-exports the most commonly used types and traits from the crate
//! to provide a convenient single import for users.

pub use docpredict_core::prelude::*;

pub use crate::client::{ClientConfig, PredictionClient};
pub use crate::error::{Error, Result};
pub use crate::transport::TransportProvider;
