#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for client-level operations.
///
/// Use this target for logging client construction and the start and end of
/// conversion and prediction calls.
pub const TRACING_TARGET_CLIENT: &str = "docpredict_client::client";

/// Tracing target for individual HTTP exchanges.
pub const TRACING_TARGET_TRANSPORT: &str = "docpredict_client::transport";

/// Tracing target for long-running operation polling.
pub const TRACING_TARGET_POLLER: &str = "docpredict_client::poller";

mod client;
pub mod error;
pub mod poller;
#[doc(hidden)]
pub mod prelude;
pub mod transport;

pub use crate::client::{
    ClientConfig, ClientConfigBuilder, ClientConfigBuilderError, DEFAULT_CONNECT_TIMEOUT,
    DEFAULT_TIMEOUT, PredictionClient,
};
pub use crate::error::{Error, Result};
pub use crate::poller::{LroPoller, OperationHandle, OperationStatus};
pub use crate::transport::{Transport, TransportProvider};
