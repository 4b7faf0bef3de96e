use std::time::Duration;

use thiserror::Error;

/// Convenient result alias for the waymatrix library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// Every variant is fatal for the request that produced it. Per-record
/// problems are reported as [`ValidationError`] and never surface here.
#[derive(Debug, Error)]
pub enum Error {
    /// The locality source could not be reached or answered with a non-success status.
    #[error("failed to fetch locality data from {source_name}: {message}")]
    Fetch {
        source_name: String,
        message: String,
    },

    /// The locality source did not answer within the configured timeout.
    #[error("locality source {source_name} timed out after {}s", .timeout.as_secs_f64())]
    FetchTimeout {
        source_name: String,
        timeout: Duration,
    },

    /// The locality payload could not be read as a list of records.
    #[error("locality data from {source_name} is not a list of records: {message}")]
    InvalidPayload {
        source_name: String,
        message: String,
    },

    /// No locality URL or local source file has been configured.
    #[error(
        "no locality source configured; set WAYMATRIX_LOCALITY_URL or WAYMATRIX_LOCALITY_SOURCE"
    )]
    SourceNotConfigured,

    /// An edge names a city that the node set does not contain.
    #[error("edge references city '{city}' which is absent from the node set")]
    UnknownCity { city: String },

    /// Wrapper for HTTP client construction errors.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Reason a single locality record was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// The record does not have the `{city1, city2, min, km?}` shape.
    #[error("malformed locality record: {message}")]
    Malformed { message: String },

    /// A weight is below zero.
    #[error("field '{field}' cannot be negative (got {value})")]
    NegativeWeight { field: &'static str, value: f64 },

    /// A weight is NaN or infinite.
    #[error("field '{field}' must be a finite number")]
    NonFiniteWeight { field: &'static str },
}
