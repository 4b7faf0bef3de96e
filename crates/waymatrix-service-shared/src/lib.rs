//! Shared infrastructure for waymatrix HTTP services.
//!
//! - [`AppState`]: configured locality source and compute defaults
//! - [`health`]: liveness and readiness handlers
//! - [`ProblemDetails`]: RFC 9457 Problem Details for error responses
//! - [`ServiceResponse`]: wrapper for successful responses with content type
//! - [`metrics`]: Prometheus metrics infrastructure
//! - [`logging`]: structured JSON logging setup
//! - [`middleware`]: request tracking and metrics middleware
//! - [`ShortestPathsQuery`]: validated query parameters
//!
//! # Architecture
//!
//! Handlers stay thin. Fetching, validation of locality records and the
//! shortest-path computation all live in `waymatrix-lib`:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  axum Handler                                               │
//! │  - Parse and validate query parameters                      │
//! │  - Fetch localities through waymatrix-lib                   │
//! │  - Compute on a blocking thread                             │
//! │  - Format response or problem                               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Testing Support
//!
//! The [`test_utils`] module writes locality fixtures to temporary files and
//! builds state around them. Enable the `test-utils` feature to use it from
//! dependent crates.

#![deny(warnings)]

mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
mod problem;
mod request;
mod response;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use health::{health_live, health_ready, HealthStatus};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{
    init_metrics, metrics_handler, record_computation_failed, record_node_count,
    record_paths_computed, record_records_skipped, MetricsConfig, MetricsError,
};
pub use middleware::{extract_or_generate_request_id, MetricsLayer, RequestId, REQUEST_ID_HEADER};
pub use problem::{
    failure_reason, from_lib_error, ProblemDetails, PROBLEM_INTERNAL_ERROR,
    PROBLEM_INVALID_REQUEST, PROBLEM_INVALID_SOURCE_DATA, PROBLEM_SERVICE_UNAVAILABLE,
    PROBLEM_SOURCE_TIMEOUT, PROBLEM_SOURCE_UNAVAILABLE,
};
pub use request::{ShortestPathsQuery, Validate};
pub use response::ServiceResponse;
pub use state::{AppState, AppStateError, DUPLICATE_EDGES_ENV};
