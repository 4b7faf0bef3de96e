//! Request types and validation for HTTP endpoints.

use serde::{Deserialize, Serialize};
use waymatrix_lib::{ComputeOptions, DuplicateEdgePolicy};

use crate::ProblemDetails;

/// Validation trait for request types.
///
/// The `request_id` populates the `instance` field of any returned problem.
/// The problem is boxed to keep the `Err` variant small.
pub trait Validate {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>>;
}

/// Query parameters accepted by `GET /shortest_paths`.
///
/// Every parameter is optional; a bare request uses the service defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShortestPathsQuery {
    /// Duplicate edge policy override: `last` or `min`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicates: Option<String>,
}

impl ShortestPathsQuery {
    /// Resolve the compute options for this request on top of the service defaults.
    ///
    /// Call [`Validate::validate`] first; an unparseable policy falls back to
    /// the defaults here.
    pub fn options(&self, defaults: ComputeOptions) -> ComputeOptions {
        match self.policy() {
            Some(Ok(duplicate_edges)) => ComputeOptions { duplicate_edges },
            _ => defaults,
        }
    }

    fn policy(&self) -> Option<Result<DuplicateEdgePolicy, String>> {
        self.duplicates
            .as_deref()
            .map(|value| value.parse::<DuplicateEdgePolicy>())
    }
}

impl Validate for ShortestPathsQuery {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        if let Some(Err(_)) = self.policy() {
            return Err(Box::new(ProblemDetails::bad_request(
                "The 'duplicates' parameter must be 'last' or 'min'",
                request_id,
            )));
        }

        Ok(())
    }
}
