//! Response wrapper for successful HTTP responses.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Wrapper for successful responses with content type metadata.
///
/// Mirrors the `content_type` field carried by [`crate::ProblemDetails`].
///
/// # Example
///
/// ```
/// use waymatrix_service_shared::ServiceResponse;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Summary {
///     node_count: usize,
/// }
///
/// let response = ServiceResponse::new(Summary { node_count: 3 });
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceResponse<T> {
    /// The actual response payload.
    #[serde(flatten)]
    pub data: T,

    /// Content type for this response.
    pub content_type: String,
}

impl<T> ServiceResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            content_type: "application/json".to_string(),
        }
    }
}

impl<T> From<T> for ServiceResponse<T> {
    fn from(data: T) -> Self {
        Self::new(data)
    }
}

impl<T: Serialize> IntoResponse for ServiceResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Summary {
        node_count: usize,
        paths: Vec<String>,
    }

    #[test]
    fn test_response_fields_are_flattened() {
        let response = ServiceResponse::new(Summary {
            node_count: 2,
            paths: vec!["A->B".to_string()],
        });
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("\"node_count\":2"));
        assert!(json.contains("\"paths\":["));
        assert!(json.contains("\"content_type\":\"application/json\""));
        assert!(!json.contains("\"data\":{"));
    }

    #[test]
    fn test_response_roundtrip() {
        let json = r#"{"node_count":0,"paths":[],"content_type":"application/json"}"#;
        let response: ServiceResponse<Summary> = serde_json::from_str(json).unwrap();
        assert_eq!(response.data.node_count, 0);
        assert_eq!(response.content_type, "application/json");
    }
}
