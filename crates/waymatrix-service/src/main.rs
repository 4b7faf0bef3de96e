//! All-pairs shortest travel time and distance HTTP service.
//!
//! Every request fetches the current locality list from the configured
//! source, relaxes the time and distance matrices and returns one record per
//! ordered pair of distinct cities.
//!
//! # Endpoints
//!
//! - `GET /shortest_paths` - All-pairs shortest time and distance
//! - `GET /metrics` - Prometheus metrics endpoint
//! - `GET /health/live` - Kubernetes liveness check
//! - `GET /health/ready` - Kubernetes readiness check
//!
//! # Configuration
//!
//! - `WAYMATRIX_LOCALITY_URL` - Upstream locality endpoint
//! - `WAYMATRIX_LOCALITY_SOURCE` - Local JSON file, overrides the URL
//! - `WAYMATRIX_FETCH_TIMEOUT_SECS` - Upstream timeout (default: 10)
//! - `WAYMATRIX_FETCH_RETRIES` - Extra fetch attempts (default: 0)
//! - `WAYMATRIX_DUPLICATE_EDGES` - `last` (default) or `min`
//! - `SERVICE_HOST` - Bind address (default: 0.0.0.0)
//! - `SERVICE_PORT` - HTTP port (default: 8080)
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use waymatrix_lib::{compute_path_records, PathRecords, ResultRecord};
use waymatrix_service_shared::{
    extract_or_generate_request_id, failure_reason, from_lib_error, health_live, health_ready,
    init_logging, init_metrics, metrics_handler, record_computation_failed, record_node_count,
    record_paths_computed, record_records_skipped, AppState, LoggingConfig, MetricsConfig,
    MetricsLayer, ProblemDetails, ServiceResponse, ShortestPathsQuery, Validate,
};

/// Service name used for logging and metric labels.
const SERVICE: &str = "shortest-paths";

/// Shortest paths response returned to the caller.
#[derive(Debug, Serialize)]
struct ShortestPathsResponse {
    /// One record per ordered pair of distinct cities, row-major by node order.
    paths: Vec<ResultRecord>,
    /// Number of distinct cities seen in the valid records.
    node_count: usize,
    /// Number of locality records rejected during validation.
    skipped_records: usize,
}

/// HTTP response - either success or RFC 9457 error.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Response {
    Success(ServiceResponse<ShortestPathsResponse>),
    Error(ProblemDetails),
}

impl IntoResponse for Response {
    fn into_response(self) -> axum::response::Response {
        match self {
            Response::Success(data) => (StatusCode::OK, Json(data)).into_response(),
            Response::Error(problem) => problem.into_response(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logging_config = LoggingConfig::from_env().with_service(SERVICE);
    init_logging(&logging_config);

    let metrics_config = MetricsConfig::from_env();
    if let Err(e) = init_metrics(&metrics_config) {
        tracing::warn!(error = %e, "failed to initialize metrics, continuing without metrics");
    }

    let host: IpAddr = env::var("SERVICE_HOST")
        .ok()
        .and_then(|h| h.parse().ok())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    let port: u16 = env::var("SERVICE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    info!(host = %host, port = port, "starting shortest-paths service");

    let state = AppState::from_env().map_err(|e| {
        error!(error = %e, "failed to configure application state");
        e
    })?;

    let app = app(state).route(&metrics_config.path, get(metrics_handler));

    let addr = SocketAddr::new(host, port);
    info!(addr = %addr, "listening on");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the router serving shortest paths and health checks.
fn app(state: AppState) -> Router {
    Router::new()
        .route("/shortest_paths", get(shortest_paths_handler))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
        .layer(MetricsLayer)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Handle GET /shortest_paths requests.
async fn shortest_paths_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ShortestPathsQuery>,
) -> Response {
    let request_id = extract_or_generate_request_id(&headers).to_string();

    if let Err(problem) = query.validate(&request_id) {
        record_computation_failed("validation_error", SERVICE);
        return Response::Error(*problem);
    }
    let options = query.options(state.options());

    let parsed = match state.source().fetch_edges(state.reporter()).await {
        Ok(parsed) => parsed,
        Err(e) => {
            error!(request_id = %request_id, error = %e, "locality fetch failed");
            record_computation_failed(failure_reason(&e), SERVICE);
            return Response::Error(from_lib_error(&e, &request_id));
        }
    };
    record_records_skipped(parsed.skipped);

    let skipped_records = parsed.skipped;
    let edges = parsed.edges;
    let reporter = state.reporter_arc();
    let computed = tokio::task::spawn_blocking(move || {
        compute_path_records(&edges, options, reporter.as_ref())
    })
    .await;

    let PathRecords {
        node_count,
        records: paths,
    } = match computed {
        Ok(Ok(computed)) => computed,
        Ok(Err(e)) => {
            error!(request_id = %request_id, error = %e, "shortest path computation failed");
            record_computation_failed(failure_reason(&e), SERVICE);
            return Response::Error(from_lib_error(&e, &request_id));
        }
        Err(e) => {
            error!(request_id = %request_id, error = %e, "computation task failed");
            record_computation_failed("internal_error", SERVICE);
            return Response::Error(ProblemDetails::internal_error(
                "shortest path computation did not complete",
                request_id,
            ));
        }
    };

    record_paths_computed(SERVICE);
    record_node_count(node_count);

    info!(
        request_id = %request_id,
        nodes = node_count,
        records = paths.len(),
        skipped = skipped_records,
        duplicate_edges = %options.duplicate_edges,
        "shortest paths computed successfully"
    );

    Response::Success(ServiceResponse::new(ShortestPathsResponse {
        paths,
        node_count,
        skipped_records,
    }))
}
