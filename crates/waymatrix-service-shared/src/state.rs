//! Application state for HTTP services.
//!
//! Locality data is fetched per request, so the state holds what is needed
//! to fetch and compute rather than any loaded data: the configured source,
//! the compute options and the reporter handed to the library.

use std::sync::Arc;

use waymatrix_lib::{
    ComputeOptions, DuplicateEdgePolicy, LocalitySource, Reporter, SourceConfig, TracingReporter,
};
use waymatrix_lib::Error as LibError;

/// Environment variable selecting the duplicate edge policy (`last` or `min`).
pub const DUPLICATE_EDGES_ENV: &str = "WAYMATRIX_DUPLICATE_EDGES";

/// Error during application state initialization.
#[derive(Debug)]
pub enum AppStateError {
    /// Neither a locality URL nor a local source file is configured.
    SourceNotConfigured,

    /// The HTTP client for the locality source could not be built.
    SourceInit(LibError),

    /// The duplicate edge policy setting is not recognised.
    InvalidDuplicatePolicy(String),
}

impl std::fmt::Display for AppStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SourceNotConfigured => write!(f, "{}", LibError::SourceNotConfigured),
            Self::SourceInit(e) => write!(f, "failed to initialize locality source: {}", e),
            Self::InvalidDuplicatePolicy(msg) => write!(f, "invalid {}: {}", DUPLICATE_EDGES_ENV, msg),
        }
    }
}

impl std::error::Error for AppStateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SourceInit(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LibError> for AppStateError {
    fn from(err: LibError) -> Self {
        match err {
            LibError::SourceNotConfigured => Self::SourceNotConfigured,
            other => Self::SourceInit(other),
        }
    }
}

/// Shared application state for all axum handlers.
///
/// Cheaply cloneable (`Arc` inside); share it through axum's `State` extractor.
///
/// # Example
///
/// ```ignore
/// use axum::{Router, routing::get, extract::State};
/// use waymatrix_service_shared::AppState;
///
/// async fn handler(State(state): State<AppState>) {
///     let source = state.source();
///     // ... fetch and compute
/// }
///
/// let state = AppState::from_env().unwrap();
/// let app = Router::new()
///     .route("/shortest_paths", get(handler))
///     .with_state(state);
/// ```
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    source: LocalitySource,
    options: ComputeOptions,
    reporter: Arc<dyn Reporter>,
}

impl AppState {
    /// Build state from `WAYMATRIX_*` environment variables.
    ///
    /// See [`SourceConfig::from_env`] for the source variables; the duplicate
    /// edge policy is read from `WAYMATRIX_DUPLICATE_EDGES` (default `last`).
    pub fn from_env() -> Result<Self, AppStateError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppState::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppStateError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let duplicate_edges = match lookup(DUPLICATE_EDGES_ENV) {
            Some(value) if !value.trim().is_empty() => value
                .parse::<DuplicateEdgePolicy>()
                .map_err(AppStateError::InvalidDuplicatePolicy)?,
            _ => DuplicateEdgePolicy::default(),
        };
        let config = SourceConfig::from_lookup(lookup)?;

        Self::new(config, ComputeOptions { duplicate_edges })
    }

    /// Build state for an explicit source configuration, reporting through `tracing`.
    pub fn new(config: SourceConfig, options: ComputeOptions) -> Result<Self, AppStateError> {
        Self::with_reporter(config, options, Arc::new(TracingReporter))
    }

    /// Build state with a custom reporter.
    pub fn with_reporter(
        config: SourceConfig,
        options: ComputeOptions,
        reporter: Arc<dyn Reporter>,
    ) -> Result<Self, AppStateError> {
        let source = LocalitySource::new(config)?;
        tracing::info!(
            source = %source.config().location,
            timeout_secs = source.config().timeout.as_secs_f64(),
            retries = source.config().retries,
            duplicate_edges = %options.duplicate_edges,
            "locality source configured"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                source,
                options,
                reporter,
            }),
        })
    }

    /// The configured locality source.
    pub fn source(&self) -> &LocalitySource {
        &self.inner.source
    }

    /// Default compute options for requests that do not override them.
    pub fn options(&self) -> ComputeOptions {
        self.inner.options
    }

    /// Reporter passed into the library.
    pub fn reporter(&self) -> &dyn Reporter {
        self.inner.reporter.as_ref()
    }

    /// Owned handle to the reporter, for work moved onto blocking threads.
    pub fn reporter_arc(&self) -> Arc<dyn Reporter> {
        self.inner.reporter.clone()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("source", &self.inner.source.config().location.to_string())
            .field("duplicate_edges", &self.inner.options.duplicate_edges)
            .finish()
    }
}
