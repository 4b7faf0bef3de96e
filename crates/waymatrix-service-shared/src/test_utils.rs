//! Test utilities for handler testing.
//!
//! Fixtures are written to temporary files and served through the
//! file-backed locality source, so tests need no upstream server.

use std::io::Write;
use std::sync::Arc;

use serde_json::{json, Value};
use tempfile::NamedTempFile;
use waymatrix_lib::{CollectingReporter, ComputeOptions, SourceConfig};

use crate::state::AppState;

/// Known city names in [`fixture_localities`].
pub mod fixture_cities {
    pub const ALPHA: &str = "Alpha";
    pub const BRAVO: &str = "Bravo";
    pub const CHARLIE: &str = "Charlie";
    /// Only connected to [`ECHO`].
    pub const DELTA: &str = "Delta";
    pub const ECHO: &str = "Echo";
}

/// Two components: a triangle Alpha/Bravo/Charlie and a single Delta/Echo edge.
///
/// The direct Alpha/Charlie edge is slower than going through Bravo.
pub fn fixture_localities() -> Value {
    json!([
        {"city1": "Alpha", "city2": "Bravo", "min": 10, "km": 12.5},
        {"city1": "Bravo", "city2": "Charlie", "min": 5, "km": 6.0},
        {"city1": "Alpha", "city2": "Charlie", "min": 30, "km": 15.0},
        {"city1": "Delta", "city2": "Echo", "min": 7, "km": 8.0}
    ])
}

/// Write `payload` to a temporary JSON file.
///
/// Keep the returned handle alive for as long as the file is read.
///
/// # Panics
///
/// Panics if the temporary file cannot be written.
pub fn write_fixture(payload: &Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create fixture file");
    file.write_all(payload.to_string().as_bytes())
        .expect("write fixture file");
    file.flush().expect("flush fixture file");
    file
}

/// State reading `payload` from a temporary file, with a collecting reporter.
///
/// # Panics
///
/// Panics if the state cannot be built.
pub fn fixture_state(payload: &Value) -> (AppState, Arc<CollectingReporter>, NamedTempFile) {
    let file = write_fixture(payload);
    let reporter = Arc::new(CollectingReporter::new());
    let state = AppState::with_reporter(
        SourceConfig::file(file.path()),
        ComputeOptions::default(),
        reporter.clone(),
    )
    .unwrap_or_else(|e| panic!("failed to build fixture state: {}", e));
    (state, reporter, file)
}
