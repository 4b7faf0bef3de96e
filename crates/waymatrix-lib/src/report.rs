//! Reporting interface injected into parsing, fetching and computation.
//!
//! Library components never reach for a process-wide logger directly. They
//! receive a `&dyn Reporter` and describe what happened; the service and CLI
//! pass a [`TracingReporter`], tests pass a [`CollectingReporter`] and assert
//! on the recorded events.

use std::sync::Mutex;

use tracing::{info, warn};

use crate::error::{Error, ValidationError};

/// Sink for notable events raised while producing shortest paths.
pub trait Reporter: Send + Sync {
    /// A raw record at `index` was rejected and skipped.
    fn record_skipped(&self, index: usize, error: &ValidationError);

    /// A fetch attempt failed; `attempt` starts at 1.
    fn fetch_attempt_failed(&self, attempt: u32, error: &Error);

    /// A computation finished over `nodes` nodes, yielding `records` result records.
    fn computed(&self, nodes: usize, records: usize);
}

/// Reporter that forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn record_skipped(&self, index: usize, error: &ValidationError) {
        warn!(index, error = %error, "skipping invalid locality record");
    }

    fn fetch_attempt_failed(&self, attempt: u32, error: &Error) {
        warn!(attempt, error = %error, "locality fetch attempt failed");
    }

    fn computed(&self, nodes: usize, records: usize) {
        info!(nodes, records, "all-pairs shortest paths computed");
    }
}

/// Event captured by [`CollectingReporter`].
#[derive(Debug, Clone, PartialEq)]
pub enum ReportEvent {
    RecordSkipped {
        index: usize,
        error: ValidationError,
    },
    FetchAttemptFailed {
        attempt: u32,
        message: String,
    },
    Computed {
        nodes: usize,
        records: usize,
    },
}

/// Reporter that keeps every event in memory.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    events: Mutex<Vec<ReportEvent>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far.
    pub fn events(&self) -> Vec<ReportEvent> {
        self.lock().clone()
    }

    /// Indices of the records that were skipped, in report order.
    pub fn skipped_indices(&self) -> Vec<usize> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                ReportEvent::RecordSkipped { index, .. } => Some(*index),
                _ => None,
            })
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ReportEvent>> {
        // A poisoned lock only means a panicking test thread; the data is still usable.
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn push(&self, event: ReportEvent) {
        self.lock().push(event);
    }
}

impl Reporter for CollectingReporter {
    fn record_skipped(&self, index: usize, error: &ValidationError) {
        self.push(ReportEvent::RecordSkipped {
            index,
            error: error.clone(),
        });
    }

    fn fetch_attempt_failed(&self, attempt: u32, error: &Error) {
        self.push(ReportEvent::FetchAttemptFailed {
            attempt,
            message: error.to_string(),
        });
    }

    fn computed(&self, nodes: usize, records: usize) {
        self.push(ReportEvent::Computed { nodes, records });
    }
}
