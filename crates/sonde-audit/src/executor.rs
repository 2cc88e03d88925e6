//! The probe executor.
//!
//! Attempts exactly one operation against exactly one resolved path and
//! observes the raw outcome. The executor never throws: every store error
//! is folded into a [`ProbeOutcome`], with transient failures kept distinct
//! from policy denials. Each execution is independent and stateless; no
//! probe depends on the outcome of any other.
//!
//! Write probes deliberately mutate the store: a document write is a
//! merge-style upsert of a small marker payload (pre-existing fields are
//! untouched), a collection write appends a fresh marker record. Attempting
//! the write is the only way to test write authorization; repeated runs
//! accumulating marker documents is an accepted operational cost.

use std::time::Duration;

use chrono::Utc;
use serde_json::{Value, json};

use sonde_core::{Operation, ProbeOutcome, TargetKind};
use sonde_store::{DocumentStore, StoreError};

/// Per-probe timeout, so one unreachable path cannot stall the whole run.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Executes single probes against a store.
pub struct ProbeExecutor<'a> {
    store: &'a dyn DocumentStore,
    timeout: Duration,
    marker: Value,
}

impl<'a> ProbeExecutor<'a> {
    /// Create an executor for one run.
    ///
    /// The marker payload is fixed per run, which makes repeated document
    /// write probes within a run idempotent merges.
    pub fn new(store: &'a dyn DocumentStore, timeout: Duration, run_id: &str) -> Self {
        let marker = json!({
            "probe": true,
            "run_id": run_id,
            "written_at": Utc::now().to_rfc3339(),
        });
        Self {
            store,
            timeout,
            marker,
        }
    }

    /// Attempt one operation against one path. Never fails.
    pub async fn execute(
        &self,
        operation: Operation,
        target_kind: TargetKind,
        path: &str,
    ) -> ProbeOutcome {
        let attempt = async {
            match operation {
                Operation::Read => self.execute_read(path, target_kind).await,
                Operation::Write => self.execute_write(path, target_kind).await,
            }
        };

        match tokio::time::timeout(self.timeout, attempt).await {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::warn!(path, timeout_secs = self.timeout.as_secs(), "probe timed out");
                ProbeOutcome::transient("timeout")
            }
        }
    }

    /// Attempt a read: a single get for a document, a bounded existence
    /// probe (at most one member) for a collection.
    pub async fn execute_read(&self, path: &str, target_kind: TargetKind) -> ProbeOutcome {
        let result = match target_kind {
            TargetKind::Document => self.store.get_document(path).await.map(|_| ()),
            TargetKind::Collection => self.store.get_one_from_collection(path).await.map(|_| ()),
        };
        Self::outcome(result)
    }

    /// Attempt a write: merge-upsert for a document, append for a
    /// collection, both with the run's marker payload.
    pub async fn execute_write(&self, path: &str, target_kind: TargetKind) -> ProbeOutcome {
        let result = match target_kind {
            TargetKind::Document => self.store.merge_document(path, &self.marker).await,
            TargetKind::Collection => self
                .store
                .append_to_collection(path, &self.marker)
                .await
                .map(|_| ()),
        };
        Self::outcome(result)
    }

    fn outcome(result: Result<(), StoreError>) -> ProbeOutcome {
        match result {
            Ok(()) => ProbeOutcome::allowed(),
            Err(err) if err.is_transient() => ProbeOutcome::transient(err.detail().to_string()),
            Err(err) => ProbeOutcome::denied(err.to_string()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
