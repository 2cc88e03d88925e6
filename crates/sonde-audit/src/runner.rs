//! The catalog runner and result classifier.
//!
//! Drives the full catalog through the executor and classifies each
//! outcome. Probes are independent, so they fan out concurrently; results
//! are collected with `join_all`, which yields them in input order, so the
//! report is always in catalog order regardless of completion order.
//!
//! No probe-level failure aborts a run. The only fatal conditions are the
//! preconditions checked before any probe fires: a missing self identifier
//! and an empty catalog.

use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sonde_core::{ProbeOutcome, ProbeResult, ProbeStatus, resolve_path};
use sonde_store::DocumentStore;

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::executor::{DEFAULT_PROBE_TIMEOUT, ProbeExecutor};
use crate::subject::SubjectContext;

/// Runs a catalog against a store and classifies the results.
pub struct AuditRunner<'a> {
    store: &'a dyn DocumentStore,
    timeout: Duration,
}

impl<'a> AuditRunner<'a> {
    /// Create a runner with the default per-probe timeout.
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self {
            store,
            timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    /// Override the per-probe timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run every probe in the catalog and return the classified report.
    ///
    /// # Errors
    ///
    /// [`Error::MissingSubject`] when the subject context has no self id,
    /// [`Error::EmptyCatalog`] when there is nothing to run. Probe-level
    /// failures are outcomes, not errors.
    pub async fn run(&self, catalog: &Catalog, subjects: &SubjectContext) -> Result<AuditReport> {
        if subjects.self_id.is_empty() {
            return Err(Error::MissingSubject);
        }
        if catalog.is_empty() {
            return Err(Error::EmptyCatalog);
        }

        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let executor = ProbeExecutor::new(self.store, self.timeout, &run_id.to_string());

        tracing::info!(
            %run_id,
            probes = catalog.len(),
            store = self.store.name(),
            "starting audit run"
        );

        let probes = catalog.probes().iter().map(|spec| {
            let executor = &executor;
            let subjects = &subjects;
            async move {
                match resolve_path(&spec.path, &subjects.self_id, &subjects.foreign_id) {
                    Ok(path) => {
                        let outcome = executor
                            .execute(spec.operation, spec.target_kind, &path)
                            .await;
                        ProbeResult::from_outcome(spec, path, outcome)
                    }
                    // Fail closed: an unresolvable template is never probed.
                    Err(err) => ProbeResult::from_outcome(
                        spec,
                        spec.path.clone(),
                        ProbeOutcome::transient(format!("not probed: {err}")),
                    ),
                }
            }
        });

        let results = future::join_all(probes).await;
        let summary = AuditSummary::from_results(&results);

        tracing::info!(
            %run_id,
            passed = summary.passed,
            critical = summary.critical,
            warning = summary.warning,
            indeterminate = summary.indeterminate,
            score = summary.score,
            "audit run complete"
        );

        Ok(AuditReport {
            run_id,
            started_at,
            subjects: subjects.clone(),
            results,
            summary,
        })
    }
}

/// Aggregate counts and score for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditSummary {
    /// Total probes in the catalog.
    pub total: usize,
    /// Probes whose outcome matched expectation.
    pub passed: usize,
    /// Unexpectedly allowed operations (real exposures).
    pub critical: usize,
    /// Unexpectedly blocked operations (usability regressions).
    pub warning: usize,
    /// Probes that produced no policy signal.
    pub indeterminate: usize,
    /// `round(100 * passed / determinate)`. `None` when every probe was
    /// indeterminate, since a fabricated number would be worse than no score.
    pub score: Option<u8>,
}

impl AuditSummary {
    /// Compute the summary for a result sequence.
    pub fn from_results(results: &[ProbeResult]) -> Self {
        let mut summary = Self {
            total: results.len(),
            passed: 0,
            critical: 0,
            warning: 0,
            indeterminate: 0,
            score: None,
        };

        for result in results {
            match result.status {
                ProbeStatus::Passed => summary.passed += 1,
                ProbeStatus::Critical => summary.critical += 1,
                ProbeStatus::Warning => summary.warning += 1,
                ProbeStatus::Indeterminate => summary.indeterminate += 1,
            }
        }

        let determinate = summary.total - summary.indeterminate;
        if determinate > 0 {
            let score = (100.0 * summary.passed as f64 / determinate as f64).round();
            summary.score = Some(score as u8);
        }
        summary
    }
}

/// The explicit run handle: one audit run's classified results, in catalog
/// order, plus the aggregate. Owned by the caller; nothing is cached
/// ambiently between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    /// Unique id of this run (also stamped into write-probe markers).
    pub run_id: Uuid,
    /// When the run started (UTC).
    pub started_at: DateTime<Utc>,
    /// The identities the run probed with.
    pub subjects: SubjectContext,
    /// One classified result per probe, in catalog order.
    pub results: Vec<ProbeResult>,
    /// Aggregate counts and score.
    pub summary: AuditSummary,
}

impl AuditReport {
    /// Whether any probe found a real exposure.
    pub fn has_critical(&self) -> bool {
        self.summary.critical > 0
    }
}

// ============================================================================
// Tests
// ============================================================================
