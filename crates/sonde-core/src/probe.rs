//! Probe data model.
//!
//! A probe is one attempted operation (read or write) against one resource
//! path, used to test whether access-control policy matches expectation.
//! [`ProbeSpec`] is the declarative side, fixed for the process lifetime.
//! [`ProbeOutcome`] is the observed side, produced once per probe per audit
//! run. [`ProbeResult`] is derived from the two by the classifier and owned
//! entirely by the orchestrating caller; nothing here is persisted.

use serde::{Deserialize, Serialize};

/// The operation a probe attempts against the backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Fetch a document, or a bounded existence probe on a collection.
    Read,
    /// Merge-style upsert on a document, or append on a collection.
    Write,
}

impl Operation {
    /// Short label used in report tables.
    pub fn label(&self) -> &'static str {
        match self {
            Operation::Read => "read",
            Operation::Write => "write",
        }
    }
}

/// Whether a probe targets a single document or a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    /// A single addressable document.
    Document,
    /// A collection of documents.
    Collection,
}

impl TargetKind {
    /// Short label used in report tables.
    pub fn label(&self) -> &'static str {
        match self {
            TargetKind::Document => "document",
            TargetKind::Collection => "collection",
        }
    }
}

/// A single declarative access-control test case.
///
/// `expected_allowed` is a policy decision fixed at design time; it states
/// what *should* happen under correct policy, independent of what the store
/// actually does at run time. `id` must be unique across a catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeSpec {
    /// Unique key within the catalog (stable string for report parsing).
    pub id: String,
    /// Human label.
    pub name: String,
    /// Resource path template. May reference `{self}` and `{foreign}`,
    /// substituted from the run's subject context before execution.
    pub path: String,
    /// The operation to attempt.
    pub operation: Operation,
    /// Document vs. collection addressing mode.
    pub target_kind: TargetKind,
    /// Whether policy should permit this operation.
    pub expected_allowed: bool,
    /// Rationale for the expectation.
    pub description: String,
}

impl ProbeSpec {
    /// Create a spec. Convenience constructor for catalog tables.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        path: impl Into<String>,
        operation: Operation,
        target_kind: TargetKind,
        expected_allowed: bool,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            path: path.into(),
            operation,
            target_kind,
            expected_allowed,
            description: description.into(),
        }
    }
}

/// The raw result of attempting one probe against the live store.
///
/// `actual_allowed` reports success or failure of the attempted operation,
/// not of the expectation. The executor never propagates store errors; they
/// land here as `error_detail`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    /// Whether the attempted operation succeeded against the live store.
    pub actual_allowed: bool,
    /// Diagnostic detail when the operation failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
    /// Whether the failure was network/timeout shaped rather than a policy
    /// decision. Transient outcomes classify as indeterminate, not as a
    /// denial.
    #[serde(default)]
    pub transient: bool,
}

impl ProbeOutcome {
    /// The operation succeeded.
    pub fn allowed() -> Self {
        Self {
            actual_allowed: true,
            error_detail: None,
            transient: false,
        }
    }

    /// The store rejected the operation under access policy (or the target
    /// was absent). This is an expected, successful probe signal.
    pub fn denied(detail: impl Into<String>) -> Self {
        Self {
            actual_allowed: false,
            error_detail: Some(detail.into()),
            transient: false,
        }
    }

    /// The operation failed for reasons unrelated to policy (network error,
    /// timeout). Carries no audit signal.
    pub fn transient(detail: impl Into<String>) -> Self {
        Self {
            actual_allowed: false,
            error_detail: Some(detail.into()),
            transient: true,
        }
    }
}

/// Classification of one probe after comparing expectation to outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStatus {
    /// Outcome matched expectation.
    Passed,
    /// An operation policy should deny was allowed. A real exposure.
    Critical,
    /// An operation policy should allow was blocked. A usability
    /// regression, not an exposure.
    Warning,
    /// The probe produced no policy signal (transient failure, unresolved
    /// path). Shown with its raw diagnostic and excluded from the score.
    Indeterminate,
}

impl ProbeStatus {
    /// Classify an outcome against the spec's expectation.
    pub fn classify(expected_allowed: bool, outcome: &ProbeOutcome) -> Self {
        if outcome.transient {
            return ProbeStatus::Indeterminate;
        }
        match (expected_allowed, outcome.actual_allowed) {
            (true, true) | (false, false) => ProbeStatus::Passed,
            (false, true) => ProbeStatus::Critical,
            (true, false) => ProbeStatus::Warning,
        }
    }

    /// Whether this status represents a policy mismatch.
    pub fn is_failing(&self) -> bool {
        matches!(self, ProbeStatus::Critical | ProbeStatus::Warning)
    }

    /// Whether this status counts toward the score denominator.
    pub fn is_determinate(&self) -> bool {
        !matches!(self, ProbeStatus::Indeterminate)
    }

    /// Label used in report tables.
    pub fn label(&self) -> &'static str {
        match self {
            ProbeStatus::Passed => "pass",
            ProbeStatus::Critical => "CRITICAL",
            ProbeStatus::Warning => "warning",
            ProbeStatus::Indeterminate => "indeterminate",
        }
    }
}

/// One classified probe, as it appears in the final report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResult {
    /// The originating spec's id.
    pub id: String,
    /// The originating spec's human label.
    pub name: String,
    /// The operation that was attempted.
    pub operation: Operation,
    /// Document vs. collection addressing mode.
    pub target_kind: TargetKind,
    /// The resolved path the probe ran against. Holds the original template
    /// when resolution failed and the probe never ran.
    pub path: String,
    /// The spec's design-time expectation.
    pub expected_allowed: bool,
    /// The observed outcome.
    pub actual_allowed: bool,
    /// Classification per the expected/actual quadrant.
    pub status: ProbeStatus,
    /// Raw diagnostic from the store, when the operation failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

impl ProbeResult {
    /// Classify an outcome into a result row.
    pub fn from_outcome(spec: &ProbeSpec, path: impl Into<String>, outcome: ProbeOutcome) -> Self {
        let status = ProbeStatus::classify(spec.expected_allowed, &outcome);
        Self {
            id: spec.id.clone(),
            name: spec.name.clone(),
            operation: spec.operation,
            target_kind: spec.target_kind,
            path: path.into(),
            expected_allowed: spec.expected_allowed,
            actual_allowed: outcome.actual_allowed,
            status,
            error_detail: outcome.error_detail,
        }
    }

    /// Whether expectation and outcome matched.
    pub fn passed(&self) -> bool {
        self.status == ProbeStatus::Passed
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(expected_allowed: bool) -> ProbeSpec {
        ProbeSpec::new(
            "own-profile-read",
            "Read own profile",
            "users/{self}",
            Operation::Read,
            TargetKind::Document,
            expected_allowed,
            "a user can always read their own profile",
        )
    }

    // -------------------------------------------------------------------------
    // Classification quadrants
    // -------------------------------------------------------------------------

    #[test]
    fn test_classify_expected_and_allowed_passes() {
        let status = ProbeStatus::classify(true, &ProbeOutcome::allowed());
        assert_eq!(status, ProbeStatus::Passed);
    }

    #[test]
    fn test_classify_expected_deny_and_denied_passes() {
        let status = ProbeStatus::classify(false, &ProbeOutcome::denied("permission denied"));
        assert_eq!(status, ProbeStatus::Passed);
    }

    #[test]
    fn test_classify_unexpected_allow_is_critical() {
        let status = ProbeStatus::classify(false, &ProbeOutcome::allowed());
        assert_eq!(status, ProbeStatus::Critical);
        assert!(status.is_failing());
    }

    #[test]
    fn test_classify_unexpected_deny_is_warning() {
        let status = ProbeStatus::classify(true, &ProbeOutcome::denied("permission denied"));
        assert_eq!(status, ProbeStatus::Warning);
        assert!(status.is_failing());
    }

    #[test]
    fn test_classify_transient_is_indeterminate_regardless_of_expectation() {
        for expected in [true, false] {
            let status = ProbeStatus::classify(expected, &ProbeOutcome::transient("timeout"));
            assert_eq!(status, ProbeStatus::Indeterminate);
            assert!(!status.is_failing());
            assert!(!status.is_determinate());
        }
    }

    // -------------------------------------------------------------------------
    // Outcome constructors
    // -------------------------------------------------------------------------

    #[test]
    fn test_outcome_allowed() {
        let outcome = ProbeOutcome::allowed();
        assert!(outcome.actual_allowed);
        assert!(outcome.error_detail.is_none());
        assert!(!outcome.transient);
    }

    #[test]
    fn test_outcome_denied_carries_detail() {
        let outcome = ProbeOutcome::denied("permission-denied");
        assert!(!outcome.actual_allowed);
        assert_eq!(outcome.error_detail.as_deref(), Some("permission-denied"));
        assert!(!outcome.transient);
    }

    #[test]
    fn test_outcome_transient_is_not_allowed() {
        let outcome = ProbeOutcome::transient("timeout");
        assert!(!outcome.actual_allowed);
        assert_eq!(outcome.error_detail.as_deref(), Some("timeout"));
        assert!(outcome.transient);
    }

    // -------------------------------------------------------------------------
    // Result rows
    // -------------------------------------------------------------------------

    #[test]
    fn test_result_from_outcome_carries_spec_fields() {
        let result = ProbeResult::from_outcome(&spec(true), "users/alice", ProbeOutcome::allowed());
        assert_eq!(result.id, "own-profile-read");
        assert_eq!(result.path, "users/alice");
        assert_eq!(result.operation, Operation::Read);
        assert!(result.passed());
    }

    #[test]
    fn test_result_from_outcome_keeps_error_detail() {
        let result = ProbeResult::from_outcome(
            &spec(false),
            "users/bob",
            ProbeOutcome::denied("PERMISSION_DENIED"),
        );
        assert!(result.passed());
        assert_eq!(result.error_detail.as_deref(), Some("PERMISSION_DENIED"));
    }

    // -------------------------------------------------------------------------
    // Serialization
    // -------------------------------------------------------------------------

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&ProbeStatus::Indeterminate).unwrap();
        assert_eq!(json, "\"indeterminate\"");
    }

    #[test]
    fn test_spec_roundtrip() {
        let json = serde_json::to_string(&spec(true)).unwrap();
        let back: ProbeSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, "own-profile-read");
        assert_eq!(back.operation, Operation::Read);
        assert_eq!(back.target_kind, TargetKind::Document);
    }

    #[test]
    fn test_outcome_serialization_skips_empty_detail() {
        let json = serde_json::to_string(&ProbeOutcome::allowed()).unwrap();
        assert!(!json.contains("error_detail"));
    }
}
