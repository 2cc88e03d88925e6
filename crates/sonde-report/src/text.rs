//! Fixed-width text rendering.
//!
//! The exact byte format is not contractual; the report must carry the
//! summary score, failing counts by severity, and one row per probe with
//! name, operation, path, expectation, outcome, and status.

use sonde_audit::AuditReport;
use sonde_core::ProbeResult;

/// Render a report as a human-readable text table.
pub fn render_text(report: &AuditReport) -> String {
    let mut out = String::new();

    out.push_str("sonde audit report\n");
    out.push_str("==================\n");
    out.push_str(&format!("run:      {}\n", report.run_id));
    out.push_str(&format!(
        "started:  {}\n",
        report.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!(
        "subjects: self={} foreign={}\n",
        report.subjects.self_id, report.subjects.foreign_id
    ));

    let summary = &report.summary;
    out.push_str(&format!(
        "probes:   {} (passed {}, critical {}, warning {}, indeterminate {})\n",
        summary.total, summary.passed, summary.critical, summary.warning, summary.indeterminate
    ));
    match summary.score {
        Some(score) => out.push_str(&format!("score:    {score}/100\n")),
        None => out.push_str("score:    n/a (no determinate probes)\n"),
    }

    let findings: Vec<&ProbeResult> = report
        .results
        .iter()
        .filter(|r| r.status.is_failing() || !r.status.is_determinate())
        .collect();
    if !findings.is_empty() {
        out.push_str("\nfindings\n--------\n");
        for result in findings {
            out.push_str(&format!(
                "{:<13} {:<5} {}  {}\n",
                result.status.label(),
                result.operation.label(),
                result.path,
                finding_detail(result),
            ));
        }
    }

    out.push_str("\nall probes\n----------\n");
    let name_width = report
        .results
        .iter()
        .map(|r| r.name.len())
        .max()
        .unwrap_or(0)
        .max("name".len());
    out.push_str(&format!(
        "{:<name_width$}  {:<5} {:<10} {:<8} {:<8} {:<13} path\n",
        "name", "op", "target", "expected", "actual", "status"
    ));
    for result in &report.results {
        out.push_str(&format!(
            "{:<name_width$}  {:<5} {:<10} {:<8} {:<8} {:<13} {}\n",
            result.name,
            result.operation.label(),
            result.target_kind.label(),
            expectation_label(result.expected_allowed),
            expectation_label(result.actual_allowed),
            result.status.label(),
            result.path,
        ));
    }

    out
}

fn expectation_label(allowed: bool) -> &'static str {
    if allowed { "allow" } else { "deny" }
}

fn finding_detail(result: &ProbeResult) -> String {
    match &result.error_detail {
        Some(detail) => format!(
            "expected {}, got {} ({detail})",
            expectation_label(result.expected_allowed),
            expectation_label(result.actual_allowed),
        ),
        None => format!(
            "expected {}, got {}",
            expectation_label(result.expected_allowed),
            expectation_label(result.actual_allowed),
        ),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Utc;
    use sonde_audit::{AuditSummary, SubjectContext};
    use sonde_core::{Operation, ProbeOutcome, ProbeSpec, TargetKind};
    use uuid::Uuid;

    fn result(
        id: &str,
        expected_allowed: bool,
        outcome: ProbeOutcome,
        path: &str,
    ) -> sonde_core::ProbeResult {
        let spec = ProbeSpec::new(
            id,
            format!("Probe {id}"),
            path,
            Operation::Read,
            TargetKind::Document,
            expected_allowed,
            "",
        );
        sonde_core::ProbeResult::from_outcome(&spec, path, outcome)
    }

    pub(crate) fn sample_report() -> AuditReport {
        let results = vec![
            result("pass", true, ProbeOutcome::allowed(), "users/alice"),
            result("exposed", false, ProbeOutcome::allowed(), "users/bob"),
            result(
                "blocked",
                true,
                ProbeOutcome::denied("permission denied: rules"),
                "user_preferences/alice",
            ),
            result(
                "flaky",
                true,
                ProbeOutcome::transient("timeout"),
                "reports",
            ),
        ];
        let summary = AuditSummary::from_results(&results);
        AuditReport {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            subjects: SubjectContext::new("alice", "bob"),
            results,
            summary,
        }
    }

    #[test]
    fn test_render_text_carries_summary() {
        let text = render_text(&sample_report());
        assert!(text.contains("passed 1, critical 1, warning 1, indeterminate 1"));
        // 1 passed of 3 determinate probes.
        assert!(text.contains("score:    33/100"));
        assert!(text.contains("subjects: self=alice foreign=bob"));
    }

    #[test]
    fn test_render_text_lists_every_failing_probe() {
        let text = render_text(&sample_report());
        let findings = text.split("findings").nth(1).unwrap();
        assert!(findings.contains("CRITICAL"));
        assert!(findings.contains("warning"));
        assert!(findings.contains("indeterminate"));
        assert!(findings.contains("timeout"));
    }

    #[test]
    fn test_render_text_has_one_row_per_probe() {
        let report = sample_report();
        let text = render_text(&report);
        let table = text.split("all probes").nth(1).unwrap();
        for result in &report.results {
            assert!(table.contains(result.name.as_str()));
            assert!(table.contains(result.path.as_str()));
        }
    }

    #[test]
    fn test_render_text_without_score() {
        let results = vec![result(
            "flaky",
            true,
            ProbeOutcome::transient("connection reset"),
            "users/alice",
        )];
        let summary = AuditSummary::from_results(&results);
        let report = AuditReport {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            subjects: SubjectContext::new("alice", "bob"),
            results,
            summary,
        };
        let text = render_text(&report);
        assert!(text.contains("score:    n/a"));
    }
}
