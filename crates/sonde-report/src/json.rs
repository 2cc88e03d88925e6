//! JSON export.

use sonde_audit::AuditReport;

/// Serialize a report as pretty-printed JSON.
pub fn render_json(report: &AuditReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::tests::sample_report;

    #[test]
    fn test_render_json_roundtrips() {
        let report = sample_report();
        let json = render_json(&report).unwrap();
        let back: AuditReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.results.len(), report.results.len());
        assert_eq!(back.summary.score, report.summary.score);
        assert_eq!(back.run_id, report.run_id);
    }
}
