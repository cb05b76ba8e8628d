//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the solver code stays clean and testable
//! - output changes are localized

use crate::domain::{IssueRecord, Severity, Trace};
use crate::report::{TraceStats, compute_stats};

/// Format the full run summary (counts, statistics, skipped holes, notices).
pub fn format_summary(traces: &[Trace], issues: &[IssueRecord], top_issues: usize) -> String {
    let stats = compute_stats(traces, issues);
    let mut out = String::new();

    out.push_str("=== dht - Drillhole Traces (minimum curvature) ===\n");
    out.push_str(&format_stats(&stats));

    let failures: Vec<&IssueRecord> = issues.iter().filter(|i| i.severity == Severity::Error).collect();
    let notices: Vec<&IssueRecord> = issues.iter().filter(|i| i.severity != Severity::Error).collect();

    if !failures.is_empty() {
        out.push_str(&format!("\nSkipped holes ({}):\n", failures.len()));
        out.push_str(&format_issue_lines(&failures, top_issues));
    }
    if !notices.is_empty() {
        out.push_str(&format!("\nNotices ({}):\n", notices.len()));
        out.push_str(&format_issue_lines(&notices, top_issues));
    }

    out
}

fn format_stats(stats: &TraceStats) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Holes: traced={} (surveyed={}, collar-only={}) | skipped={}\n",
        stats.holes_traced,
        stats.holes_surveyed,
        stats.holes_traced - stats.holes_surveyed,
        stats.holes_skipped,
    ));
    out.push_str(&format!("Rows: {}\n", stats.rows));
    out.push_str(&format!(
        "Meterage: total={:.2} m | mean hole depth={:.2} m\n",
        stats.total_meterage, stats.mean_depth
    ));
    if let Some((hole, depth)) = &stats.deepest {
        out.push_str(&format!("Deepest hole: {hole} ({depth:.2} m)\n"));
    }
    if let Some((hole, depth, dls)) = &stats.max_dls {
        out.push_str(&format!("Max dogleg severity: {dls:.3}°/30m ({hole} @ {depth:.2} m)\n"));
    }
    out
}

fn format_issue_lines(issues: &[&IssueRecord], top: usize) -> String {
    let mut out = String::new();
    for issue in issues.iter().take(top) {
        out.push_str(&format!(
            "  [{:<7}] {:<12} {:<22} {}\n",
            issue.severity.label(),
            issue.hole_id,
            issue.kind,
            issue.message
        ));
    }
    if issues.len() > top {
        out.push_str(&format!("  ... {} more\n", issues.len() - top));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(hole: &str, severity: Severity, kind: &str) -> IssueRecord {
        IssueRecord {
            hole_id: hole.to_string(),
            severity,
            kind: kind.to_string(),
            message: format!("{kind} in {hole}"),
        }
    }

    #[test]
    fn summary_lists_skipped_holes_with_reason() {
        let issues = vec![
            issue("DH7", Severity::Error, "duplicate_depth"),
            issue("DH9", Severity::Info, "collar_without_survey"),
        ];
        let text = format_summary(&[], &issues, 10);
        assert!(text.contains("skipped=1"));
        assert!(text.contains("Skipped holes (1)"));
        assert!(text.contains("duplicate_depth in DH7"));
        assert!(text.contains("Notices (1)"));
    }

    #[test]
    fn summary_truncates_long_issue_lists() {
        let issues: Vec<IssueRecord> = (0..5)
            .map(|i| issue(&format!("H{i}"), Severity::Warning, "dip_out_of_range"))
            .collect();
        let text = format_summary(&[], &issues, 2);
        assert!(text.contains("... 3 more"));
        assert!(!text.contains("H4"));
    }
}
