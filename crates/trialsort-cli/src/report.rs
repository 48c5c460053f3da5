//! Human-readable run report.

use std::fmt::Write;

use trialsort_organize::{CopyOutcome, OrganizeReport};

/// Render the report. Plans list every destination; runs list only failures.
pub fn format_report(report: &OrganizeReport, dry_run: bool) -> String {
    let mut out = String::new();
    let title = if dry_run { "Plan" } else { "Run" };
    let _ = writeln!(out, "=== trialsort {} Report ===", title);
    let _ = writeln!(out);
    let _ = writeln!(out, "Subjects processed:   {}", report.subjects_processed);
    let _ = writeln!(out, "Subjects skipped:     {}", report.subjects_skipped.len());
    if dry_run {
        let _ = writeln!(out, "Planned copies:       {}", report.planned);
    } else {
        let _ = writeln!(out, "Copied:               {}", report.copied);
        let _ = writeln!(out, "Already present:      {}", report.skipped_existing);
        let _ = writeln!(out, "Failed:               {}", report.failed);
    }
    let _ = writeln!(out, "Excluded (timestamp): {}", report.excluded_no_timestamp);
    let _ = writeln!(out, "Excluded (task):      {}", report.excluded_task);
    let _ = writeln!(out, "Unresolved scores:    {}", report.unresolved_scores);

    if !report.subjects_skipped.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Skipped subjects:");
        for s in &report.subjects_skipped {
            let _ = writeln!(out, "  - [{}] {}: {}", s.cohort, s.subject, s.reason);
        }
    }

    if dry_run && !report.copies.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Planned:");
        for c in &report.copies {
            let _ = writeln!(out, "  {} -> {}", c.source.display(), c.destination.display());
        }
    }

    let failures: Vec<_> = report
        .copies
        .iter()
        .filter_map(|c| match &c.outcome {
            CopyOutcome::Failed(e) => Some((c, e)),
            _ => None,
        })
        .collect();
    if !failures.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Errors:");
        for (c, e) in failures {
            let _ = writeln!(out, "  - {}: {}", c.source.display(), e);
        }
    }

    let _ = writeln!(out);
    let status = if report.has_failures() {
        "COMPLETED WITH ERRORS"
    } else {
        "OK"
    };
    let _ = writeln!(out, "Status: {}", status);
    out
}
