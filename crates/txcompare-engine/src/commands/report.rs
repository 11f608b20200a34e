//! Human-readable end-of-run report.

use std::fmt::Write;
use txcompare_core::model::{Category, Summary};

const CATEGORY_ORDER: [Category; 8] = [
    Category::DevCrashOnValid,
    Category::ResultDisagrees,
    Category::DevCrashOnError,
    Category::MissingResource,
    Category::StatusMismatch,
    Category::ParseError,
    Category::ContentDiffers,
    Category::Ok,
];

/// Render the console report for a finished run.
///
/// Categories are listed in priority order, operations alphabetically;
/// zero counts are omitted.
pub fn render_report(summary: &Summary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Comparison complete.");
    let _ = writeln!(out, "  Total records: {}", summary.total_records);
    if summary.invalid_lines > 0 {
        let _ = writeln!(out, "  Invalid lines: {}", summary.invalid_lines);
    }
    let _ = writeln!(out, "  Skipped (tolerance rules): {}", summary.skipped);
    for (reason, count) in &summary.skipped_reasons {
        let _ = writeln!(out, "    {}: {}", reason, count);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Category breakdown:");
    for category in CATEGORY_ORDER {
        let count = summary.category_count(category);
        if count == 0 {
            continue;
        }
        if category == Category::Ok {
            let _ = writeln!(out, "  OK: {}", count);
        } else {
            let _ = writeln!(
                out,
                "  {} {}: {}",
                category.priority().as_str(),
                category,
                count
            );
        }
    }
    let ok = &summary.ok_breakdown;
    if summary.category_count(Category::Ok) > 0 {
        let _ = writeln!(
            out,
            "    OK by band: strict={}, equiv-autofix={}, temp-tolerance={}",
            ok.strict, ok.equiv_autofix, ok.temp_tolerance
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Operation breakdown:");
    for (op, counts) in &summary.operation_breakdown {
        let parts: Vec<String> = counts
            .iter()
            .map(|(category, count)| format!("{}={}", category, count))
            .collect();
        let _ = writeln!(out, "  {}: {}", op, parts.join(", "));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use txcompare_core::classify::Operation;
    use txcompare_core::model::{EscalationBand, Outcome, RuleKind};
    use txcompare_core_types::RunId;

    #[test]
    fn test_report_lists_priorities_and_operations() {
        let mut summary = Summary::new("job", RunId::new(), "t", "d");
        summary.record(
            Operation::ValidateCode,
            &Outcome::DevCrashOnValid {
                prod_status: 200,
                dev_status: 500,
            },
        );
        summary.record(
            Operation::Expand,
            &Outcome::Ok {
                band: EscalationBand::TempTolerance,
            },
        );
        summary.record(
            Operation::Metadata,
            &Outcome::Skip {
                reason: "skip-metadata-ops".to_string(),
                kind: RuleKind::EquivAutofix,
            },
        );

        let report = render_report(&summary);
        assert!(report.contains("Total records: 3"));
        assert!(report.contains("Skipped (tolerance rules): 1"));
        assert!(report.contains("skip-metadata-ops: 1"));
        assert!(report.contains("P0 dev-crash-on-valid: 1"));
        assert!(report.contains("  OK: 1"));
        assert!(report.contains("temp-tolerance=1"));
        assert!(report.contains("  expand: OK=1"));
        assert!(report.contains("  validate-code: dev-crash-on-valid=1"));
        assert!(!report.contains("Invalid lines"));
        let p0 = report.find("dev-crash-on-valid: 1").unwrap();
        let ok = report.find("OK: 1").unwrap();
        assert!(p0 < ok);
    }
}
