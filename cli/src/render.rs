//! Text rendering of conflict reports.

use std::fmt::Write;

use portfix_core::PortConflictsResult;

/// Render the report for one file.
///
/// `applied` selects the wording: changes made (fix) versus changes that
/// would be made (check).
pub fn report(file: &str, conflicts: Option<&PortConflictsResult>, applied: bool) -> String {
    let Some(result) = conflicts else {
        return format!("{}: no port conflicts\n", file);
    };

    let mut out = String::new();
    let verb = if applied { "fixed" } else { "fixable" };
    let _ = writeln!(
        out,
        "{}: {} port conflict(s), {} {} issue(s)",
        file,
        result.detailed_conflicts.len(),
        verb,
        result.fixed_count
    );

    for conflict in &result.detailed_conflicts {
        let _ = writeln!(
            out,
            "\n  Port {} (conflicted between {} services)",
            conflict.port,
            conflict.affected_services.len()
        );

        for (idx, service) in conflict.affected_services.iter().enumerate() {
            let marker = if idx == 0 {
                "kept"
            } else if conflict.changes.iter().any(|c| &c.service == service) {
                "moved"
            } else {
                "not fixed"
            };
            let _ = writeln!(out, "    {:<10} {}", format!("[{}]", marker), service);
        }

        for change in &conflict.changes {
            let arrow = if applied { "→" } else { "would move" };
            let _ = writeln!(
                out,
                "    {} {}: {} → {}",
                arrow, change.service, change.old_port, change.new_port
            );
        }

        if !conflict.is_resolved() {
            let _ = writeln!(
                out,
                "    ! some claimants are outside a named service and were left alone"
            );
        }
    }

    out
}
