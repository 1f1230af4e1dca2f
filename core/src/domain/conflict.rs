//! Conflict report domain models.
//!
//! Field names serialize in camelCase so the JSON report matches what the
//! web front end renders.

use serde::{Deserialize, Serialize};

// ============================================================================
// PortChange
// ============================================================================

/// One host port reassignment applied to a service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortChange {
    /// Service whose mapping was rewritten.
    pub service: String,
    /// Host port before the fix.
    pub old_port: String,
    /// Host port after the fix.
    pub new_port: String,
}

impl PortChange {
    pub fn new(
        service: impl Into<String>,
        old_port: impl Into<String>,
        new_port: impl Into<String>,
    ) -> Self {
        Self {
            service: service.into(),
            old_port: old_port.into(),
            new_port: new_port.into(),
        }
    }
}

impl std::fmt::Display for PortChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} → {}", self.service, self.old_port, self.new_port)
    }
}

// ============================================================================
// PortConflict
// ============================================================================

/// A host port claimed by more than one service, and how it was resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortConflict {
    /// The contested host port.
    pub port: String,
    /// Every claimant of the port, in document order. Mappings outside any
    /// service appear as `"unknown"`, once per mapping.
    pub affected_services: Vec<String>,
    /// The service that keeps the port (always the first one).
    pub kept_service: String,
    /// Reassignments that were actually applied.
    pub changes: Vec<PortChange>,
}

impl PortConflict {
    /// Whether every claimant after the kept one received a new port.
    ///
    /// A conflict can be detected without being fixable, e.g. when one of
    /// the claimants sits outside any named service block.
    pub fn is_resolved(&self) -> bool {
        self.affected_services
            .iter()
            .skip(1)
            .all(|service| self.changes.iter().any(|c| &c.service == service))
    }

    /// Human-readable summary: one header line plus one line per change.
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Port {} was used by: {}",
            self.port,
            self.affected_services.join(", ")
        );
        for change in &self.changes {
            summary.push_str(&format!("\n  → Changed {}", change));
        }
        summary
    }
}

// ============================================================================
// PortConflictsResult
// ============================================================================

/// Overall conflict report for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortConflictsResult {
    /// Number of reassignments applied to the document.
    pub fixed_count: usize,
    /// One human-readable entry per conflicting host port.
    pub conflict_summaries: Vec<String>,
    /// One structured entry per conflicting host port.
    pub detailed_conflicts: Vec<PortConflict>,
}

impl PortConflictsResult {
    /// Build a report from resolved conflicts.
    pub fn from_conflicts(conflicts: Vec<PortConflict>) -> Self {
        Self {
            fixed_count: conflicts.iter().map(|c| c.changes.len()).sum(),
            conflict_summaries: conflicts.iter().map(PortConflict::summary).collect(),
            detailed_conflicts: conflicts,
        }
    }

    /// Conflicts that were detected but could not be fully fixed.
    pub fn unresolved(&self) -> impl Iterator<Item = &PortConflict> {
        self.detailed_conflicts.iter().filter(|c| !c.is_resolved())
    }
}

// ============================================================================
// FixOutcome
// ============================================================================

/// Output of the conflict engine: the patched document and its report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixOutcome {
    /// Document text with conflicting host ports reassigned.
    pub fixed_content: String,
    /// `None` when no host port is shared between services.
    pub conflicts: Option<PortConflictsResult>,
}

impl FixOutcome {
    /// Outcome for a document with nothing to fix.
    pub fn unchanged(content: impl Into<String>) -> Self {
        Self {
            fixed_content: content.into(),
            conflicts: None,
        }
    }

    pub fn has_conflicts(&self) -> bool {
        self.conflicts.is_some()
    }

    /// Number of reassignments applied (0 when there were no conflicts).
    pub fn fixed_count(&self) -> usize {
        self.conflicts.as_ref().map_or(0, |c| c.fixed_count)
    }
}
