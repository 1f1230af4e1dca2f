//! Conflict engine - detection and repair of shared host ports.
//!
//! The engine is a pure function of the document text:
//!
//! 1. scan every `host:container` list item,
//! 2. attribute each one to its enclosing service,
//! 3. group mappings by host port and keep the first claimant of each port,
//! 4. move every other claimant to the next free port,
//! 5. patch only the affected host port digits and build the report.
//!
//! A conflict that cannot be patched (for instance when a claimant sits
//! outside any named service) is still reported, with fewer changes.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::allocator::PortAllocator;
use crate::domain::{FixOutcome, PortChange, PortConflict, PortConflictsResult, PortMapping};
use crate::rewrite::EditList;
use crate::scanner;
use crate::services::{ServiceIndex, UNKNOWN_SERVICE};

/// A scanned mapping together with the service that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
struct OwnedMapping {
    mapping: PortMapping,
    /// `None` when the mapping is outside every service block.
    service: Option<String>,
}

/// Mappings that share one host port value.
#[derive(Debug, Clone, PartialEq, Eq)]
struct HostPortGroup<'a> {
    port: &'a str,
    /// Claimants in scan order. Named services appear once; `None` is a
    /// mapping outside every service and is never merged with another.
    claimants: Vec<Option<&'a str>>,
    /// Indices into the mapping list, in scan order.
    occurrences: Vec<usize>,
}

impl HostPortGroup<'_> {
    fn is_conflict(&self) -> bool {
        self.claimants.len() > 1
    }

    fn keeper(&self) -> Option<&str> {
        self.claimants[0]
    }
}

fn display_name(claimant: Option<&str>) -> String {
    claimant.unwrap_or(UNKNOWN_SERVICE).to_string()
}

/// Detects and repairs host port conflicts in compose documents.
///
/// Stateless; one engine can serve any number of documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictEngine;

impl ConflictEngine {
    /// Create a new engine.
    pub fn new() -> Self {
        Self
    }

    /// Detect shared host ports and rewrite all but the first claimant.
    pub fn fix(&self, content: &str) -> FixOutcome {
        let mappings = self.attribute(content);
        debug!(mappings = mappings.len(), "scanned port mappings");

        let groups: Vec<HostPortGroup> = group_by_host_port(&mappings)
            .into_iter()
            .filter(HostPortGroup::is_conflict)
            .collect();

        if groups.is_empty() {
            return FixOutcome::unchanged(content);
        }

        let mut allocator = PortAllocator::seeded(
            mappings
                .iter()
                .filter_map(|owned| owned.mapping.host_port_number()),
        );
        let mut edits = EditList::new();

        let conflicts: Vec<PortConflict> = groups
            .iter()
            .map(|group| resolve(group, &mappings, &mut allocator, &mut edits))
            .collect();

        let report = PortConflictsResult::from_conflicts(conflicts);
        debug!(
            conflicts = report.detailed_conflicts.len(),
            fixed = report.fixed_count,
            "resolved host port conflicts"
        );

        FixOutcome {
            fixed_content: edits.apply(content),
            conflicts: Some(report),
        }
    }

    /// Report conflicts only, discarding the rewritten document.
    pub fn check(&self, content: &str) -> Option<PortConflictsResult> {
        self.fix(content).conflicts
    }

    /// Scan a document and attribute every mapping to its service.
    fn attribute(&self, content: &str) -> Vec<OwnedMapping> {
        let services = ServiceIndex::build(content);

        scanner::scan(content)
            .map(|mapping| {
                let service = services
                    .owner_of(mapping.offset)
                    .map(|block| block.name.clone());
                trace!(
                    mapping = %mapping,
                    service = service.as_deref().unwrap_or(UNKNOWN_SERVICE),
                    "attributed port mapping"
                );
                OwnedMapping { mapping, service }
            })
            .collect()
    }
}

/// Convenience wrapper around [`ConflictEngine::fix`].
pub fn detect_and_fix_port_conflicts(content: &str) -> FixOutcome {
    ConflictEngine::new().fix(content)
}

/// Group mappings by literal host port, preserving first-seen order.
///
/// A service that declares the same host port twice is one claimant.
fn group_by_host_port(mappings: &[OwnedMapping]) -> Vec<HostPortGroup<'_>> {
    let mut groups: Vec<HostPortGroup<'_>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for (i, owned) in mappings.iter().enumerate() {
        let port = owned.mapping.host_port.as_str();
        let slot = *index.entry(port).or_insert_with(|| {
            groups.push(HostPortGroup {
                port,
                claimants: Vec::new(),
                occurrences: Vec::new(),
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        let owner = owned.service.as_deref();
        if owner.is_none() || !group.claimants.contains(&owner) {
            group.claimants.push(owner);
        }
        group.occurrences.push(i);
    }

    groups
}

/// Reassign every non-keeper occurrence in a conflicting group.
fn resolve(
    group: &HostPortGroup,
    mappings: &[OwnedMapping],
    allocator: &mut PortAllocator,
    edits: &mut EditList,
) -> PortConflict {
    let keeper = group.keeper();
    debug!(port = group.port, claimants = ?group.claimants, ?keeper, "host port conflict");

    let mut changes = Vec::new();
    for owned in group.occurrences.iter().map(|&i| &mappings[i]) {
        if keeper.is_some() && owned.service.as_deref() == keeper {
            continue;
        }
        if let Some(change) = reassign(owned, allocator, edits) {
            changes.push(change);
        }
    }

    PortConflict {
        port: group.port.to_string(),
        affected_services: group.claimants.iter().copied().map(display_name).collect(),
        kept_service: display_name(keeper),
        changes,
    }
}

/// Move one mapping to the next free host port, if it can be rewritten.
fn reassign(
    owned: &OwnedMapping,
    allocator: &mut PortAllocator,
    edits: &mut EditList,
) -> Option<PortChange> {
    let mapping = &owned.mapping;

    let Some(service) = owned.service.as_deref() else {
        debug!(line = mapping.line, port = %mapping.host_port, "mapping outside any service, skipping");
        return None;
    };
    let Some(old_port) = mapping.host_port_number() else {
        debug!(line = mapping.line, port = %mapping.host_port, "host port is not a number, skipping");
        return None;
    };
    let Some(new_port) = allocator.next_free_after(old_port) else {
        debug!(line = mapping.line, port = old_port, "no free port above, skipping");
        return None;
    };

    if !edits.push(mapping.host_span.clone(), new_port.to_string()) {
        debug!(line = mapping.line, service, "mapping already rewritten, skipping");
        return None;
    }
    allocator.reserve(new_port);

    debug!(
        service,
        old_port,
        new_port,
        line = mapping.line,
        "reassigned host port"
    );
    Some(PortChange::new(service, &mapping.host_port, new_port.to_string()))
}
