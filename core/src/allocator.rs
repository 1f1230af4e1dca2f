//! Host port allocation.
//!
//! [`PortAllocator`] is the set of host ports considered taken while a
//! document is being fixed. It starts with every host port the document
//! declares and grows with every reassignment, so a new port never lands on
//! one that is already in use or was handed out earlier in the same run.

use std::collections::BTreeSet;

/// Tracks taken host ports and hands out the next free one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortAllocator {
    taken: BTreeSet<u32>,
}

impl PortAllocator {
    /// Create an empty allocator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an allocator with the given ports already taken.
    pub fn seeded(ports: impl IntoIterator<Item = u32>) -> Self {
        Self {
            taken: ports.into_iter().collect(),
        }
    }

    /// Check whether a port is taken.
    pub fn is_taken(&self, port: u32) -> bool {
        self.taken.contains(&port)
    }

    /// Mark a port as taken. Returns `false` if it already was.
    pub fn reserve(&mut self, port: u32) -> bool {
        self.taken.insert(port)
    }

    /// Smallest port strictly greater than `port` that is not taken.
    ///
    /// Returns `None` only if the probe runs off the end of `u32`.
    pub fn next_free_after(&self, port: u32) -> Option<u32> {
        let mut candidate = port.checked_add(1)?;
        // `taken` is ordered, so walk it alongside the candidate.
        for &used in self.taken.range(candidate..) {
            if used != candidate {
                break;
            }
            candidate = candidate.checked_add(1)?;
        }
        Some(candidate)
    }
}
