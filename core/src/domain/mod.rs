//! Domain layer - Pure data models for port mappings and conflict reports.
//!
//! These types have no I/O dependencies and can be tested in isolation.

mod conflict;
mod mapping;

// Re-export all domain types
pub use conflict::{FixOutcome, PortChange, PortConflict, PortConflictsResult};
pub use mapping::PortMapping;
