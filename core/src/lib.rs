//! portfix Core Library
//!
//! Detects Docker Compose services that publish the same host port and
//! rewrites the document so every service gets a unique one, without
//! touching anything else in the file (comments, ordering, quoting).
//!
//! # Architecture
//! - `scanner`: line tokenizer and `host:container` mapping scanner
//! - `services`: attributes mappings to their enclosing service block
//! - `allocator`: hands out the next free host port
//! - `rewrite`: edit list applied to the original text in one pass
//! - `engine`: ties the above together and builds the report
//! - `domain`: report and mapping data models
//! - `config` / `file`: settings and compose-file I/O for front ends
//!
//! The engine does not parse YAML. It relies on the compose convention of
//! declaring services at exactly two spaces of indentation below a
//! top-level `services:` key.
//!
//! ```
//! use portfix_core::detect_and_fix_port_conflicts;
//!
//! let compose = "services:\n  a:\n    ports:\n      - \"8080:80\"\n  b:\n    ports:\n      - \"8080:80\"\n";
//! let outcome = detect_and_fix_port_conflicts(compose);
//! assert!(outcome.fixed_content.contains("\"8081:80\""));
//! assert_eq!(outcome.fixed_count(), 1);
//! ```

pub mod allocator;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod file;
pub mod rewrite;
pub mod scanner;
pub mod services;

// Re-export domain types (primary API)
pub use domain::{FixOutcome, PortChange, PortConflict, PortConflictsResult, PortMapping};

// Re-export other commonly used types
pub use allocator::PortAllocator;
pub use config::{Config, ConfigStore};
pub use engine::{detect_and_fix_port_conflicts, ConflictEngine};
pub use error::{Error, Result};
pub use file::{BackupPolicy, ComposeFile};
pub use services::{ServiceIndex, UNKNOWN_SERVICE};
