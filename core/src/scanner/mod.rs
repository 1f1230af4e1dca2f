//! Port mapping scanner.
//!
//! Finds every `- host:container` list item in a compose document, quoted
//! with `"`/`'` or bare, and reports where the host port digits sit so the
//! rewrite step can replace exactly those bytes.

mod lines;

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::PortMapping;

pub use lines::{tokenize, Line};

/// `<digits>:<digits>` at the start of a list item value, optionally quoted.
static PORT_MAPPING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^["']?(\d+):(\d+)"#).expect("port mapping pattern is valid")
});

/// Extract a port mapping from a tokenized line, if it declares one.
pub fn mapping_from_line(line: &Line<'_>) -> Option<PortMapping> {
    if !line.is_list_item {
        return None;
    }

    let caps = PORT_MAPPING.captures(line.value)?;
    let host = caps.get(1)?;
    let container = caps.get(2)?;

    Some(PortMapping {
        host_port: host.as_str().to_string(),
        container_port: container.as_str().to_string(),
        offset: line.start + line.indent,
        host_span: line.value_start + host.start()..line.value_start + host.end(),
        line: line.number,
    })
}

/// Lazily scan a document for port mappings, in document order.
///
/// The iterator borrows `text` and can be recreated at will; scanning the
/// same text twice yields the same sequence.
pub fn scan(text: &str) -> impl Iterator<Item = PortMapping> + '_ {
    tokenize(text).filter_map(|line| mapping_from_line(&line))
}
