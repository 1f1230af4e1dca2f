//! Port mapping domain model.

use std::ops::Range;

// ============================================================================
// PortMapping
// ============================================================================

/// A `host:container` port pair discovered in a compose document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortMapping {
    /// Host port exactly as written (e.g. "8080").
    pub host_port: String,
    /// Container port exactly as written (e.g. "80").
    pub container_port: String,
    /// Byte offset of the list item marker (`-`) in the document.
    pub offset: usize,
    /// Byte span of the host port digits in the document.
    pub host_span: Range<usize>,
    /// 1-based line number.
    pub line: usize,
}

impl PortMapping {
    /// Host port as an integer, if it fits.
    pub fn host_port_number(&self) -> Option<u32> {
        self.host_port.parse().ok()
    }
}

impl std::fmt::Display for PortMapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{} (line {})",
            self.host_port, self.container_port, self.line
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_port_number() {
        let mapping = PortMapping {
            host_port: "8080".to_string(),
            container_port: "80".to_string(),
            offset: 0,
            host_span: 3..7,
            line: 1,
        };
        assert_eq!(mapping.host_port_number(), Some(8080));
        assert_eq!(mapping.to_string(), "8080:80 (line 1)");

        let huge = PortMapping {
            host_port: "99999999999".to_string(),
            ..mapping
        };
        assert_eq!(huge.host_port_number(), None);
    }
}
