//! Service attribution.
//!
//! Walks the tokenized document once and records the byte span of every
//! service block, so each port mapping can be attributed to the service
//! that encloses it.
//!
//! A service is a `name:` line indented by exactly two spaces. Its block
//! runs until the next such declaration, the next top-level `services:`
//! header, or the end of the document. Declarations before any `services:`
//! header still count, which keeps header-less documents usable.

use std::ops::Range;

use crate::scanner::tokenize;

/// Owner name used for mappings outside any service block.
pub const UNKNOWN_SERVICE: &str = "unknown";

/// The text span owned by one service declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceBlock {
    /// Service name as declared.
    pub name: String,
    /// Half-open byte span from the declaration line to the next sibling.
    pub span: Range<usize>,
}

impl ServiceBlock {
    pub fn contains(&self, offset: usize) -> bool {
        self.span.contains(&offset)
    }
}

/// All service blocks of a document, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceIndex {
    blocks: Vec<ServiceBlock>,
}

impl ServiceIndex {
    /// Build the index for a document.
    pub fn build(text: &str) -> Self {
        let mut blocks = Vec::new();
        let mut open: Option<ServiceBlock> = None;

        for line in tokenize(text) {
            if line.is_services_header() {
                // A new section restarts attribution.
                if let Some(mut block) = open.take() {
                    block.span.end = line.start;
                    blocks.push(block);
                }
            } else if line.is_service_declaration() {
                if let Some(mut block) = open.take() {
                    block.span.end = line.start;
                    blocks.push(block);
                }
                open = line.key.map(|name| ServiceBlock {
                    name: name.to_string(),
                    span: line.start..text.len(),
                });
            }
        }

        blocks.extend(open);
        tracing::trace!(services = blocks.len(), "indexed service blocks");

        Self { blocks }
    }

    /// The service block enclosing `offset`, if any.
    pub fn owner_of(&self, offset: usize) -> Option<&ServiceBlock> {
        let idx = self.blocks.partition_point(|b| b.span.start <= offset);
        let block = self.blocks.get(idx.checked_sub(1)?)?;
        block.contains(offset).then_some(block)
    }
}
