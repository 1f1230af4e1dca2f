//! Targeted text rewriting.
//!
//! Edits are recorded against byte spans of the original, unmodified text
//! and applied together in one left-to-right pass. Everything outside the
//! edited spans is copied through untouched.

use std::ops::Range;

/// A replacement of one byte span of the original text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub span: Range<usize>,
    pub replacement: String,
}

/// An ordered, non-overlapping set of edits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditList {
    edits: Vec<Edit>,
}

impl EditList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an edit. Returns `false` (and records nothing) if the span
    /// overlaps an edit already recorded.
    pub fn push(&mut self, span: Range<usize>, replacement: impl Into<String>) -> bool {
        let idx = self.edits.partition_point(|e| e.span.start < span.start);

        let overlaps_prev = idx > 0 && self.edits[idx - 1].span.end > span.start;
        let overlaps_next = self
            .edits
            .get(idx)
            .is_some_and(|next| next.span.start < span.end || next.span.start == span.start);
        if overlaps_prev || overlaps_next {
            return false;
        }

        self.edits.insert(
            idx,
            Edit {
                span,
                replacement: replacement.into(),
            },
        );
        true
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Edit> {
        self.edits.iter()
    }

    /// Apply all edits to `original`.
    ///
    /// Spans refer to `original`; the running `delta` translates them into
    /// positions in the partially rewritten output.
    pub fn apply(&self, original: &str) -> String {
        let mut output = original.to_string();
        let mut delta: isize = 0;

        for edit in &self.edits {
            let start = edit.span.start.saturating_add_signed(delta);
            let end = edit.span.end.saturating_add_signed(delta);
            output.replace_range(start..end, &edit.replacement);
            delta += edit.replacement.len() as isize - edit.span.len() as isize;
        }

        output
    }
}
