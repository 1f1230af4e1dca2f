//! Line tokenizer for indentation-based compose text.
//!
//! Each physical line becomes a [`Line`] record carrying its byte offset,
//! indentation, and a shallow classification (mapping key, list item, or
//! neither). Nothing here understands YAML beyond what a single line shows.

use std::sync::LazyLock;

use regex::Regex;

/// `key:` optionally followed by an inline value or a comment.
static KEY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9_-]+):(?:(\s.*)|(#.*))?$").expect("key line pattern is valid")
});

/// A tokenized line of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line<'a> {
    /// 1-based line number.
    pub number: usize,
    /// Byte offset of the first character of the line.
    pub start: usize,
    /// Line text without the line terminator.
    pub text: &'a str,
    /// Number of leading spaces.
    pub indent: usize,
    /// Mapping key, for `key:` lines.
    pub key: Option<&'a str>,
    /// Whether the line is a sequence entry (`- value`).
    pub is_list_item: bool,
    /// Inline value: text after `key:` or after `- `, trimmed. Comment-only
    /// tails count as no value.
    pub value: &'a str,
    /// Byte offset of `value` in the document.
    pub value_start: usize,
}

impl<'a> Line<'a> {
    /// Tokenize one raw line (with or without its `\n`).
    pub fn parse(number: usize, start: usize, raw: &'a str) -> Self {
        let text = raw.strip_suffix('\n').unwrap_or(raw);
        let text = text.strip_suffix('\r').unwrap_or(text);

        let indent = text.len() - text.trim_start_matches(' ').len();
        let rest = &text[indent..];

        let mut line = Self {
            number,
            start,
            text,
            indent,
            key: None,
            is_list_item: false,
            value: "",
            value_start: start + indent,
        };

        if let Some(item) = rest.strip_prefix('-') {
            if item.is_empty() || item.starts_with([' ', '\t']) {
                let value = item.trim_start();
                line.is_list_item = true;
                line.value_start = start + text.len() - value.len();
                line.value = value.trim_end();
            }
            return line;
        }

        if let Some(caps) = KEY_LINE.captures(rest) {
            line.key = caps.get(1).map(|m| m.as_str());
            if let Some(inline) = caps.get(2) {
                let value = inline.as_str().trim_start();
                if !value.starts_with('#') {
                    line.value_start = start + indent + inline.end() - value.len();
                    line.value = value.trim_end();
                }
            }
        }

        line
    }

    /// A `key:` line with nothing but an optional comment after the colon.
    pub fn opens_block(&self) -> bool {
        self.key.is_some() && self.value.is_empty()
    }

    /// Top-level `services:` section header.
    pub fn is_services_header(&self) -> bool {
        self.indent == 0 && self.key == Some("services") && self.opens_block()
    }

    /// Service declaration: exactly two spaces, an identifier, a colon.
    pub fn is_service_declaration(&self) -> bool {
        self.indent == 2 && self.opens_block()
    }
}

/// Tokenize a whole document, first line to last.
pub fn tokenize(text: &str) -> impl Iterator<Item = Line<'_>> + '_ {
    let mut start = 0;
    text.split_inclusive('\n')
        .enumerate()
        .map(move |(index, raw)| {
            let line = Line::parse(index + 1, start, raw);
            start += raw.len();
            line
        })
}
