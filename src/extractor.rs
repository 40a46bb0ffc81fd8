use std::ops::Range;

use regex::bytes::{CaptureMatches, Regex};

use crate::error::Result;

/// A SQL-tagged fenced region of a document.
///
/// `open` and `close` include the whitespace next to the fences, so that
/// `body` starts and ends with non-whitespace whenever it is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock<'a> {
    pub span: Range<usize>,
    pub open: &'a [u8],
    pub body: &'a [u8],
    pub close: &'a [u8],
}

/// Locates fenced SQL blocks lexically. Everything outside a match is
/// ordinary text and never touched.
#[derive(Debug, Clone)]
pub struct BlockExtractor {
    pattern: Regex,
}

impl BlockExtractor {
    pub fn new(fence: &str) -> Result<Self> {
        let fence = regex::escape(fence);
        // (?is-u) = case-insensitive + dot-matches-newline, byte-oriented
        let pattern = Regex::new(&format!(r"(?is-u)({fence}.?sql\s*)(.*?)(\s*{fence})"))?;
        Ok(Self { pattern })
    }

    /// Lazily iterate over the SQL blocks of `text`, in document order.
    pub fn blocks<'r, 'a>(&'r self, text: &'a [u8]) -> Blocks<'r, 'a> {
        Blocks {
            captures: self.pattern.captures_iter(text),
        }
    }
}

pub struct Blocks<'r, 'a> {
    captures: CaptureMatches<'r, 'a>,
}

impl<'a> Iterator for Blocks<'_, 'a> {
    type Item = CodeBlock<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let caps = self.captures.next()?;
        let whole = caps.get(0)?;
        Some(CodeBlock {
            span: whole.range(),
            open: caps.get(1)?.as_bytes(),
            body: caps.get(2)?.as_bytes(),
            close: caps.get(3)?.as_bytes(),
        })
    }
}
