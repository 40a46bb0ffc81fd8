use crate::error::Result;
use crate::extractor::{BlockExtractor, CodeBlock};
use crate::format::SqlFormatter;
use crate::mode::Mode;
use crate::skip::SkipList;
use crate::splitter::StatementSplitter;

/// Rewrites the SQL blocks of one document, leaving every other byte alone.
///
/// Built once per run; holds only compiled patterns and read-only tables.
#[derive(Debug)]
pub struct DocumentRewriter {
    extractor: BlockExtractor,
    splitter: StatementSplitter,
    formatter: SqlFormatter,
}

impl DocumentRewriter {
    pub fn new(mode: &Mode) -> Result<Self> {
        mode.validate()?;
        Ok(Self {
            extractor: BlockExtractor::new(&mode.fence)?,
            splitter: StatementSplitter::new(&mode.continuation_marker)?,
            formatter: SqlFormatter::new(
                mode.dialect()?,
                mode.pretty,
                SkipList::with_extra(&mode.skip),
            ),
        })
    }

    /// Return the rewritten document. Callers compare against `source` to
    /// decide whether anything needs writing.
    pub fn rewrite(&self, source: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(source.len());
        let mut last = 0;
        for block in self.extractor.blocks(source) {
            out.extend_from_slice(&source[last..block.span.start]);
            self.rewrite_block(&block, &mut out);
            last = block.span.end;
        }
        out.extend_from_slice(&source[last..]);
        out
    }

    fn rewrite_block(&self, block: &CodeBlock<'_>, out: &mut Vec<u8>) {
        out.extend_from_slice(block.open);
        let statements = self.splitter.split(block.body);
        let pieces = statements.iter().map(|stmt| {
            let mut piece = Vec::with_capacity(stmt.core.len() + 1);
            self.formatter.write_statement(stmt, &mut piece);
            piece
        });
        self.splitter.join(pieces, out);
        out.extend_from_slice(block.close);
    }
}
