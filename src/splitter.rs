use regex::bytes::Regex;
use smallvec::SmallVec;

use crate::error::Result;

/// One statement of a code block, split into the whitespace around it and
/// the text handed to the SQL parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Statement<'a> {
    pub index: usize,
    pub leading: &'a [u8],
    pub core: &'a [u8],
    pub trailing: &'a [u8],
}

impl<'a> Statement<'a> {
    /// Separate leading and trailing ASCII whitespace from `raw`.
    pub fn new(index: usize, raw: &'a [u8]) -> Self {
        let start = raw
            .iter()
            .position(|b| !b.is_ascii_whitespace())
            .unwrap_or(raw.len());
        let end = raw
            .iter()
            .rposition(|b| !b.is_ascii_whitespace())
            .map_or(start, |i| i + 1);
        Self {
            index,
            leading: &raw[..start],
            core: &raw[start..end],
            trailing: &raw[end..],
        }
    }

    /// The statement exactly as it appeared in the block.
    pub fn write_raw(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.leading);
        out.extend_from_slice(self.core);
        out.extend_from_slice(self.trailing);
    }
}

/// Splits block bodies on lines starting with the continuation marker.
#[derive(Debug, Clone)]
pub struct StatementSplitter {
    marker: Vec<u8>,
    pattern: Regex,
}

impl StatementSplitter {
    pub fn new(marker: &str) -> Result<Self> {
        let pattern = Regex::new(&format!(r"(?m-u)^{}", regex::escape(marker)))?;
        Ok(Self {
            marker: marker.as_bytes().to_vec(),
            pattern,
        })
    }

    /// Split `body` into statements. The marker is consumed; a body without
    /// markers is a single statement.
    pub fn split<'a>(&self, body: &'a [u8]) -> SmallVec<[Statement<'a>; 4]> {
        self.pattern
            .split(body)
            .enumerate()
            .map(|(index, raw)| Statement::new(index, raw))
            .collect()
    }

    /// Concatenate statement texts, putting the marker back before every
    /// statement except the first.
    pub fn join<I, T>(&self, pieces: I, out: &mut Vec<u8>)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        for (i, piece) in pieces.into_iter().enumerate() {
            if i > 0 {
                out.extend_from_slice(&self.marker);
            }
            out.extend_from_slice(piece.as_ref());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splitter() -> StatementSplitter {
        StatementSplitter::new(">").unwrap()
    }

    #[test]
    fn test_single_statement_without_markers() {
        let stmts = splitter().split(b"select 1\nfrom t");
        assert_eq!(stmts.len(), 1);
        assert_eq!(stmts[0].core, b"select 1\nfrom t");
    }

    #[test]
    fn test_split_on_line_leading_marker() {
        let stmts = splitter().split(b"select 1\n> select 2\n> select 3");
        assert_eq!(stmts.len(), 3);
        assert_eq!(stmts[0].core, b"select 1");
        assert_eq!(stmts[0].trailing, b"\n");
        assert_eq!(stmts[1].leading, b" ");
        assert_eq!(stmts[1].core, b"select 2");
        assert_eq!(stmts[2].index, 2);
        assert_eq!(stmts[2].core, b"select 3");
    }

    #[test]
    fn test_marker_at_body_start_yields_empty_first_statement() {
        let stmts = splitter().split(b"> select 1");
        assert_eq!(stmts.len(), 2);
        assert!(stmts[0].core.is_empty());
        assert_eq!(stmts[1].core, b"select 1");
    }

    #[test]
    fn test_mid_line_marker_is_not_a_separator() {
        let stmts = splitter().split(b"select a > b from t");
        assert_eq!(stmts.len(), 1);
    }

    #[test]
    fn test_whitespace_only_statement() {
        let stmt = Statement::new(0, b" \n ");
        assert_eq!(stmt.leading, b" \n ");
        assert!(stmt.core.is_empty());
        assert!(stmt.trailing.is_empty());
    }

    #[test]
    fn test_join_round_trips_raw_split() {
        let s = splitter();
        let body: &[u8] = b"select 1;\n> select 2;\n>  select 3";
        let mut out = Vec::new();
        s.join(
            s.split(body).iter().map(|stmt| {
                let mut raw = Vec::new();
                stmt.write_raw(&mut raw);
                raw
            }),
            &mut out,
        );
        assert_eq!(out, body);
    }

    #[test]
    fn test_multi_character_marker() {
        let s = StatementSplitter::new("sql>").unwrap();
        let stmts = s.split(b"select 1\nsql> select 2");
        assert_eq!(stmts.len(), 2);

        let mut out = Vec::new();
        s.join(["a\n", " b"], &mut out);
        assert_eq!(out, b"a\nsql> b");
    }
}
