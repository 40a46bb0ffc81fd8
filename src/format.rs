use sqlparser::ast::Statement as SqlStatement;
use sqlparser::dialect::Dialect;
use sqlparser::parser::Parser;

use crate::mode::PrettyConfig;
use crate::skip::SkipList;
use crate::splitter::Statement;

/// Indentation unit emitted by sqlparser's alternate (`{:#}`) rendering.
const ENGINE_INDENT: usize = 2;

/// Result of trying to reformat one statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatOutcome {
    /// Canonical text, terminated with `;`.
    Reformatted(String),
    /// Emit the statement exactly as written.
    Verbatim,
}

/// Wraps the sqlparser parse and render pair.
#[derive(Debug)]
pub struct SqlFormatter {
    dialect: Box<dyn Dialect>,
    pretty: PrettyConfig,
    skip: SkipList,
}

impl SqlFormatter {
    pub fn new(dialect: Box<dyn Dialect>, pretty: PrettyConfig, skip: SkipList) -> Self {
        Self {
            dialect,
            pretty,
            skip,
        }
    }

    /// Decide the fate of a statement's core text. Parse failures are an
    /// ordinary outcome here: many documentation snippets are partial.
    pub fn format_core(&self, core: &[u8]) -> FormatOutcome {
        if self.skip.should_skip(core) {
            return FormatOutcome::Verbatim;
        }
        // Skipped text is the only place non-ASCII can appear.
        let Ok(sql) = std::str::from_utf8(core) else {
            return FormatOutcome::Verbatim;
        };
        match Parser::parse_sql(self.dialect.as_ref(), sql) {
            Ok(statements) if statements.len() == 1 => {
                let mut rendered = render(&statements[0], &self.pretty);
                rendered.push(';');
                FormatOutcome::Reformatted(rendered)
            }
            _ => FormatOutcome::Verbatim,
        }
    }

    /// Append the output text for `stmt` to `out`: either the original text,
    /// or the reformatted core wrapped in the original whitespace.
    pub fn write_statement(&self, stmt: &Statement<'_>, out: &mut Vec<u8>) {
        match self.format_core(stmt.core) {
            FormatOutcome::Reformatted(text) => {
                out.extend_from_slice(stmt.leading);
                out.extend_from_slice(text.as_bytes());
                out.extend_from_slice(stmt.trailing);
            }
            FormatOutcome::Verbatim => stmt.write_raw(out),
        }
    }
}

/// Render a parsed statement. The single-line form is kept when it fits;
/// otherwise the engine's multi-line layout is re-indented to `pretty`.
pub fn render(statement: &SqlStatement, pretty: &PrettyConfig) -> String {
    let compact = statement.to_string();
    // A newline here comes from a literal; re-indenting would alter it.
    if compact.contains('\n') || compact.chars().count() <= pretty.line_width {
        return compact;
    }
    let layout = trim_line_ends(&format!("{statement:#}"));
    if !pretty.use_tabs && pretty.indent_width == ENGINE_INDENT {
        return layout;
    }
    reindent(&layout, pretty)
}

/// Drop spaces the engine leaves at the end of layout lines.
fn trim_line_ends(text: &str) -> String {
    text.split('\n')
        .map(|line| line.trim_end_matches(' '))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Rewrite leading indentation from the engine's unit to the configured one.
fn reindent(text: &str, pretty: &PrettyConfig) -> String {
    let unit = if pretty.use_tabs {
        "\t".to_string()
    } else {
        " ".repeat(pretty.indent_width)
    };
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let rest = line.trim_start_matches(' ');
        let width = line.len() - rest.len();
        for _ in 0..width / ENGINE_INDENT {
            out.push_str(&unit);
        }
        for _ in 0..width % ENGINE_INDENT {
            out.push(' ');
        }
        out.push_str(rest);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlparser::dialect::PostgreSqlDialect;

    fn formatter() -> SqlFormatter {
        SqlFormatter::new(
            Box::new(PostgreSqlDialect {}),
            PrettyConfig::default(),
            SkipList::default(),
        )
    }

    fn reformatted(sql: &str) -> String {
        match formatter().format_core(sql.as_bytes()) {
            FormatOutcome::Reformatted(text) => text,
            FormatOutcome::Verbatim => unreachable!("{sql} should have been reformatted"),
        }
    }

    #[test]
    fn test_simple_select_gets_separator() {
        assert_eq!(reformatted("select   1"), "SELECT 1;");
    }

    #[test]
    fn test_existing_separator_not_doubled() {
        assert_eq!(reformatted("SELECT 1;"), "SELECT 1;");
    }

    #[test]
    fn test_skipped_statement_is_verbatim() {
        assert_eq!(formatter().format_core(b"BEGIN;"), FormatOutcome::Verbatim);
    }

    #[test]
    fn test_parse_failure_is_verbatim() {
        assert_eq!(
            formatter().format_core(b"select * from"),
            FormatOutcome::Verbatim
        );
        assert_eq!(
            formatter().format_core(b"this is not sql"),
            FormatOutcome::Verbatim
        );
    }

    #[test]
    fn test_multiple_statements_are_verbatim() {
        assert_eq!(
            formatter().format_core(b"select 1; select 2"),
            FormatOutcome::Verbatim
        );
    }

    #[test]
    fn test_empty_core_is_verbatim() {
        assert_eq!(formatter().format_core(b""), FormatOutcome::Verbatim);
    }

    #[test]
    fn test_write_statement_keeps_whitespace() {
        let stmt = Statement::new(1, b" select 1 \n");
        let mut out = Vec::new();
        formatter().write_statement(&stmt, &mut out);
        assert_eq!(out, b" SELECT 1; \n");
    }

    #[test]
    fn test_write_statement_verbatim_on_failure() {
        let stmt = Statement::new(0, b"  select (1\n");
        let mut out = Vec::new();
        formatter().write_statement(&stmt, &mut out);
        assert_eq!(out, b"  select (1\n");
    }

    #[test]
    fn test_long_statement_is_laid_out() {
        let sql = "select first_column_name, second_column_name, third_column_name \
                   from some_rather_long_table_name where first_column_name = 1";
        let text = reformatted(sql);
        assert!(text.contains('\n'), "expected multi-line layout: {text}");
        assert!(text.ends_with(';'));
        assert!(!text.contains('\t'));
        // Formatting is stable under a second pass.
        assert_eq!(reformatted(&text), text);
    }

    #[test]
    fn test_long_create_table_has_no_trailing_spaces() {
        let sql = "create table users (id uuid primary key default gen_random_uuid(), \
                   name string not null, email string unique)";
        let text = reformatted(sql);
        assert!(text.contains('\n'), "expected multi-line layout: {text}");
        let trailing: Vec<_> = text.lines().filter(|l| l.ends_with(' ')).collect();
        assert!(trailing.is_empty(), "lines with trailing spaces: {trailing:?}");
    }

    #[test]
    fn test_trim_line_ends() {
        assert_eq!(
            trim_line_ends("CREATE TABLE t (\n  a INT  \n)"),
            "CREATE TABLE t (\n  a INT\n)"
        );
    }

    #[test]
    fn test_reindent_to_four_spaces() {
        let pretty = PrettyConfig {
            indent_width: 4,
            ..PrettyConfig::default()
        };
        assert_eq!(
            reindent("SELECT\n  a,\n    b\nFROM\n  t", &pretty),
            "SELECT\n    a,\n        b\nFROM\n    t"
        );
    }

    #[test]
    fn test_reindent_with_tabs_keeps_odd_remainder() {
        let pretty = PrettyConfig {
            use_tabs: true,
            ..PrettyConfig::default()
        };
        assert_eq!(reindent("SELECT\n   a", &pretty), "SELECT\n\t a");
    }
}
