use globset::Glob;
use sqlparser::dialect::{dialect_from_str, Dialect};

use crate::error::DocfmtError;

/// Layout settings handed to the pretty printer for every statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrettyConfig {
    /// Statements whose single-line rendering exceeds this width are laid
    /// out over several lines.
    pub line_width: usize,
    /// Spaces per indentation level (ignored when `use_tabs` is set).
    pub indent_width: usize,
    pub use_tabs: bool,
}

impl Default for PrettyConfig {
    fn default() -> Self {
        Self {
            line_width: 80,
            indent_width: 2,
            use_tabs: false,
        }
    }
}

/// Mode holds the full run configuration for docsqlfmt.
#[derive(Debug, Clone)]
pub struct Mode {
    pub pretty: PrettyConfig,

    /// sqlparser dialect name, e.g. `postgresql`, `mysql`, `generic`.
    pub dialect_name: String,

    /// Fence that opens and closes a code block, e.g. `~~~` or "```".
    pub fence: String,

    /// Line prefix separating statements inside one block.
    pub continuation_marker: String,

    /// Document file extensions, without the leading dot.
    pub extensions: Vec<String>,

    /// Glob patterns matched against base file names.
    pub exclude: Vec<String>,

    /// Extra substrings that force passthrough, on top of the built-in list.
    pub skip: Vec<String>,

    pub check: bool,
    pub diff: bool,
    pub verbose: bool,
    pub quiet: bool,
}

impl Mode {
    /// Create the sqlparser dialect for the configured dialect_name.
    pub fn dialect(&self) -> Result<Box<dyn Dialect>, DocfmtError> {
        dialect_from_str(&self.dialect_name)
            .ok_or_else(|| DocfmtError::Config(format!("Unknown dialect: {}", self.dialect_name)))
    }

    /// Whether documents may be written back to disk.
    pub fn should_write(&self) -> bool {
        !self.check && !self.diff
    }

    /// Reject settings that would make the lexical patterns meaningless.
    pub fn validate(&self) -> Result<(), DocfmtError> {
        if self.fence.is_empty() {
            return Err(DocfmtError::Config("fence must not be empty".to_string()));
        }
        if self.continuation_marker.is_empty() {
            return Err(DocfmtError::Config(
                "continuation_marker must not be empty".to_string(),
            ));
        }
        if self.pretty.line_width == 0 {
            return Err(DocfmtError::Config("line_width must be positive".to_string()));
        }
        if self.extensions.is_empty() {
            return Err(DocfmtError::Config(
                "at least one extension is required".to_string(),
            ));
        }
        for pattern in &self.exclude {
            Glob::new(pattern)?;
        }
        self.dialect().map(|_| ())
    }
}

impl Default for Mode {
    fn default() -> Self {
        Self {
            pretty: PrettyConfig::default(),
            dialect_name: "postgresql".to_string(),
            fence: "~~~".to_string(),
            continuation_marker: ">".to_string(),
            extensions: vec!["md".to_string()],
            exclude: Vec::new(),
            skip: Vec::new(),
            check: false,
            diff: false,
            verbose: false,
            quiet: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mode() {
        let mode = Mode::default();
        assert_eq!(mode.pretty.line_width, 80);
        assert_eq!(mode.pretty.indent_width, 2);
        assert!(!mode.pretty.use_tabs);
        assert_eq!(mode.fence, "~~~");
        assert_eq!(mode.continuation_marker, ">");
        assert!(mode.should_write());
    }

    #[test]
    fn test_dialect_creation() {
        let mode = Mode::default();
        assert!(mode.dialect().is_ok());

        let mut mysql = Mode::default();
        mysql.dialect_name = "mysql".to_string();
        assert!(mysql.dialect().is_ok());

        let mut bogus = Mode::default();
        bogus.dialect_name = "no_such_dialect".to_string();
        assert!(matches!(bogus.dialect(), Err(DocfmtError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_empty_marker() {
        let mut mode = Mode::default();
        mode.continuation_marker.clear();
        assert!(mode.validate().is_err());

        let mut mode = Mode::default();
        mode.fence.clear();
        assert!(mode.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_exclude_glob() {
        let mode = Mode {
            exclude: vec!["[".to_string()],
            ..Mode::default()
        };
        assert!(matches!(mode.validate(), Err(DocfmtError::Glob(_))));
    }

    #[test]
    fn test_check_and_diff_disable_writes() {
        let mut mode = Mode::default();
        mode.check = true;
        assert!(!mode.should_write());

        let mut mode = Mode::default();
        mode.diff = true;
        assert!(!mode.should_write());
    }
}
