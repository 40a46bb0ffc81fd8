use std::path::PathBuf;

use thiserror::Error;

/// User-facing errors.
///
/// Statement parse failures never appear here; the formatter turns them
/// into passthrough.
#[derive(Error, Debug)]
pub enum DocfmtError {
    #[error("docsqlfmt config error: {0}")]
    Config(String),

    #[error("{op} {}: {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("invalid exclude glob: {0}")]
    Glob(#[from] globset::Error),
}

impl DocfmtError {
    /// Build a `map_err` adapter that tags an I/O error with what was being
    /// done and to which path.
    pub(crate) fn io(
        op: &'static str,
        path: impl Into<PathBuf>,
    ) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| DocfmtError::Io { op, path, source }
    }
}

pub type Result<T> = std::result::Result<T, DocfmtError>;
