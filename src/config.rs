use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::DocfmtError;
use crate::mode::Mode;

/// File names searched for in the input directories and their parents.
const CONFIG_FILE_NAMES: &[&str] = &["docsqlfmt.toml", ".docsqlfmt.toml"];

/// Keys accepted in a config file. Anything else is an error.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub line_width: Option<usize>,
    pub indent_width: Option<usize>,
    pub use_tabs: Option<bool>,
    pub dialect: Option<String>,
    pub fence: Option<String>,
    pub continuation_marker: Option<String>,
    pub extensions: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub skip: Option<Vec<String>>,
}

impl FileConfig {
    /// Apply configuration values to a Mode.
    pub fn apply(self, mode: &mut Mode) {
        if let Some(n) = self.line_width {
            mode.pretty.line_width = n;
        }
        if let Some(n) = self.indent_width {
            mode.pretty.indent_width = n;
        }
        if let Some(b) = self.use_tabs {
            mode.pretty.use_tabs = b;
        }
        if let Some(d) = self.dialect {
            mode.dialect_name = d;
        }
        if let Some(f) = self.fence {
            mode.fence = f;
        }
        if let Some(m) = self.continuation_marker {
            mode.continuation_marker = m;
        }
        if let Some(exts) = self.extensions {
            mode.extensions = exts
                .into_iter()
                .map(|e| e.trim_start_matches('.').to_string())
                .collect();
        }
        if let Some(exclude) = self.exclude {
            mode.exclude = exclude;
        }
        if let Some(skip) = self.skip {
            mode.skip = skip;
        }
    }
}

/// Load docsqlfmt configuration.
/// Searches the input paths and their parents if no config path is given,
/// then falls back to the user config directory.
pub fn load_config(paths: &[PathBuf], config_path: Option<&Path>) -> Result<Mode, DocfmtError> {
    let mut mode = Mode::default();

    let config_file = match config_path {
        Some(path) => {
            if path.exists() {
                Some(path.to_path_buf())
            } else {
                return Err(DocfmtError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
        }
        None => find_config_file(paths).or_else(user_config_file),
    };

    if let Some(path) = config_file {
        tracing::debug!(path = %path.display(), "loading config");
        load_config_from_path(&path)?.apply(&mut mode);
    }

    Ok(mode)
}

/// Search for a config file in the common parent directories of the given paths.
fn find_config_file(paths: &[PathBuf]) -> Option<PathBuf> {
    get_common_parents(paths).into_iter().find_map(|parent| {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| parent.join(name))
            .find(|candidate| candidate.is_file())
    })
}

fn user_config_file() -> Option<PathBuf> {
    let path = dirs::config_dir()?.join("docsqlfmt").join("config.toml");
    path.is_file().then_some(path)
}

/// Get the parent directories of the given paths, ordered from most
/// specific to least specific.
fn get_common_parents(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut parents = Vec::new();

    for path in paths {
        let start = if path.is_dir() {
            path.clone()
        } else {
            path.parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."))
        };
        // Relative paths stop at "" otherwise; walk the absolute form.
        let start = start.canonicalize().unwrap_or(start);

        let mut current = Some(start.as_path());
        while let Some(dir) = current {
            let dir_buf = dir.to_path_buf();
            if !parents.contains(&dir_buf) {
                parents.push(dir_buf);
            }
            current = dir.parent();
        }
    }

    parents
}

/// Load and parse a TOML config file.
fn load_config_from_path(path: &Path) -> Result<FileConfig, DocfmtError> {
    let content = std::fs::read_to_string(path).map_err(DocfmtError::io("read", path))?;
    Ok(toml::from_str(&content)?)
}
