use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use phf::phf_set;

use crate::error::{DocfmtError, Result};
use crate::mode::Mode;
use crate::report::{FileResult, FileStatus, Report};
use crate::rewriter::DocumentRewriter;

/// Documents whose examples depend on exact formatting and must never be
/// rewritten: literal byte values and the reserved keyword/constant list.
static IGNORED_FILES: phf::Set<&'static str> = phf_set! {
    "bytes.md",
    "sql-constants.md",
};

/// Rewrite a single in-memory document according to the given mode.
pub fn format_document(source: &[u8], mode: &Mode) -> Result<Vec<u8>> {
    let rewriter = DocumentRewriter::new(mode)?;
    Ok(rewriter.rewrite(source))
}

/// Rewrite every candidate document under `paths`, one at a time.
///
/// The first I/O error aborts the run. Documents rewritten before it stay
/// rewritten.
pub fn run(paths: &[PathBuf], mode: &Mode) -> Result<Report> {
    let rewriter = DocumentRewriter::new(mode)?;
    let filter = DocumentFilter::new(mode)?;
    let mut report = Report::new();

    for path in paths {
        walk(path, &mut |file: &Path| {
            if !filter.accepts(file) {
                tracing::trace!(path = %file.display(), "skipping");
                return Ok(());
            }
            report.add(rewrite_file(file, &rewriter, mode)?);
            Ok(())
        })?;
    }

    Ok(report)
}

/// Decides which files are documents, by base name.
#[derive(Debug)]
pub struct DocumentFilter {
    suffixes: Vec<String>,
    exclude: GlobSet,
}

impl DocumentFilter {
    pub fn new(mode: &Mode) -> Result<Self> {
        let suffixes = mode.extensions.iter().map(|ext| format!(".{ext}")).collect();
        let mut builder = GlobSetBuilder::new();
        for pattern in &mode.exclude {
            builder.add(Glob::new(pattern)?);
        }
        Ok(Self {
            suffixes,
            exclude: builder.build()?,
        })
    }

    pub fn accepts(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
            return false;
        };
        self.suffixes.iter().any(|suffix| name.ends_with(suffix.as_str()))
            && !IGNORED_FILES.contains(&*name)
            && !self.exclude.is_match(&*name)
    }
}

/// Visit every non-directory under `path` in lexical order. Symlinked
/// directories are not followed.
fn walk(path: &Path, visit: &mut dyn FnMut(&Path) -> Result<()>) -> Result<()> {
    let meta = fs::symlink_metadata(path).map_err(DocfmtError::io("lstat", path))?;
    if !meta.is_dir() {
        return visit(path);
    }

    let mut entries = fs::read_dir(path)
        .and_then(|dir| {
            dir.map(|entry| entry.map(|e| e.path()))
                .collect::<std::io::Result<Vec<_>>>()
        })
        .map_err(DocfmtError::io("read directory", path))?;
    entries.sort();

    for entry in &entries {
        walk(entry, visit)?;
    }
    Ok(())
}

/// Rewrite one document, writing it back only when its bytes changed.
fn rewrite_file(path: &Path, rewriter: &DocumentRewriter, mode: &Mode) -> Result<FileResult> {
    let source = fs::read(path).map_err(DocfmtError::io("read", path))?;
    let rewritten = rewriter.rewrite(&source);

    if rewritten == source {
        return Ok(FileResult {
            path: path.to_path_buf(),
            status: FileStatus::Unchanged,
        });
    }

    if mode.diff {
        print_diff(path, &source, &rewritten);
    }

    if mode.should_write() {
        // Truncating an existing file keeps its permission bits.
        fs::write(path, &rewritten).map_err(DocfmtError::io("write", path))?;
        tracing::debug!(path = %path.display(), "rewrote document");
    }

    Ok(FileResult {
        path: path.to_path_buf(),
        status: FileStatus::Changed,
    })
}

/// Print a diff between original and rewritten content.
fn print_diff(path: &Path, original: &[u8], rewritten: &[u8]) {
    use similar::{ChangeTag, TextDiff};

    let original = String::from_utf8_lossy(original);
    let rewritten = String::from_utf8_lossy(rewritten);

    eprintln!("--- {}", path.display());
    eprintln!("+++ {}", path.display());

    let diff = TextDiff::from_lines(original.as_ref(), rewritten.as_ref());
    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => "-",
            ChangeTag::Insert => "+",
            ChangeTag::Equal => " ",
        };
        eprint!("{}{}", sign, change);
        if change.missing_newline() {
            eprintln!();
        }
    }
}
