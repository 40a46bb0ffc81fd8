use std::path::PathBuf;

/// Status of rewriting a single document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// Every SQL block was already canonical, or nothing could be reformatted.
    Unchanged,
    /// Document was rewritten (or would be, in check/diff mode).
    Changed,
}

/// Result of rewriting a single document.
#[derive(Debug, Clone)]
pub struct FileResult {
    pub path: PathBuf,
    pub status: FileStatus,
}

/// Aggregated report of a completed run.
#[derive(Debug, Default)]
pub struct Report {
    pub results: Vec<FileResult>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, result: FileResult) {
        self.results.push(result);
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn changed(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.status == FileStatus::Changed)
            .count()
    }

    pub fn unchanged(&self) -> usize {
        self.total() - self.changed()
    }

    pub fn has_changes(&self) -> bool {
        self.changed() > 0
    }

    /// Generate a summary string. `dry_run` reports pending rather than
    /// applied rewrites.
    pub fn summary(&self, dry_run: bool) -> String {
        let mut parts = vec![format!("{} document(s) processed", self.total())];
        if self.changed() > 0 {
            let verb = if dry_run { "would be reformatted" } else { "reformatted" };
            parts.push(format!("{} {}", self.changed(), verb));
        }
        if self.unchanged() > 0 {
            parts.push(format!("{} unchanged", self.unchanged()));
        }
        parts.join(", ")
    }
}
