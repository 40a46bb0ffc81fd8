use std::sync::LazyLock;

use memchr::memmem::Finder;

/// Substrings marking statements the pretty printer must not touch: inline
/// comments it would drop, syntax it does not round-trip, and administrative
/// or introspection statements that are not worth canonicalizing.
/// Matching is plain containment against the lowercased text, so false
/// positives are expected and accepted.
pub const BLOCKLIST: &[&str] = &[
    "--",
    "backup",
    "begin",
    "cancel",
    "cluster setting",
    "collate",
    "commit",
    "create view",
    "partition",
    "pause",
    "reset",
    "restore",
    "resume",
    "rollback",
    "set database",
    "show",
    "transaction",
    "using gin",
    "constraint",
];

static BUILTIN: LazyLock<Vec<Finder<'static>>> =
    LazyLock::new(|| BLOCKLIST.iter().map(|p| Finder::new(p.as_bytes())).collect());

/// Decides whether a statement must be passed through verbatim.
#[derive(Debug, Clone, Default)]
pub struct SkipList {
    extra: Vec<Finder<'static>>,
}

impl SkipList {
    /// Build a skip list with additional user substrings. The built-in
    /// blocklist is always consulted as well.
    pub fn with_extra<S: AsRef<str>>(extra: &[S]) -> Self {
        let extra = extra
            .iter()
            .map(|s| s.as_ref().to_ascii_lowercase())
            .filter(|s| !s.is_empty())
            .map(|s| Finder::new(s.as_bytes()).into_owned())
            .collect();
        Self { extra }
    }

    /// True when `text` contains a non-ASCII byte or any blocklisted
    /// substring (case-insensitive).
    pub fn should_skip(&self, text: &[u8]) -> bool {
        if !text.is_ascii() {
            return true;
        }
        let lower = text.to_ascii_lowercase();
        BUILTIN
            .iter()
            .chain(self.extra.iter())
            .any(|finder| finder.find(&lower).is_some())
    }
}
