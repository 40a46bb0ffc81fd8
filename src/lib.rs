pub mod api;
pub mod config;
pub mod error;
pub mod extractor;
pub mod format;
pub mod mode;
pub mod report;
pub mod rewriter;
pub mod skip;
pub mod splitter;

// Re-export the main public API
pub use api::{format_document, run};
pub use config::load_config;
pub use mode::{Mode, PrettyConfig};
pub use rewriter::DocumentRewriter;
