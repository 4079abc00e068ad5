//! Git diff compaction for LLM context optimization
//!
//! Reduces a unified git diff to the smallest text that still carries its
//! meaningful changes, under hard size limits. The work happens in three
//! pure stages:
//!
//! - `segment`: raw text into a [`DiffDocument`] of file blocks and hunks
//! - `filter`: marks lock, generated, vendored and binary files as discarded
//! - `compact`: windows each hunk around its changes and applies the caps
//!
//! ```
//! let diff = "diff --git a/src/app.go b/src/app.go\n@@ -1 +1 @@\n-a\n+b\n";
//! let text = slimdiff_diff::compact_diff(diff);
//! assert!(text.starts_with("file: src/app.go"));
//! ```

mod compact;
mod error;
mod filter;
mod options;
mod pipeline;
mod report;
mod segment;
mod types;

pub use compact::{
    compact, compact_with_report, normalize_whitespace, Compaction, ELLIPSIS,
    FILE_TRUNCATED_MARKER, LINE_TRIMMED_MARKER, MORE_FILES_MARKER, NO_MEANINGFUL_CHANGES,
    OUTPUT_TRUNCATED_MARKER,
};
pub use error::{OptionsError, OptionsResult};
pub use filter::{filter, should_discard, IgnoreRules, DEFAULT_IGNORE_GLOBS};
pub use options::{
    CompactionOptions, CompactionOptionsBuilder, DEFAULT_CONTEXT_RADIUS, DEFAULT_MAX_FILES,
    DEFAULT_MAX_HUNKS_PER_FILE, DEFAULT_MAX_LINES_PER_FILE, DEFAULT_MAX_LINE_LENGTH,
    DEFAULT_MAX_TOTAL_BYTES,
};
pub use pipeline::{compact_diff, DiffCompactor};
pub use report::{CompactionReport, LARGE_OUTPUT_BYTES};
pub use segment::segment;
pub use types::{DiffDocument, DiffLine, FileBlock, Hunk, LineKind};
