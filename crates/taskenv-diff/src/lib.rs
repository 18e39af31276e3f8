//! Structured-diff applier (spec §4.5, component E): parses a free-form
//! unified-diff-like blob into per-file hunks, resolves each hunk against
//! current file contents by whitespace-insensitive fuzzy anchoring, and
//! commits syntactically-valid results through the editor.

mod anchor;
mod apply;
mod error;
mod lint;
mod parser;
mod syntax;
mod types;

pub use apply::apply_diff_blob;
pub use error::{AnchorError, DiffError};
pub use types::{AppliedFile, DiffResult, FailedFile, FileDiff, Hunk};
