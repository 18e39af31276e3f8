use thiserror::Error;

/// Whole-blob failures (spec §4.5 parsing) that abort before any per-file
/// resolution is attempted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiffError {
    #[error("Hallucination: diff blob names no source or target file")]
    Hallucination,

    #[error("Hallucination: malformed hunk header in diff blob")]
    MalformedHunk,
}

/// Why a single hunk failed to resolve against the current file contents
/// (spec §4.5 resolution).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnchorError {
    #[error("hunk {hunk_index} anchor not found in {path}")]
    Missing { hunk_index: usize, path: String },

    #[error("hunk {hunk_index} anchor matches {count} locations in {path}, expected exactly one")]
    Ambiguous {
        hunk_index: usize,
        path: String,
        count: usize,
    },
}
