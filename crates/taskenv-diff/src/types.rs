/// One `@@` hunk: the anchor (`context_before` + `removed`) and its
/// replacement (spec §4.5).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Hunk {
    pub context_before: Vec<String>,
    pub removed: Vec<String>,
    pub added: Vec<String>,
    pub context_after: Vec<String>,
}

/// One `--- src` / `+++ tgt` file block and its hunks, as supplied by the
/// planner before path resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub src_file: String,
    pub tgt_file: String,
    pub hunks: Vec<Hunk>,
}

/// A single file's outcome from applying a diff (spec §3 `diff_result`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedFile {
    pub path: String,
    pub new_contents: String,
    pub old_contents: String,
    pub lint_delta: taskenv_core::LintDelta,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedFile {
    pub path: String,
    pub reason: String,
    pub old_contents: String,
}

/// Per-file, not per-hunk — partial hunk application is forbidden (spec
/// §4.5 atomicity).
#[derive(Debug, Clone, Default)]
pub struct DiffResult {
    pub success: Vec<AppliedFile>,
    pub fail: Vec<FailedFile>,
}
