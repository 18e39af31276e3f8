use serde::{Deserialize, Serialize};

/// One static-analysis finding, shaped after the flake8/pylint records the
/// Python prototype collected (`check_lint` in `swe_env.py`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintFinding {
    pub line: u32,
    pub column: u32,
    pub code: String,
    pub message: String,
}

/// The set of findings a diff apply introduced or cleared, relative to the
/// pre-apply contents of the same file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintDelta {
    pub added: Vec<LintFinding>,
    pub removed: Vec<LintFinding>,
}

impl LintDelta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    pub fn diff(before: &[LintFinding], after: &[LintFinding]) -> Self {
        let added = after.iter().filter(|f| !before.contains(f)).cloned().collect();
        let removed = before.iter().filter(|f| !after.contains(f)).cloned().collect();
        LintDelta { added, removed }
    }
}

/// One static check a source language can plug in. `taskenv-diff` ships a
/// Python implementation; a second language's check can be added without
/// touching any caller of this trait.
pub trait LintCheck {
    /// File extensions (without the dot) this check applies to.
    fn extensions(&self) -> &[&str];
    fn run(&self, contents: &str) -> Vec<LintFinding>;
}
