use serde::{Deserialize, Serialize};

/// Immutable per-task bundle driving one `reset -> steps* -> submit` episode.
///
/// Owned by the session lifecycle for the duration of one task; every other
/// component only ever sees a shared reference to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecord {
    pub instance_id: String,
    pub repo_slug: String,
    pub base_commit: String,
    pub problem_statement: String,
    #[serde(default)]
    pub test_patch: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

impl TaskRecord {
    /// The directory name the repo mirror is checked out under inside the
    /// container, e.g. `django__django`.
    pub fn repo_dirname(&self) -> &str {
        self.repo_slug
            .rsplit('/')
            .next()
            .unwrap_or(&self.repo_slug)
    }
}
