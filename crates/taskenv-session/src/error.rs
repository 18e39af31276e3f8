use thiserror::Error;

/// Failures specific to the session lifecycle itself: sequencing around
/// `reset`, provisioning, and the mission-critical shell calls that close
/// the session rather than merely reporting a failed command (spec §7:
/// "never silently discard a non-zero return code from a mission-critical
/// call").
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no active task: call reset(task) before stepping")]
    NoActiveTask,

    #[error("no container attached: call init() or reset() first")]
    NoContainer,

    #[error("mission-critical step '{step}' exited non-zero ({code}): {output}")]
    MissionCriticalFailure { step: &'static str, code: i32, output: String },

    #[error("environment provisioner failed: {0}")]
    Provisioner(String),

    #[error("interactive shell is corrupted and could not be recovered: {0}")]
    Unrecoverable(String),
}

/// Top-level error aggregating every sub-crate's error type via `#[from]`.
///
/// This lives here rather than in `taskenv-core` because `taskenv-core` is
/// deliberately kept free of dependencies on the rest of the workspace (it
/// is the foundation every other crate builds on); the aggregate naturally
/// belongs to the crate that sits at the top of the dependency graph,
/// mirroring how `codex-rs`'s `CodexErr` lives in `core`, not in a leaf
/// crate, even though it aggregates errors from several of its siblings.
#[derive(Debug, Error)]
pub enum TaskEnvError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Runtime(#[from] taskenv_runtime::RuntimeError),

    #[error(transparent)]
    Shell(#[from] taskenv_shell::ShellError),

    #[error(transparent)]
    Fs(#[from] taskenv_fs::FsError),

    #[error(transparent)]
    Editor(#[from] taskenv_editor::EditorError),

    #[error(transparent)]
    Symbols(#[from] taskenv_symbols::SymbolsError),

    #[error(transparent)]
    Diff(#[from] taskenv_diff::DiffError),
}
