#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    /// Write to the shell's stdin failed (broken pipe) — the shell died.
    /// Fatal: the caller is expected to reset the container.
    #[error("shell pipe broken, shell is presumed dead: {0}")]
    BrokenPipe(#[source] std::io::Error),

    /// The echoed exit code was not a plain non-negative integer — the
    /// shell's state is corrupted. Fatal.
    #[error("shell corrupted: non-digit exit code in output: {0:?}")]
    CorruptedExitCode(String),

    /// The command was killed after exceeding `timeout`. Not fatal: the
    /// shell itself survives, only its children were signaled.
    #[error("execution timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Caller-initiated interrupt whose post-interrupt health check failed.
    /// The whole session must be considered corrupt and reset.
    #[error("interrupt health check failed, session must be reset")]
    InterruptHealthCheckFailed,

    #[error(transparent)]
    Runtime(#[from] taskenv_runtime::RuntimeError),
}
