#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("failed to start container: {0}")]
    Start(String),
    #[error("failed to spawn interactive shell: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("exec failed: {0}")]
    Exec(String),
    #[error("get_archive failed for {path}: {source}")]
    Archive {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("container lifecycle operation failed: {0}")]
    Lifecycle(String),
    #[error("unknown container handle: {0}")]
    UnknownHandle(String),
}
