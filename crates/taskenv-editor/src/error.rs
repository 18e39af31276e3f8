#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error(transparent)]
    Fs(#[from] taskenv_fs::FsError),

    #[error("{0} is already open")]
    AlreadyOpen(String),

    #[error("{0} is not open")]
    NotOpen(String),

    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("{0} does not exist")]
    NotFound(String),

    #[error("too many matches for {dir}, refusing beyond {cap} files")]
    TooManyMatches { dir: String, cap: usize },

    #[error(transparent)]
    TooManyLineMatches(#[from] crate::search::TooManyMatches),
}
