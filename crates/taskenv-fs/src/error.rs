#[derive(Debug, thiserror::Error)]
pub enum FsError {
    #[error(transparent)]
    Shell(#[from] taskenv_shell::ShellError),

    #[error("{op} failed on {path}: {output}")]
    CommandFailed {
        op: &'static str,
        path: String,
        output: String,
    },

    #[error("grep matched {count} files, which exceeds the cap of {cap}; narrow the search")]
    TooManyMatches { count: usize, cap: usize },
}
