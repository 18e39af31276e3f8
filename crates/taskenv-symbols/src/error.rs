use taskenv_runtime::RuntimeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SymbolsError {
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error("failed to extract repository snapshot: {0}")]
    Archive(#[source] std::io::Error),
}
