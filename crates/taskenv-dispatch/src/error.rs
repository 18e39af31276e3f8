use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("unterminated <<<...>>> literal")]
    UnterminatedLiteral,

    #[error("unterminated \"...\" string")]
    UnterminatedString,

    #[error("unterminated [...] literal")]
    UnterminatedBracket,

    #[error("empty action")]
    EmptyAction,

    #[error("{verb} requires {arg}")]
    MissingArg { verb: String, arg: &'static str },

    #[error("{0} requires a numeric argument")]
    NotANumber(String),

    #[error("'{0}' is rejected: would block the interactive shell")]
    Rejected(String),
}
