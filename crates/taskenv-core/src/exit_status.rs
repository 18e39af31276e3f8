use std::fmt;

/// `info.exit_status`, attached to the final observation of an episode.
///
/// Modeled as an enum rather than ad hoc strings, but `Display` produces the
/// exact tokens spec.md §6 names so logs and the CLI stay compatible with
/// the original prototype's vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitStatus {
    Skipped,
    Submitted,
    SubmittedExit(String),
    EarlyExit,
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitStatus::Skipped => write!(f, "skipped"),
            ExitStatus::Submitted => write!(f, "submitted"),
            ExitStatus::SubmittedExit(verb) => write!(f, "submitted ({verb})"),
            ExitStatus::EarlyExit => write!(f, "early_exit"),
        }
    }
}
