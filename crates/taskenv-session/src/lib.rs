//! Session lifecycle (spec §4.7, component G): initialize a container,
//! check out a task's base commit, reset between tasks, interrupt runaway
//! children, and extract the final submitted patch.
//!
//! This is the crate every other `taskenv-*` crate ultimately feeds into,
//! so the aggregate `TaskEnvError` lives here rather than in `taskenv-core`
//! (see `error.rs` for why).

mod error;
mod session;
mod submission;
mod types;

pub use error::{SessionError, TaskEnvError};
pub use session::Session;
pub use submission::{contains_submission, extract_submission};
pub use types::{EnvProvisioner, NoOpProvisioner, RepoSource, StepOutcome};
