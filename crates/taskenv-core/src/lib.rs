//! Shared data model and ambient plumbing for the task execution environment.
//!
//! `taskenv-core` has no dependency on any other `taskenv-*` crate: it is the
//! foundation every other component builds on (task records, configuration,
//! the lint-finding model, path helpers, and tracing setup).

mod config;
mod exit_status;
mod lint;
mod path;
mod task;
mod tracing_init;

pub use config::Config;
pub use exit_status::ExitStatus;
pub use lint::{LintCheck, LintDelta, LintFinding};
pub use path::normalize_under_root;
pub use task::TaskRecord;
pub use tracing_init::init_tracing;

/// Reserved repo-root-relative path the oracle test patch is written to and
/// the submission script reads back (spec §6). Shared between the session
/// (which writes it) and the dispatcher's `submit_script` (which resets and
/// gitignores it) so the two never drift apart.
pub const TEST_PATCH_PATH: &str = "root/test.patch";

#[cfg(test)]
mod config_tests;
