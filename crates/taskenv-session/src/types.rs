use std::path::PathBuf;

use async_trait::async_trait;
use taskenv_core::{ExitStatus, TaskRecord};
use taskenv_runtime::{ContainerHandle, ContainerRuntime};

use crate::error::SessionError;

/// How `reset` should obtain the task's repo mirror inside the container.
/// Cloning a live remote and provisioning a language runtime are out of
/// scope (spec.md §1); this only distinguishes the two shapes `reset`'s
/// prose names ("clone or reuse the task's repo mirror").
#[derive(Debug, Clone)]
pub enum RepoSource {
    /// The repo root already has a checkout in it (e.g. a persistent
    /// container reused across tasks); skip cloning, go straight to
    /// `git restore` / `git reset --hard` / `git clean`.
    AlreadyPresent,
    /// Clone from a local mirror path (a bare or working clone reachable on
    /// the host the runtime execs against) if the repo root has no `.git`.
    LocalMirror(PathBuf),
}

/// Per-repo environment provisioning hook (spec.md §1 names this an
/// external collaborator; SPEC_FULL.md §4.7 asks for the seam so a caller
/// can plug in the prototype's `install_env` step without coupling the
/// session to one language's package manager). Provisioning failures are
/// mission-critical: they close the session (spec §7).
#[async_trait]
pub trait EnvProvisioner<R: ContainerRuntime>: Send + Sync {
    async fn provision(
        &self,
        runtime: &R,
        handle: &ContainerHandle,
        task: &TaskRecord,
    ) -> Result<(), SessionError>;
}

/// Default provisioner: does nothing. Most tests and the reference CLI use
/// this; a SWE-bench-style harness would supply its own.
pub struct NoOpProvisioner;

#[async_trait]
impl<R: ContainerRuntime> EnvProvisioner<R> for NoOpProvisioner {
    async fn provision(&self, _runtime: &R, _handle: &ContainerHandle, _task: &TaskRecord) -> Result<(), SessionError> {
        Ok(())
    }
}

/// Result of one `step(action, thought)` call.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub observation: String,
    pub done: bool,
    pub exit_status: Option<ExitStatus>,
    /// The patch extracted from the submission sentinel, present iff `done`
    /// and the episode ended via `submit`/`exit_*` rather than a running
    /// out of steps at the caller's discretion.
    pub patch: Option<String>,
}

impl StepOutcome {
    pub(crate) fn running(observation: String) -> Self {
        Self {
            observation,
            done: false,
            exit_status: None,
            patch: None,
        }
    }

    pub(crate) fn finished(observation: String, exit_status: ExitStatus, patch: Option<String>) -> Self {
        Self {
            observation,
            done: true,
            exit_status: Some(exit_status),
            patch,
        }
    }
}
