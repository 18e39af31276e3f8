//! The container runtime seam (spec §6): start/attach/pause/remove plus the
//! two out-of-band primitives (`exec`, `get_archive`) the shell bridge and
//! the symbol index need without going through the interactive pipe.
//!
//! Full container orchestration is an external collaborator (spec §1); this
//! crate only defines the trait and ships `LocalProcessRuntime`, a
//! host-process stand-in faithful enough to exercise the shell bridge, the
//! filesystem adapter, and the symbol index in tests and in the reference
//! CLI.

mod error;
mod local;
mod types;

pub use error::RuntimeError;
pub use local::LocalProcessRuntime;
pub use types::{ContainerHandle, ExecOutput, InteractiveProcess, Pid};

#[cfg(test)]
mod local_tests;

/// Parse `ps -eo pid,comm --no-headers` output into `(pid, command)` pairs.
pub fn parse_ps_output(stdout: &str) -> Vec<Pid> {
    stdout
        .lines()
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let pid: u32 = parts.next()?.parse().ok()?;
            let comm = parts.next().unwrap_or("").to_string();
            Some(Pid { pid, comm })
        })
        .collect()
}

#[async_trait::async_trait]
pub trait ContainerRuntime: Send + Sync {
    async fn start(&self, image: &str) -> Result<ContainerHandle, RuntimeError>;

    /// Attach a fresh interactive login shell inside the container, with its
    /// stdin/stdout/stderr available for direct, low-level framing by the
    /// shell bridge. This is distinct from `exec`: it is the one pipe the
    /// bridge owns for the lifetime of a session.
    async fn spawn_interactive_shell(
        &self,
        handle: &ContainerHandle,
    ) -> Result<InteractiveProcess, RuntimeError>;

    /// Run a short command to completion without disturbing the interactive
    /// shell. Used for PID probes, signal delivery, and anything else that
    /// must not be reentrant with the bridge's own pipe.
    async fn exec(&self, handle: &ContainerHandle, cmd: &[String]) -> Result<ExecOutput, RuntimeError>;

    /// Stream a path out of the container as a tar archive.
    async fn get_archive(&self, handle: &ContainerHandle, path: &str) -> Result<Vec<u8>, RuntimeError>;

    async fn pause(&self, handle: &ContainerHandle) -> Result<(), RuntimeError>;
    async fn unpause(&self, handle: &ContainerHandle) -> Result<(), RuntimeError>;
    async fn terminate(&self, handle: &ContainerHandle) -> Result<(), RuntimeError>;
    async fn remove(&self, handle: &ContainerHandle) -> Result<(), RuntimeError>;

    /// List the processes currently running inside the container, via the
    /// out-of-band `exec` channel (spec §6: `ps -eo pid,comm --no-headers`).
    async fn list_pids(&self, handle: &ContainerHandle) -> Result<Vec<Pid>, RuntimeError> {
        let out = self
            .exec(
                handle,
                &[
                    "ps".to_string(),
                    "-eo".to_string(),
                    "pid,comm".to_string(),
                    "--no-headers".to_string(),
                ],
            )
            .await?;
        Ok(parse_ps_output(&out.stdout))
    }
}
