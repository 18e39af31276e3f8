use std::path::PathBuf;

use tokio::process::{Child, ChildStderr, ChildStdin, ChildStdout};

/// Opaque reference to a running "container". For `LocalProcessRuntime`
/// this carries the host directory standing in for the container's `/`.
#[derive(Debug, Clone)]
pub struct ContainerHandle {
    pub id: String,
    /// Host directory standing in for the container's `/`. Callers that
    /// construct a filesystem adapter or symbol index over this container
    /// need this to resolve absolute container paths; real container
    /// runtimes back this with a registry/socket handle instead; the field
    /// stays a plain path here because the local stand-in has nothing else
    /// to offer.
    pub root: PathBuf,
}

#[derive(Debug, Clone)]
pub struct Pid {
    pub pid: u32,
    pub comm: String,
}

#[derive(Debug, Clone)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// The one pipe the shell bridge owns for the lifetime of a session. Stdin,
/// stdout, and stderr are exposed directly so the bridge can implement its
/// own framing and quiescence detection without the runtime getting in the
/// way.
pub struct InteractiveProcess {
    pub stdin: ChildStdin,
    pub stdout: ChildStdout,
    pub stderr: ChildStderr,
    // Kept alive so the process is not reaped; the shell itself is never
    // killed by the bridge, only its children (see taskenv-shell).
    child: Child,
}

impl InteractiveProcess {
    pub fn new(mut child: Child) -> Self {
        let stdin = child.stdin.take().expect("child spawned with piped stdin");
        let stdout = child.stdout.take().expect("child spawned with piped stdout");
        let stderr = child.stderr.take().expect("child spawned with piped stderr");
        Self {
            stdin,
            stdout,
            stderr,
            child,
        }
    }

    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }
}
