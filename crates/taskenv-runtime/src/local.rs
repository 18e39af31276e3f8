use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tar::Builder;
use tokio::process::Command;
use tokio::sync::Mutex;

use crate::error::RuntimeError;
use crate::types::{ContainerHandle, ExecOutput, InteractiveProcess};

/// Host-process stand-in for a real container runtime. Each "container" is a
/// temporary directory on the host standing in for the container's `/`,
/// plus whatever child processes get spawned under it. Good enough to drive
/// the shell bridge, filesystem adapter, and symbol index end to end without
/// a real container engine.
#[derive(Default)]
pub struct LocalProcessRuntime {
    containers: Mutex<HashMap<String, tempfile::TempDir>>,
}

impl LocalProcessRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    fn host_path(handle: &ContainerHandle, container_path: &str) -> PathBuf {
        let relative = container_path.trim_start_matches('/');
        if relative.is_empty() {
            handle.root.clone()
        } else {
            handle.root.join(relative)
        }
    }
}

#[async_trait::async_trait]
impl crate::ContainerRuntime for LocalProcessRuntime {
    async fn start(&self, _image: &str) -> Result<ContainerHandle, RuntimeError> {
        let dir = tempfile::tempdir().map_err(|e| RuntimeError::Start(e.to_string()))?;
        let handle = ContainerHandle {
            id: uuid::Uuid::new_v4().to_string(),
            root: dir.path().to_path_buf(),
        };
        self.containers.lock().await.insert(handle.id.clone(), dir);
        tracing::debug!(container_id = %handle.id, "started local container stand-in");
        Ok(handle)
    }

    async fn spawn_interactive_shell(
        &self,
        handle: &ContainerHandle,
    ) -> Result<InteractiveProcess, RuntimeError> {
        let child = Command::new("/bin/bash")
            .arg("--noprofile")
            .arg("--norc")
            .current_dir(&handle.root)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(RuntimeError::Spawn)?;
        Ok(InteractiveProcess::new(child))
    }

    async fn exec(&self, handle: &ContainerHandle, cmd: &[String]) -> Result<ExecOutput, RuntimeError> {
        let Some((program, args)) = cmd.split_first() else {
            return Err(RuntimeError::Exec("empty command".to_string()));
        };
        let output = Command::new(program)
            .args(args)
            .current_dir(&handle.root)
            .output()
            .await
            .map_err(|e| RuntimeError::Exec(e.to_string()))?;
        Ok(ExecOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code().unwrap_or(-1),
        })
    }

    async fn get_archive(&self, handle: &ContainerHandle, path: &str) -> Result<Vec<u8>, RuntimeError> {
        let host_path = Self::host_path(handle, path);
        let buf = Vec::new();
        let host_path_for_blocking = host_path.clone();
        tokio::task::spawn_blocking(move || build_tar(&host_path_for_blocking, buf))
            .await
            .map_err(|e| RuntimeError::Archive {
                path: path.to_string(),
                source: std::io::Error::other(e),
            })?
            .map_err(|source| RuntimeError::Archive {
                path: path.to_string(),
                source,
            })
    }

    async fn pause(&self, handle: &ContainerHandle) -> Result<(), RuntimeError> {
        tracing::debug!(container_id = %handle.id, "pause (no-op for local runtime)");
        Ok(())
    }

    async fn unpause(&self, handle: &ContainerHandle) -> Result<(), RuntimeError> {
        tracing::debug!(container_id = %handle.id, "unpause (no-op for local runtime)");
        Ok(())
    }

    async fn terminate(&self, handle: &ContainerHandle) -> Result<(), RuntimeError> {
        tracing::debug!(container_id = %handle.id, "terminate (no-op for local runtime)");
        Ok(())
    }

    async fn remove(&self, handle: &ContainerHandle) -> Result<(), RuntimeError> {
        self.containers.lock().await.remove(&handle.id);
        Ok(())
    }
}

fn build_tar(path: &Path, buf: Vec<u8>) -> Result<Vec<u8>, std::io::Error> {
    let mut builder = Builder::new(buf);
    if path.is_dir() {
        builder.append_dir_all(".", path)?;
    } else {
        let mut file = std::fs::File::open(path)?;
        let name = path.file_name().unwrap_or_default();
        builder.append_file(name, &mut file)?;
    }
    builder.into_inner()
}
