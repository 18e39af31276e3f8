use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use taskenv_runtime::{ContainerHandle, ContainerRuntime, InteractiveProcess, Pid};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::ShellError;
use crate::quiescence::{read_until_quiescent, QuiescenceOutcome};

/// Conventional shell exit code for a timed-out command (matches the value
/// most shells use for `timeout(1)`).
pub const EXEC_TIMEOUT_EXIT_CODE: i32 = 124;

const SHORT_EXIT_TIMEOUT: Duration = Duration::from_secs(5);
const DRAIN_WINDOW: Duration = Duration::from_secs(1);
const SYNTAX_CHECK_DELIM: &str = "TASKENV_SYNTAX_EOF";

enum RawOutcome {
    Settled(String, i32),
    TimedOut(String),
}

/// Owns one interactive login shell inside a container for the lifetime of
/// a session. See module docs for the framing protocol.
pub struct ShellBridge<R: ContainerRuntime> {
    runtime: Arc<R>,
    handle: ContainerHandle,
    parent_pids: HashSet<u32>,
    process: Mutex<InteractiveProcess>,
    last_returncode: Mutex<Option<i32>>,
}

impl<R: ContainerRuntime> ShellBridge<R> {
    /// Spawn the interactive shell and memoize the set of PIDs already
    /// running inside the container, so later probes can tell infrastructure
    /// processes apart from ones the agent spawned.
    pub async fn init(runtime: Arc<R>, handle: ContainerHandle) -> Result<Self, ShellError> {
        let process = runtime.spawn_interactive_shell(&handle).await?;
        let parent_pids = runtime
            .list_pids(&handle)
            .await?
            .into_iter()
            .map(|p| p.pid)
            .collect();
        Ok(Self {
            runtime,
            handle,
            parent_pids,
            process: Mutex::new(process),
            last_returncode: Mutex::new(None),
        })
    }

    pub async fn last_returncode(&self) -> Option<i32> {
        *self.last_returncode.lock().await
    }

    /// The single synchronous primitive: frame `input`, run it, and return
    /// its output and exit code. Never returns an `Err` for a merely failing
    /// command — only for conditions that mean the shell itself is dead or
    /// corrupted.
    pub async fn communicate(&self, input: &str, timeout: Duration) -> Result<(String, i32), ShellError> {
        let (syntax_output, syntax_code) = self.check_syntax(input).await?;
        if syntax_code != 0 {
            tracing::warn!(%syntax_code, "rejected malformed input at syntax pre-check");
            return Ok((syntax_output, syntax_code));
        }

        match self.raw_communicate(input, timeout).await? {
            RawOutcome::Settled(output, code) => {
                tracing::debug!(%code, input_len = input.len(), "shell round-trip complete");
                Ok((output, code))
            }
            RawOutcome::TimedOut(partial) => {
                tracing::warn!(?timeout, "shell command timed out, killing children");
                self.kill_non_parent_children().await?;
                self.drain(DRAIN_WINDOW).await;
                let mut output = partial;
                if !output.is_empty() && !output.ends_with('\n') {
                    output.push('\n');
                }
                output.push_str("EXECUTION TIMED OUT");
                *self.last_returncode.lock().await = Some(EXEC_TIMEOUT_EXIT_CODE);
                Ok((output, EXEC_TIMEOUT_EXIT_CODE))
            }
        }
    }

    /// Caller-initiated interrupt: same recovery path as a timeout, plus a
    /// health-check round-trip that must echo back a known literal. If that
    /// fails, the whole session is corrupt.
    pub async fn interrupt(&self) -> Result<(), ShellError> {
        self.kill_non_parent_children().await?;
        self.drain(DRAIN_WINDOW).await;
        let (output, code) = self.raw_healthcheck().await?;
        if code == 0 && output.trim() == "interrupted" {
            Ok(())
        } else {
            Err(ShellError::InterruptHealthCheckFailed)
        }
    }

    async fn raw_healthcheck(&self) -> Result<(String, i32), ShellError> {
        match self.raw_communicate("echo 'interrupted'", SHORT_EXIT_TIMEOUT).await? {
            RawOutcome::Settled(out, code) => Ok((out, code)),
            RawOutcome::TimedOut(out) => Ok((out, -1)),
        }
    }

    /// Run `input` under `bash -n` through the same interactive pipe, so a
    /// malformed command never reaches the real prompt and leaves it in a
    /// half-parsed continuation state.
    async fn check_syntax(&self, input: &str) -> Result<(String, i32), ShellError> {
        let wrapped = format!("/bin/bash -n <<'{SYNTAX_CHECK_DELIM}'\n{input}\n{SYNTAX_CHECK_DELIM}");
        match self.raw_communicate(&wrapped, SHORT_EXIT_TIMEOUT).await? {
            RawOutcome::Settled(out, code) => Ok((out, code)),
            RawOutcome::TimedOut(out) => Ok((out, -1)),
        }
    }

    async fn raw_communicate(&self, input: &str, timeout: Duration) -> Result<RawOutcome, ShellError> {
        let mut guard = self.process.lock().await;

        let mut cmd = input.to_string();
        if !cmd.ends_with('\n') {
            cmd.push('\n');
        }
        guard.stdin.write_all(cmd.as_bytes()).await.map_err(ShellError::BrokenPipe)?;
        guard.stdin.flush().await.map_err(ShellError::BrokenPipe)?;

        let outcome = {
            let (stdout, stderr) = (&mut guard.stdout, &mut guard.stderr);
            read_until_quiescent(stdout, stderr, timeout, || self.no_children_outside_parent_set()).await
        };
        let buffer = match outcome {
            QuiescenceOutcome::Settled(s) => s,
            QuiescenceOutcome::TimedOut(s) => return Ok(RawOutcome::TimedOut(s)),
        };

        guard
            .stdin
            .write_all(b"echo $?\n")
            .await
            .map_err(ShellError::BrokenPipe)?;
        guard.stdin.flush().await.map_err(ShellError::BrokenPipe)?;

        let code_outcome = {
            let (stdout, stderr) = (&mut guard.stdout, &mut guard.stderr);
            read_until_quiescent(stdout, stderr, SHORT_EXIT_TIMEOUT, || {
                self.no_children_outside_parent_set()
            })
            .await
        };
        let code_text = match code_outcome {
            QuiescenceOutcome::Settled(s) => s,
            QuiescenceOutcome::TimedOut(s) => s,
        };

        let last_line = code_text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .next_back()
            .unwrap_or("");
        match last_line.parse::<i32>() {
            Ok(code) if code >= 0 => {
                *self.last_returncode.lock().await = Some(code);
                Ok(RawOutcome::Settled(buffer, code))
            }
            _ => Err(ShellError::CorruptedExitCode(code_text)),
        }
    }

    async fn no_children_outside_parent_set(&self) -> bool {
        self.non_parent_pids().await.map(|p| p.is_empty()).unwrap_or(true)
    }

    async fn non_parent_pids(&self) -> Result<Vec<Pid>, ShellError> {
        let pids = self.runtime.list_pids(&self.handle).await?;
        Ok(pids
            .into_iter()
            .filter(|p| !self.parent_pids.contains(&p.pid) && p.comm != "ps")
            .collect())
    }

    async fn kill_non_parent_children(&self) -> Result<(), ShellError> {
        for pid in self.non_parent_pids().await? {
            let _ = self
                .runtime
                .exec(&self.handle, &["kill".to_string(), "-9".to_string(), pid.pid.to_string()])
                .await;
        }
        Ok(())
    }

    /// Drain stdout/stderr for a bounded window after a timeout/interrupt,
    /// discarding whatever trickles out from the killed children.
    async fn drain(&self, window: Duration) {
        use std::time::Instant;

        use crate::quiescence::ReadOutcome;

        let mut guard = self.process.lock().await;
        let deadline = Instant::now() + window;
        loop {
            if Instant::now() >= deadline {
                return;
            }
            let (stdout, stderr) = (&mut guard.stdout, &mut guard.stderr);
            match crate::quiescence::read_chunk(stdout, stderr).await {
                ReadOutcome::Data(_) => continue,
                ReadOutcome::Eof | ReadOutcome::NoBytes => return,
            }
        }
    }
}
