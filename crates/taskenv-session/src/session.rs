use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use taskenv_core::{Config, ExitStatus, TaskRecord};
use taskenv_dispatch::Dispatcher;
use taskenv_editor::Editor;
use taskenv_fs::{shell_quote, FsAdapter};
use taskenv_runtime::{ContainerHandle, ContainerRuntime};
use taskenv_shell::ShellBridge;
use taskenv_symbols::SymbolIndex;
use tokio::sync::RwLock;

use crate::error::{SessionError, TaskEnvError};
use crate::submission::{contains_submission, extract_submission};
use crate::types::{EnvProvisioner, RepoSource, StepOutcome};

/// Substrings of `ShellError`'s `Display` output that mean the interactive
/// shell itself is dead or corrupted, not just that a command failed (spec
/// §7: "shell fatal... escalates... triggers reset_container"). The
/// dispatcher converts every error to its `Display` text at the boundary
/// (so the session continues uninterrupted on ordinary failures); this is
/// the session's only remaining way to tell a fatal shell condition apart
/// from a merely-failing command once it has crossed that boundary.
const FATAL_SHELL_MARKERS: &[&str] = &[
    "shell pipe broken, shell is presumed dead",
    "shell corrupted: non-digit exit code",
    "interrupt health check failed",
];

fn observation_is_shell_fatal(observation: &str) -> bool {
    FATAL_SHELL_MARKERS.iter().any(|m| observation.contains(m))
}

/// The shell bridge, editor, and dispatcher are rebuilt together whenever
/// the container is (re)created, since the editor and dispatcher both hold
/// an `Arc` to the bridge transitively through the filesystem adapter.
struct Rig<R: ContainerRuntime> {
    bridge: Arc<ShellBridge<R>>,
    editor: Arc<Editor<R>>,
    dispatcher: Dispatcher<R>,
}

/// Mutable per-process session (spec §3): owns the container handle, the
/// shell/editor/dispatcher rig built on top of it, and the symbol index,
/// across a `reset -> step* -> close` lifecycle. `parent_pids` and
/// `last_returncode` (named in spec's Session tuple) live inside
/// `ShellBridge`, which already tracks them; duplicating them here would
/// just be a second, staler copy.
pub struct Session<R: ContainerRuntime> {
    runtime: Arc<R>,
    image: String,
    config: Config,
    handle: RwLock<Option<ContainerHandle>>,
    rig: RwLock<Option<Rig<R>>>,
    task: RwLock<Option<TaskRecord>>,
    symbols: Arc<RwLock<SymbolIndex>>,
    last_task_env: RwLock<HashMap<String, String>>,
    /// Monotonic step counter (spec's `idx`), reset to zero on every
    /// `reset`; carried in tracing spans so a session's log can be read
    /// back in order.
    step_idx: AtomicUsize,
    persistent: bool,
}

impl<R: ContainerRuntime> Session<R> {
    pub fn new(runtime: Arc<R>, image: impl Into<String>, config: Config, persistent: bool) -> Self {
        Self {
            runtime,
            image: image.into(),
            config,
            handle: RwLock::new(None),
            rig: RwLock::new(None),
            task: RwLock::new(None),
            symbols: Arc::new(RwLock::new(SymbolIndex::default())),
            last_task_env: RwLock::new(HashMap::new()),
            step_idx: AtomicUsize::new(0),
            persistent,
        }
    }

    pub fn symbols(&self) -> &Arc<RwLock<SymbolIndex>> {
        &self.symbols
    }

    pub async fn has_task(&self) -> bool {
        self.task.read().await.is_some()
    }

    /// Acquire the container handle and build the bridge/editor/dispatcher
    /// rig on top of it, if not already done. Idempotent: a second call
    /// with a handle already present is a no-op.
    pub async fn init(&self) -> Result<(), TaskEnvError> {
        if self.handle.read().await.is_some() {
            return Ok(());
        }
        let handle = self.runtime.start(&self.image).await?;
        self.build_rig(&handle).await?;
        *self.handle.write().await = Some(handle);
        Ok(())
    }

    async fn build_rig(&self, handle: &ContainerHandle) -> Result<(), TaskEnvError> {
        let bridge = Arc::new(ShellBridge::init(self.runtime.clone(), handle.clone()).await?);
        let fs = FsAdapter::new(bridge.clone(), handle.root.clone(), self.config.clone());
        let editor = Arc::new(Editor::new(fs, self.config.clone()));
        let dispatcher = Dispatcher::new(editor.clone(), bridge.clone(), self.symbols.clone(), self.config.clone());
        *self.rig.write().await = Some(Rig { bridge, editor, dispatcher });
        Ok(())
    }

    /// `reset(index)` (spec §4.7): cd to `/`; clone or reuse the repo
    /// mirror; `git restore .`; `git reset --hard base_commit`;
    /// `git clean -fdxq`; reset task-local environment variables; build the
    /// symbol index; optionally apply the test patch for oracle mode.
    #[tracing::instrument(skip(self, provisioner), fields(instance_id = %task.instance_id))]
    pub async fn reset(
        &self,
        task: TaskRecord,
        repo_source: RepoSource,
        task_env: &HashMap<String, String>,
        provisioner: &dyn EnvProvisioner<R>,
        oracle_mode: bool,
    ) -> Result<(), TaskEnvError> {
        self.init().await?;
        let handle = self.current_handle().await?;

        // Spec's "cd to /" assumes the real container's repo lives under a
        // fixed anchor distinct from `/`. `LocalProcessRuntime` has no such
        // distinction — its container root doubles as the repo root — so
        // the stand-in realizes this step as returning to that root rather
        // than the host's actual `/`, which would escape the sandbox.
        let cd_root = format!("cd {}", shell_quote(&handle.root.to_string_lossy()));
        self.mission_critical(&cd_root, "cd_root").await?;

        match repo_source {
            RepoSource::AlreadyPresent => {}
            RepoSource::LocalMirror(ref src) => self.ensure_mirror_cloned(src).await?,
        }

        self.mission_critical("git restore .", "git_restore").await?;
        self.mission_critical(&format!("git reset --hard {}", task.base_commit), "git_reset_hard")
            .await?;
        self.mission_critical("git clean -fdxq", "git_clean").await?;

        self.reset_task_env(task_env).await?;

        provisioner
            .provision(self.runtime.as_ref(), &handle, &task)
            .await
            .map_err(TaskEnvError::Session)?;

        let index = SymbolIndex::build(self.runtime.as_ref(), &handle, "/").await?;
        *self.symbols.write().await = index;

        if oracle_mode {
            if let Some(patch) = task.test_patch.clone() {
                self.apply_patch_mission_critical(&patch, "apply_test_patch").await?;
            }
        }

        *self.task.write().await = Some(task);
        self.step_idx.store(0, Ordering::SeqCst);
        tracing::info!("session reset complete");
        Ok(())
    }

    async fn ensure_mirror_cloned(&self, src: &std::path::Path) -> Result<(), TaskEnvError> {
        let has_git = {
            let rig = self.rig.read().await;
            let rig = rig.as_ref().ok_or(SessionError::NoContainer)?;
            rig.editor.fs().exists(".git").await?
        };
        if !has_git {
            let cmd = format!("git clone {} .", shell_quote(&src.to_string_lossy()));
            self.mission_critical(&cmd, "git_clone").await?;
        }
        Ok(())
    }

    async fn reset_task_env(&self, vars: &HashMap<String, String>) -> Result<(), TaskEnvError> {
        let mut last = self.last_task_env.write().await;
        let mut script = String::new();
        for key in last.keys() {
            if !vars.contains_key(key) {
                script.push_str(&format!("unset {key}\n"));
            }
        }
        for (key, value) in vars {
            script.push_str(&format!("export {key}={}\n", shell_quote(value)));
        }
        if !script.is_empty() {
            self.mission_critical(script.trim_end(), "reset_task_env").await?;
        }
        *last = vars.clone();
        Ok(())
    }

    /// Applies the oracle test patch and leaves its text on disk at the
    /// reserved path `TEST_PATCH_PATH` rather than cleaning it up, because
    /// `submit_script` needs it there at submission time to exclude the
    /// patch's own edits from the agent's diff. The next `reset`'s
    /// `git clean -fdxq` removes the stale file once the episode ends, so no
    /// explicit cleanup here is needed.
    async fn apply_patch_mission_critical(&self, patch: &str, step: &'static str) -> Result<(), TaskEnvError> {
        {
            let rig = self.rig.read().await;
            let rig = rig.as_ref().ok_or(SessionError::NoContainer)?;
            rig.editor.fs().write(taskenv_core::TEST_PATCH_PATH, patch).await?;
        }
        self.mission_critical(&format!("git apply {}", taskenv_core::TEST_PATCH_PATH), step).await?;
        Ok(())
    }

    /// Run `cmd` through the bridge and fail the whole operation (rather
    /// than returning an observation string) on a non-zero exit, per §7's
    /// "mission-critical shell error... caller uses a wrapping primitive
    /// that closes the session and raises".
    async fn mission_critical(&self, cmd: &str, step: &'static str) -> Result<String, TaskEnvError> {
        let rig = self.rig.read().await;
        let rig = rig.as_ref().ok_or(SessionError::NoContainer)?;
        let (output, code) = rig.bridge.communicate(cmd, self.config.long_timeout()).await?;
        if code != 0 {
            return Err(SessionError::MissionCriticalFailure { step, code, output }.into());
        }
        Ok(output)
    }

    async fn current_handle(&self) -> Result<ContainerHandle, TaskEnvError> {
        self.handle
            .read()
            .await
            .clone()
            .ok_or_else(|| SessionError::NoContainer.into())
    }

    /// `step(action, thought)` (spec §4.7). `thought` is accepted for
    /// parity with the planner's action/thought pairing and logged, but
    /// carries no behavior of its own.
    #[tracing::instrument(skip(self, thought), fields(idx))]
    pub async fn step(&self, action: &str, thought: Option<&str>) -> StepOutcome {
        let idx = self.step_idx.fetch_add(1, Ordering::SeqCst);
        tracing::Span::current().record("idx", idx);
        if let Some(thought) = thought {
            tracing::debug!(thought, "planner thought");
        }

        let trimmed = action.trim();
        if trimmed == "skip" {
            return StepOutcome::finished("skipped".to_string(), ExitStatus::Skipped, None);
        }
        if trimmed.starts_with("exit") {
            return self.step_exit(trimmed).await;
        }

        if self.rig.read().await.is_none() {
            return StepOutcome::running(SessionError::NoContainer.to_string());
        }

        let observation = {
            let rig = self.rig.read().await;
            rig.as_ref().expect("checked above").dispatcher.dispatch(action).await
        };

        if observation_is_shell_fatal(&observation) {
            tracing::warn!(%observation, "fatal shell condition, resetting container");
            let recovered = self.reset_container().await;
            let report = match recovered {
                Ok(()) => format!("{observation}\n[container reset after fatal shell error]"),
                Err(e) => format!("{observation}\n[container reset failed: {e}]"),
            };
            return StepOutcome::finished(report, ExitStatus::EarlyExit, None);
        }

        if contains_submission(&observation) {
            let patch = extract_submission(&observation);
            return StepOutcome::finished(observation, ExitStatus::Submitted, patch);
        }

        StepOutcome::running(observation)
    }

    async fn step_exit(&self, action: &str) -> StepOutcome {
        if self.rig.read().await.is_none() {
            return StepOutcome::finished(SessionError::NoContainer.to_string(), ExitStatus::EarlyExit, None);
        }
        let observation = {
            let rig = self.rig.read().await;
            rig.as_ref().expect("checked above").dispatcher.dispatch("submit").await
        };
        let patch = extract_submission(&observation);
        let exit_status = if patch.is_some() {
            ExitStatus::SubmittedExit(action.to_string())
        } else {
            ExitStatus::EarlyExit
        };
        StepOutcome::finished(observation, exit_status, patch)
    }

    /// Restart just the container + shell/editor/dispatcher rig, without
    /// replaying the git sequence or rebuilding the symbol index — the
    /// episode that triggered this always ends (`done=true`), so the next
    /// thing to happen is a fresh `reset`, not continued play in this one.
    async fn reset_container(&self) -> Result<(), TaskEnvError> {
        let old = self.handle.write().await.take();
        *self.rig.write().await = None;
        if let Some(old) = old {
            let _ = self.runtime.terminate(&old).await;
            let _ = self.runtime.remove(&old).await;
        }
        self.init().await
    }

    /// `close` (spec §4.7): attempt `exit` to the shell, then tear down the
    /// container (pause if persistent, else remove it).
    pub async fn close(&self) -> Result<(), TaskEnvError> {
        if let Some(rig) = self.rig.read().await.as_ref() {
            let _ = rig.bridge.communicate("exit", self.config.default_timeout()).await;
        }
        *self.rig.write().await = None;

        if let Some(handle) = self.handle.write().await.take() {
            if self.persistent {
                self.runtime.pause(&handle).await?;
            } else {
                self.runtime.terminate(&handle).await?;
                self.runtime.remove(&handle).await?;
            }
        }
        Ok(())
    }
}

