use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use taskenv_core::{normalize_under_root, Config};
use taskenv_runtime::ContainerRuntime;
use taskenv_shell::ShellBridge;

use crate::error::FsError;
use crate::quote::{heredoc_delimiter, shell_quote};
use crate::tree::DirTree;

/// Per-file match count, as returned by `grep_in_dir`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrepMatch {
    pub path: String,
    pub count: usize,
}

pub struct FsAdapter<R: ContainerRuntime> {
    bridge: Arc<ShellBridge<R>>,
    repo_root: PathBuf,
    config: Config,
}

impl<R: ContainerRuntime> FsAdapter<R> {
    pub fn new(bridge: Arc<ShellBridge<R>>, repo_root: PathBuf, config: Config) -> Self {
        Self {
            bridge,
            repo_root,
            config,
        }
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    /// Resolve `p` to an absolute path under the repo root, per spec §4.3,
    /// using the shell's live working directory.
    pub async fn normalize(&self, p: &str) -> Result<PathBuf, FsError> {
        let cwd = self.cwd().await?;
        Ok(normalize_under_root(p, &self.repo_root, &cwd))
    }

    pub async fn cwd(&self) -> Result<PathBuf, FsError> {
        let (output, _code) = self
            .bridge
            .communicate("pwd", self.config.default_timeout())
            .await?;
        Ok(PathBuf::from(output.trim()))
    }

    pub async fn exists(&self, p: &str) -> Result<bool, FsError> {
        let abs = self.normalize(p).await?;
        let (_output, code) = self
            .bridge
            .communicate(&format!("test -e {}", shell_quote(&path_str(&abs))), self.config.default_timeout())
            .await?;
        Ok(code == 0)
    }

    pub async fn read(&self, p: &str) -> Result<String, FsError> {
        let abs = self.normalize(p).await?;
        let (output, code) = self
            .bridge
            .communicate(&format!("cat {}", shell_quote(&path_str(&abs))), self.config.default_timeout())
            .await?;
        if code != 0 {
            return Err(FsError::CommandFailed {
                op: "read",
                path: path_str(&abs),
                output,
            });
        }
        Ok(output)
    }

    pub async fn write(&self, p: &str, content: &str) -> Result<(), FsError> {
        let abs = self.normalize(p).await?;
        let delim = heredoc_delimiter(content);
        let cmd = format!(
            "cat > {} <<'{delim}'\n{content}\n{delim}",
            shell_quote(&path_str(&abs))
        );
        let (output, code) = self.bridge.communicate(&cmd, self.config.default_timeout()).await?;
        if code != 0 {
            return Err(FsError::CommandFailed {
                op: "write",
                path: path_str(&abs),
                output,
            });
        }
        Ok(())
    }

    pub async fn delete(&self, p: &str) -> Result<(), FsError> {
        let abs = self.normalize(p).await?;
        let (output, code) = self
            .bridge
            .communicate(&format!("rm -f {}", shell_quote(&path_str(&abs))), self.config.default_timeout())
            .await?;
        if code != 0 {
            return Err(FsError::CommandFailed {
                op: "delete",
                path: path_str(&abs),
                output,
            });
        }
        Ok(())
    }

    pub async fn list_tree(&self, p: &str) -> Result<DirTree, FsError> {
        let abs = self.normalize(p).await?;
        let quoted = shell_quote(&path_str(&abs));
        let (output, code) = self
            .bridge
            .communicate(&format!("find {quoted} -print"), self.config.long_timeout())
            .await?;
        if code != 0 {
            return Err(FsError::CommandFailed {
                op: "list_tree",
                path: path_str(&abs),
                output,
            });
        }
        let prefix = path_str(&abs);
        let relative = output.lines().filter_map(|line| {
            line.strip_prefix(&prefix)
                .map(|rest| rest.trim_start_matches('/').to_string())
        });
        Ok(DirTree::from_relative_paths(relative))
    }

    pub async fn find_by_name(&self, p: &str, name: &str) -> Result<Vec<String>, FsError> {
        let abs = self.normalize(p).await?;
        let cmd = format!(
            "find {} -name {}",
            shell_quote(&path_str(&abs)),
            shell_quote(name)
        );
        let (output, code) = self.bridge.communicate(&cmd, self.config.long_timeout()).await?;
        if code != 0 && code != 1 {
            // find exits 1 on permission errors encountered mid-walk; still
            // surface whatever it did find rather than failing outright.
            tracing::warn!(%code, "find_by_name reported a non-fatal error");
        }
        Ok(output.lines().map(str::to_string).filter(|l| !l.is_empty()).collect())
    }

    /// Count matches of `term` per file. Refuses (per spec §4.2) once more
    /// than `grep_file_cap` files match.
    pub async fn grep_in_dir(&self, p: &str, term: &str) -> Result<Vec<GrepMatch>, FsError> {
        let abs = self.normalize(p).await?;
        let cmd = format!(
            "grep -rIc -F -- {} {} | grep -v ':0$'",
            shell_quote(term),
            shell_quote(&path_str(&abs))
        );
        let (output, _code) = self.bridge.communicate(&cmd, self.config.long_timeout()).await?;

        let mut matches = Vec::new();
        for line in output.lines() {
            if let Some((path, count)) = line.rsplit_once(':') {
                if let Ok(count) = count.trim().parse::<usize>() {
                    matches.push(GrepMatch {
                        path: path.to_string(),
                        count,
                    });
                }
            }
        }

        if matches.len() > self.config.grep_file_cap {
            return Err(FsError::TooManyMatches {
                count: matches.len(),
                cap: self.config.grep_file_cap,
            });
        }
        Ok(matches)
    }
}

fn path_str(p: &Path) -> String {
    p.to_string_lossy().into_owned()
}
