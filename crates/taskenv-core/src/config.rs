use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunables spec.md leaves as constants-in-prose. Loaded from an optional
/// TOML file and overlaid with `TASKENV_*` environment variables, the way
/// `codex-common::config_override` overlays CLI/env values over a base
/// config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Lines per editor page.
    pub page_size: usize,
    /// Default shell round-trip timeout, in milliseconds.
    pub default_timeout_ms: u64,
    /// Long-form timeout for installs/clones, in milliseconds.
    pub long_timeout_ms: u64,
    /// `grep_in_dir` refuses to return beyond this many matching files.
    pub grep_file_cap: usize,
    /// `search_file` refuses rather than truncating once a term matches
    /// more lines than this.
    pub search_match_cap: usize,
    /// Lines of context kept on each side of a search match.
    pub search_context_lines: usize,
    /// Byte budget for a serialized symbol-index response before `code`
    /// fields are dropped.
    pub symbol_response_byte_budget: usize,
    /// `grep_in_dir`/`find_by_name` cap on how many files to search.
    pub max_files_scanned: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_size: 200,
            default_timeout_ms: 25_000,
            long_timeout_ms: 500_000,
            grep_file_cap: 100,
            search_match_cap: 10,
            search_context_lines: 10,
            symbol_response_byte_budget: 16 * 1024,
            max_files_scanned: 50_000,
        }
    }
}

impl Config {
    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }

    pub fn long_timeout(&self) -> Duration {
        Duration::from_millis(self.long_timeout_ms)
    }

    /// Parse a TOML config file, then apply any `TASKENV_*` environment
    /// overrides on top. Missing file is not an error: the default config is
    /// used as the base.
    pub fn load(path: Option<&std::path::Path>) -> Result<Self, ConfigError> {
        let mut cfg = match path {
            Some(p) if p.exists() => {
                let text = std::fs::read_to_string(p).map_err(ConfigError::Read)?;
                toml::from_str(&text).map_err(ConfigError::Parse)?
            }
            _ => Self::default(),
        };
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("TASKENV_PAGE_SIZE") {
            if let Ok(n) = v.parse() {
                self.page_size = n;
            }
        }
        if let Ok(v) = std::env::var("TASKENV_DEFAULT_TIMEOUT_MS") {
            if let Ok(n) = v.parse() {
                self.default_timeout_ms = n;
            }
        }
        if let Ok(v) = std::env::var("TASKENV_LONG_TIMEOUT_MS") {
            if let Ok(n) = v.parse() {
                self.long_timeout_ms = n;
            }
        }
        if let Ok(v) = std::env::var("TASKENV_GREP_FILE_CAP") {
            if let Ok(n) = v.parse() {
                self.grep_file_cap = n;
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[source] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[source] toml::de::Error),
}
