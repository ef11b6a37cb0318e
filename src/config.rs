//! Configuration loading and defaults for taskline-tui.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::palette::THEMES;

pub const DEFAULT_PROGRAM: &str = "taskline";
/// Wrapper that runs taskline under a pseudo-terminal so it keeps its colors.
pub const DEFAULT_CAPTURE_WRAPPER: &str = "unbuffer";
pub const DEFAULT_THEME: &str = "default";

const PROGRAM_ENV: &str = "TASKLINE_TUI_PROGRAM";
const WRAPPER_ENV: &str = "TASKLINE_TUI_WRAPPER";
const LOG_ENV: &str = "TASKLINE_TUI_LOG";

// === Types ===

/// Resolved configuration, including defaults and environment overrides.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// taskline executable name or path.
    pub program: Option<String>,
    /// Color-preserving wrapper used when fetching the listing. Empty disables it.
    pub capture_wrapper: Option<String>,
    pub theme: Option<String>,
    /// Kill taskline after this many seconds. Unset waits forever.
    pub timeout_secs: Option<u64>,
    pub log_file: Option<PathBuf>,
}

// === Config Loading ===

impl Config {
    /// Load configuration from disk and merge with environment overrides.
    ///
    /// A missing file is not an error; defaults apply.
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let path = path.or_else(default_config_path);
        let mut config = match path.as_deref() {
            Some(path) if path.exists() => Self::from_file(path)?,
            _ => Config::default(),
        };
        apply_env_overrides(&mut config, |key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Validate field values.
    pub fn validate(&self) -> Result<()> {
        if let Some(program) = self.program.as_deref()
            && program.trim().is_empty()
        {
            anyhow::bail!("program cannot be empty string");
        }
        if let Some(theme) = self.theme.as_deref() {
            let normalized = theme.trim().to_ascii_lowercase();
            if !THEMES.contains(&normalized.as_str()) {
                anyhow::bail!(
                    "Invalid theme '{theme}': expected one of {}.",
                    THEMES.join(", ")
                );
            }
        }
        if self.timeout_secs == Some(0) {
            anyhow::bail!("timeout_secs must be greater than zero");
        }
        Ok(())
    }

    #[must_use]
    pub fn program(&self) -> String {
        self.program
            .as_deref()
            .map(str::trim)
            .unwrap_or(DEFAULT_PROGRAM)
            .to_string()
    }

    /// Wrapper for listing capture, `None` when disabled.
    #[must_use]
    pub fn capture_wrapper(&self) -> Option<String> {
        match self.capture_wrapper.as_deref() {
            None => Some(DEFAULT_CAPTURE_WRAPPER.to_string()),
            Some(wrapper) if wrapper.trim().is_empty() => None,
            Some(wrapper) => Some(wrapper.trim().to_string()),
        }
    }

    #[must_use]
    pub fn theme(&self) -> &str {
        self.theme.as_deref().unwrap_or(DEFAULT_THEME)
    }

    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("taskline-tui").join("config.toml"))
}

fn apply_env_overrides(config: &mut Config, var: impl Fn(&str) -> Option<String>) {
    if let Some(program) = var(PROGRAM_ENV) {
        config.program = Some(program);
    }
    if let Some(wrapper) = var(WRAPPER_ENV) {
        config.capture_wrapper = Some(wrapper);
    }
    if let Some(log) = var(LOG_ENV).filter(|v| !v.trim().is_empty()) {
        config.log_file = Some(PathBuf::from(log));
    }
}
