//! Demo settings loaded from TOML.
//!
//! Every field is optional. Resolution order: the file named by
//! `LAMBDAS_CONFIG`, then `lambdas.toml` in the working directory, then the
//! built-in defaults.

use crate::error::{LambdaError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_ENV: &str = "LAMBDAS_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "lambdas.toml";

/// Where launched tasks run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Executor {
    /// One thread per task.
    #[default]
    Threads,
    /// A fixed pool of `workers` threads.
    Pool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig {
    /// Value captured by the delayed printing task.
    pub captured_value: i32,
    pub capture_delay_ms: u64,
    pub supplier_draws: usize,
    /// Exclusive upper bound of the random supplier.
    pub supplier_bound: u32,
    /// Fixed seed for the random supplier; entropy when absent.
    pub seed: Option<u64>,
    pub executor: Executor,
    pub workers: usize,
    pub color: bool,
    pub verbose: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            captured_value: 65,
            capture_delay_ms: 500,
            supplier_draws: 10,
            supplier_bound: 1000,
            seed: None,
            executor: Executor::Threads,
            workers: num_cpus::get().max(1),
            color: true,
            verbose: false,
        }
    }
}

impl DemoConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: DemoConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| LambdaError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Resolves the config from the environment and the working directory.
    pub fn resolve() -> Result<Self> {
        let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let cwd = std::env::current_dir()?;
        Self::resolve_from(from_env, &cwd)
    }

    pub fn resolve_from(explicit: Option<PathBuf>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            tracing::debug!(path = %path.display(), "loading config from {CONFIG_ENV}");
            return Self::load_file(&path);
        }

        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "loading config from working directory");
            return Self::load_file(&candidate);
        }

        tracing::debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    pub fn validate(&self) -> Result<()> {
        if self.supplier_bound == 0 {
            return Err(LambdaError::invalid_config(
                "supplier_bound",
                "must be greater than 0",
            ));
        }
        if self.workers == 0 {
            return Err(LambdaError::invalid_config("workers", "must be greater than 0"));
        }
        Ok(())
    }

    pub fn capture_delay(&self) -> Duration {
        Duration::from_millis(self.capture_delay_ms)
    }

    /// Colors stay off when `NO_COLOR` is set, whatever the file says.
    pub fn use_colors(&self) -> bool {
        self.color && std::env::var_os("NO_COLOR").is_none()
    }
}
