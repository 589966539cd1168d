//! Planner configuration.
//!
//! Layered the usual way: `~/.config/planner/config.toml` first, then
//! `PLANNER_*` environment variables on top. The remote store is active only
//! when both `remote_url` and `remote_key` are present; otherwise the app
//! runs local-only with no feature loss beyond cross-device sync.

use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{PlannerError, PlannerResult};

static DEFAULT_DATA_DIR: &str = "~/.local/share/planner";

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

#[derive(Deserialize, Clone)]
pub struct PlannerConfig {
    /// Directory holding the local key-value store.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Remote store endpoint URL (e.g. a Supabase project URL).
    pub remote_url: Option<String>,

    /// Remote store access key.
    pub remote_key: Option<String>,
}

impl PlannerConfig {
    pub fn config_path() -> PlannerResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| PlannerError::Config("Could not determine config directory".into()))?
            .join("planner");

        Ok(config_dir.join("config.toml"))
    }

    pub fn load() -> PlannerResult<Self> {
        let config_path = Self::config_path()?;

        Config::builder()
            .add_source(File::from(config_path).required(false))
            .add_source(Environment::with_prefix("PLANNER"))
            .build()
            .map_err(|e| PlannerError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| PlannerError::Config(e.to_string()))
    }

    /// Data directory with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();
        PathBuf::from(expanded)
    }

    /// Remote endpoint and key, when both are configured.
    pub fn remote(&self) -> Option<(&str, &str)> {
        match (self.remote_url.as_deref(), self.remote_key.as_deref()) {
            (Some(url), Some(key)) => Some((url, key)),
            _ => None,
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            data_dir: default_data_dir(),
            remote_url: None,
            remote_key: None,
        }
    }
}
