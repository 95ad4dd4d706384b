use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::dedup::KeyPolicy;

const DEFAULT_WARNING_PAUSE_MS: u64 = 3_000;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dedup: KeyPolicy,
    /// How long to hold the console after printing a record's warnings.
    pub warning_pause_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dedup: KeyPolicy::default(),
            warning_pause_ms: DEFAULT_WARNING_PAUSE_MS,
        }
    }
}

/// Overrides read from `CONVO_DEDUP_*` environment variables.
#[derive(Deserialize, Debug, Default)]
pub struct Environment {
    pub warning_pause_ms: Option<u64>,
}

impl Environment {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Result<Self> {
        envy::prefixed("CONVO_DEDUP_")
            .from_iter::<_, Environment>(vars)
            .context("Failed to read CONVO_DEDUP_* environment variables")
    }
}

impl Config {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse config TOML")
    }

    pub async fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::parse(
                &tokio::fs::read_to_string(path)
                    .await
                    .context("Failed to read config file")?,
            ),
            None => Ok(Self::default()),
        }
    }

    pub fn with_environment(mut self, environment: &Environment) -> Self {
        if let Some(pause) = environment.warning_pause_ms {
            self.warning_pause_ms = pause;
        }
        self
    }

    pub fn with_pause_disabled(mut self, disabled: bool) -> Self {
        if disabled {
            self.warning_pause_ms = 0;
        }
        self
    }

    pub fn warning_pause(&self) -> Duration {
        Duration::from_millis(self.warning_pause_ms)
    }
}
