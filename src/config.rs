use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Error;

pub const CONFIG_FILE: &str = "config.json";

/// Settings kept between invocations. Loaded once at startup and passed down explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default, alias = "task_folder", skip_serializing_if = "Option::is_none")]
    pub task_dir: Option<PathBuf>,
}

impl Config {
    /// Reads the configuration at `path`. A missing file yields the default configuration, which
    /// is written back so the file exists for the next run.
    pub async fn load_or_create(path: &Path) -> Result<Self> {
        match tokio::fs::read(path).await {
            Ok(data) => serde_json::from_slice(&data)
                .with_context(|| format!("Failed to parse configuration {path:?}")),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No configuration at {path:?}, creating default");
                let config = Config::default();
                config.save(path).await?;
                Ok(config)
            }
            Err(e) => Err(e).with_context(|| format!("Failed to read configuration {path:?}")),
        }
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_vec_pretty(self)?;
        tokio::fs::write(path, data)
            .await
            .with_context(|| format!("Failed to write configuration {path:?}"))?;
        info!("Saved configuration to {path:?}");
        Ok(())
    }

    /// `override_dir` wins over the stored directory without being persisted.
    pub fn with_override(self, override_dir: Option<PathBuf>) -> Self {
        match override_dir {
            Some(dir) => Config {
                task_dir: Some(dir),
            },
            None => self,
        }
    }

    pub fn task_dir(&self) -> Result<&Path, Error> {
        match &self.task_dir {
            Some(dir) if !dir.as_os_str().is_empty() => Ok(dir),
            _ => Err(Error::NotConfigured),
        }
    }
}
