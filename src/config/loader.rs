use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use super::EngineConfig;
use crate::error::{Result, WorkoutError};

/// `config.toml` in the platform config directory, if one can be determined
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "ironlog", "ironlog")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Builds an [`EngineConfig`] from defaults, a TOML file and the environment
pub struct ConfigLoader {
    default_path: Option<PathBuf>,
    read_env: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            default_path: default_config_path(),
            read_env: true,
        }
    }

    /// Override where to look when no explicit file is given
    pub fn with_default_path(mut self, path: Option<PathBuf>) -> Self {
        self.default_path = path;
        self
    }

    /// Skip `IRONLOG_*` environment overrides
    pub fn without_env(mut self) -> Self {
        self.read_env = false;
        self
    }

    /// Load and validate the configuration.
    ///
    /// An explicit `path` must exist. The default location is optional.
    pub async fn load(&self, path: Option<&Path>) -> Result<EngineConfig> {
        let mut config = match path {
            Some(path) => Self::read_file(path).await?,
            None => match &self.default_path {
                Some(default) if fs::try_exists(default).await.unwrap_or(false) => {
                    Self::read_file(default).await?
                }
                _ => EngineConfig::default(),
            },
        };

        if self.read_env {
            config.merge_env_vars()?;
        }

        config.validate()?;
        Ok(config)
    }

    async fn read_file(path: &Path) -> Result<EngineConfig> {
        debug!("Loading configuration from {}", path.display());
        let content = fs::read_to_string(path).await.map_err(|e| {
            WorkoutError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        toml::from_str(&content)
            .map_err(|e| WorkoutError::Config(format!("invalid {}: {e}", path.display())))
    }
}
