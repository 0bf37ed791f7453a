//! YAML configuration parsing.

use std::path::Path;

use super::error::ConfigError;
use super::types::{MAX_WORKERS_LIMIT, SchedulerConfig};

/// YAML configuration loader.
pub struct YamlLoader;

impl YamlLoader {
    /// Load scheduler configuration from a file.
    pub fn load_scheduler_config(path: impl AsRef<Path>) -> Result<SchedulerConfig, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_scheduler_config(&content)
    }

    /// Parse scheduler configuration from a YAML string.
    ///
    /// An empty document yields the default configuration.
    pub fn parse_scheduler_config(yaml: &str) -> Result<SchedulerConfig, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(SchedulerConfig::default());
        }
        let config: SchedulerConfig = serde_yaml::from_str(yaml)?;
        Self::validate_scheduler_config(&config)?;
        Ok(config)
    }

    fn validate_scheduler_config(config: &SchedulerConfig) -> Result<(), ConfigError> {
        if config.max_workers > MAX_WORKERS_LIMIT {
            return Err(ConfigError::InvalidConfig(format!(
                "max_workers must be at most {}, got {}",
                MAX_WORKERS_LIMIT, config.max_workers
            )));
        }
        Ok(())
    }
}
