use crate::error::{ConfigError, Result};
use crate::settings::PracticeConfig;
use crate::validation::ConfigValidator;
use config::{Config, Environment, File};
use std::collections::HashMap;
use std::path::PathBuf;

pub const DEFAULT_CONFIG_FILE: &str = "practice.toml";
pub const ENV_PREFIX: &str = "PRACTICE";

/// Builds a [`PracticeConfig`] from defaults, file and environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    env_overrides: Option<HashMap<String, String>>,
    skip_dotenv: bool,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads settings from `path`; a missing file is not an error.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Uses `vars` in place of the process environment.
    pub fn with_env(mut self, vars: HashMap<String, String>) -> Self {
        self.env_overrides = Some(vars);
        self.skip_dotenv = true;
        self
    }

    pub fn load(self) -> Result<PracticeConfig> {
        if !self.skip_dotenv {
            match dotenvy::dotenv() {
                Ok(path) => tracing::debug!(path = %path.display(), "loaded environment file"),
                Err(e) if e.not_found() => {}
                Err(e) => return Err(ConfigError::EnvFile(e.to_string())),
            }
        }

        let file = self
            .file
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let settings = Config::builder()
            .add_source(File::from(file.as_path()).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .source(self.env_overrides),
            )
            .build()?;

        let config: PracticeConfig = settings.try_deserialize()?;
        config.validate()?;

        tracing::debug!(
            base_url = %config.api.base_url,
            timeout_secs = config.api.timeout_secs,
            file = %file.display(),
            "configuration resolved"
        );
        Ok(config)
    }
}
