use crate::error::{ConfigError, Result};
use crate::settings::PracticeConfig;

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Checks a resolved configuration before anything is built from it.
pub trait ConfigValidator {
    fn validate(&self) -> Result<()>;
}

impl ConfigValidator for PracticeConfig {
    fn validate(&self) -> Result<()> {
        let base_url = self.api.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "api.base_url cannot be empty".into(),
            ));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "api.base_url must be an http(s) URL, got '{base_url}'"
            )));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "api.timeout_secs must be greater than zero".into(),
            ));
        }
        if !LOG_LEVELS.contains(&self.logging.log_level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.log_level '{}' is not one of {}",
                self.logging.log_level,
                LOG_LEVELS.join(", ")
            )));
        }
        Ok(())
    }
}
