// Logger configuration
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggerConfig {
    /// Level for Practice Desk crates (`error`..`trace`)
    pub log_level: String,
    /// Emit JSON lines instead of the human-readable format
    pub json: bool,
    pub redaction_enabled: bool,
}

impl LoggerConfig {
    /// Filter directive scoping `log_level` to our crates and quieting HTTP internals.
    pub fn filter_directive(&self) -> String {
        let level = &self.log_level;
        format!(
            "doctor_store={level},practice={level},config_engine={level},hyper=warn,reqwest=info"
        )
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
            redaction_enabled: true,
        }
    }
}
