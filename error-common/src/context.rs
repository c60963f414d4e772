use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Error context information attached to a reported failure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorContext {
    /// Store or dialog operation that failed, e.g. `update_report`
    pub operation: Option<String>,
    /// Kind of record involved (`patient`, `report`)
    pub entity: Option<String>,
    /// Identifier of the record involved
    pub entity_id: Option<String>,
    pub additional: BTreeMap<String, String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    pub fn with_entity(mut self, entity: impl Into<String>, id: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self.entity_id = Some(id.into());
        self
    }

    pub fn add_context<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.additional.insert(key.into(), value.into());
        self
    }

    /// Compact `key=value` rendering for log lines.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(operation) = &self.operation {
            parts.push(format!("operation={operation}"));
        }
        if let (Some(entity), Some(id)) = (&self.entity, &self.entity_id) {
            parts.push(format!("{entity}={id}"));
        }
        for (key, value) in &self.additional {
            parts.push(format!("{key}={value}"));
        }
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_orders_fields() {
        let ctx = ErrorContext::new()
            .with_operation("delete_report")
            .with_entity("report", "r1")
            .add_context("view", "claims");
        assert_eq!(ctx.describe(), "operation=delete_report report=r1 view=claims");
    }

    #[test]
    fn test_empty_context_describes_as_empty() {
        assert!(ErrorContext::new().describe().is_empty());
    }
}
