//! Payload of the `pluginError` notification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fixi_core::AppResult;
use fixi_core::error::{AppError, ErrorKind};

use crate::event::HookEvent;

/// Serializable view of a handler failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportedError {
    /// Error category.
    pub kind: ErrorKind,
    /// Error message.
    pub message: String,
}

impl From<&AppError> for ReportedError {
    fn from(err: &AppError) -> Self {
        Self {
            kind: err.kind,
            message: err.message.clone(),
        }
    }
}

/// Describes a failed handler invocation.
///
/// Dispatched on `pluginError` as `{plugin, hookName, error, event, occurredAt}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginErrorReport {
    /// Plugin owning the failed handler.
    pub plugin: String,
    /// Hook being dispatched when the handler failed.
    pub hook_name: String,
    /// The failure.
    pub error: ReportedError,
    /// The event as it stood before the failing call.
    pub event: HookEvent,
    /// When the failure was observed.
    pub occurred_at: DateTime<Utc>,
}

impl PluginErrorReport {
    /// Builds a report for a failure observed now.
    pub fn new(plugin: &str, hook_name: &str, error: &AppError, event: &HookEvent) -> Self {
        Self {
            plugin: plugin.to_string(),
            hook_name: hook_name.to_string(),
            error: ReportedError::from(error),
            event: event.clone(),
            occurred_at: Utc::now(),
        }
    }

    /// Converts the report into the event dispatched on `pluginError`.
    pub fn to_event(&self) -> AppResult<HookEvent> {
        HookEvent::try_from(serde_json::to_value(self)?)
    }

    /// Reads a report back out of a `pluginError` event.
    pub fn from_event(event: &HookEvent) -> AppResult<Self> {
        Ok(serde_json::from_value(event.clone().into_value())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_shape() {
        let report = PluginErrorReport::new(
            "p1",
            "greet",
            &AppError::plugin("boom"),
            &HookEvent::new().with_int("v", 1),
        );
        let event = report.to_event().unwrap();

        assert_eq!(event.get_string("plugin"), Some("p1"));
        assert_eq!(event.get_string("hookName"), Some("greet"));
        assert_eq!(
            event.get_data("error"),
            Some(&serde_json::json!({"kind": "Plugin", "message": "boom"}))
        );
        assert_eq!(event.get_data("event"), Some(&serde_json::json!({"v": 1})));
        assert!(event.get_string("occurredAt").is_some());

        assert_eq!(PluginErrorReport::from_event(&event).unwrap(), report);
    }
}
