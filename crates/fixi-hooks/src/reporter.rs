//! Built-in error-reporting plugin.
//!
//! Listens on `pluginError`, logs each report, and keeps the most recent
//! ones for inspection.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::error;

use crate::event::HookEvent;
use crate::handler::{HandlerResult, HookHandler};
use crate::plugin::{PluginInfo, priority};
use crate::registry::{HookRegistry, PLUGIN_ERROR_HOOK};
use crate::report::PluginErrorReport;

/// Plugin name the reporter registers under.
pub const ERROR_REPORTER_PLUGIN: &str = "error-reporter";

/// Collects `pluginError` reports.
#[derive(Debug)]
pub struct ErrorReporter {
    capacity: usize,
    history: Mutex<VecDeque<PluginErrorReport>>,
}

impl ErrorReporter {
    /// Creates a reporter that keeps up to `capacity` reports.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            history: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Registers the reporter plugin and its `pluginError` handler.
    pub async fn install(self: &Arc<Self>, registry: &HookRegistry) {
        registry
            .register_plugin(crate::plugin_info!(
                name: ERROR_REPORTER_PLUGIN,
                version: env!("CARGO_PKG_VERSION"),
                description: "Logs and records plugin handler failures"
            ))
            .await;

        let handler: Arc<dyn HookHandler> = self.clone();
        registry
            .register(PLUGIN_ERROR_HOOK, handler, ERROR_REPORTER_PLUGIN, priority::HIGH)
            .await;
    }

    /// Returns the retained reports, oldest first.
    pub async fn recent(&self) -> Vec<PluginErrorReport> {
        self.history.lock().await.iter().cloned().collect()
    }

    /// Number of retained reports.
    pub async fn count(&self) -> usize {
        self.history.lock().await.len()
    }

    /// Drops all retained reports.
    pub async fn clear(&self) {
        self.history.lock().await.clear();
    }

    async fn record(&self, report: PluginErrorReport) {
        if self.capacity == 0 {
            return;
        }

        let mut history = self.history.lock().await;
        if history.len() == self.capacity {
            history.pop_front();
        }
        history.push_back(report);
    }
}

#[async_trait]
impl HookHandler for ErrorReporter {
    async fn handle(&self, event: &HookEvent, _hook_name: &str) -> HandlerResult {
        let report = PluginErrorReport::from_event(event)?;

        error!(
            plugin = %report.plugin,
            hook = %report.hook_name,
            kind = %report.error.kind,
            error = %report.error.message,
            "Plugin handler failed"
        );

        self.record(report).await;
        Ok(None)
    }

    fn name(&self) -> &str {
        ERROR_REPORTER_PLUGIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixi_core::error::AppError;

    fn report(plugin: &str) -> PluginErrorReport {
        PluginErrorReport::new(plugin, "greet", &AppError::plugin("boom"), &HookEvent::new())
    }

    #[tokio::test]
    async fn test_history_is_bounded() {
        let reporter = ErrorReporter::new(2);
        for plugin in ["a", "b", "c"] {
            let event = report(plugin).to_event().unwrap();
            reporter.handle(&event, PLUGIN_ERROR_HOOK).await.unwrap();
        }

        let plugins: Vec<String> = reporter.recent().await.into_iter().map(|r| r.plugin).collect();
        assert_eq!(plugins, vec!["b", "c"]);

        reporter.clear().await;
        assert_eq!(reporter.count().await, 0);
    }

    #[tokio::test]
    async fn test_rejects_malformed_reports() {
        let reporter = ErrorReporter::new(5);
        let result = reporter
            .handle(&HookEvent::new().with_int("v", 1), PLUGIN_ERROR_HOOK)
            .await;

        assert!(result.is_err());
        assert_eq!(reporter.count().await, 0);
    }

    #[tokio::test]
    async fn test_install_registers_plugin_and_handler() {
        let registry = HookRegistry::new();
        let reporter = Arc::new(ErrorReporter::new(5));
        reporter.install(&registry).await;

        assert!(registry.plugin(ERROR_REPORTER_PLUGIN).await.is_some());
        let hooks = registry.hooks().await;
        assert_eq!(hooks[PLUGIN_ERROR_HOOK][0].plugin, ERROR_REPORTER_PLUGIN);
        assert_eq!(hooks[PLUGIN_ERROR_HOOK][0].priority, priority::HIGH);
    }
}
