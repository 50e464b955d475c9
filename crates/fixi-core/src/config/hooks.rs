//! Hook registry configuration.

use serde::{Deserialize, Serialize};

/// Hook registry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HooksConfig {
    /// Plugins that start out disabled.
    #[serde(default)]
    pub disabled_plugins: Vec<String>,
    /// Whether handler failures raise a `pluginError` dispatch.
    #[serde(default = "default_true")]
    pub emit_plugin_errors: bool,
    /// Number of failure reports kept by the built-in error reporter.
    #[serde(default = "default_error_history")]
    pub error_history: usize,
}

impl Default for HooksConfig {
    fn default() -> Self {
        Self {
            disabled_plugins: Vec::new(),
            emit_plugin_errors: default_true(),
            error_history: default_error_history(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_error_history() -> usize {
    50
}
