//! Plugin descriptors and conventional priorities.

use serde::{Deserialize, Serialize};

/// Name used for plugins that do not carry one.
pub const ANONYMOUS_PLUGIN: &str = "anonymous";

/// Conventional handler priorities. Higher runs first; these are not bounds.
pub mod priority {
    /// Runs before normal handlers.
    pub const HIGH: i32 = 100;
    /// Default priority.
    pub const NORMAL: i32 = 0;
    /// Runs after normal handlers.
    pub const LOW: i32 = -100;
}

/// Metadata record describing a plugin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginInfo {
    /// Plugin name, used as the registry key.
    #[serde(default)]
    pub name: Option<String>,
    /// Plugin version string.
    #[serde(default)]
    pub version: String,
    /// Plugin description.
    #[serde(default)]
    pub description: String,
    /// Author or maintainer.
    #[serde(default)]
    pub author: String,
    /// Free-form metadata, opaque to the registry.
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

/// A plugin as handed to `register_plugin`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "plugin", rename_all = "snake_case")]
pub enum PluginDescriptor {
    /// A bare plugin known only by its intrinsic name.
    Named(String),
    /// A plugin described by a metadata record.
    Descriptor(PluginInfo),
}

impl PluginDescriptor {
    /// Resolves the registry key, falling back to `"anonymous"`.
    pub fn resolve_name(&self) -> String {
        let name = match self {
            Self::Named(name) => Some(name.as_str()),
            Self::Descriptor(info) => info.name.as_deref(),
        };

        match name {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => ANONYMOUS_PLUGIN.to_string(),
        }
    }
}

impl From<PluginInfo> for PluginDescriptor {
    fn from(info: PluginInfo) -> Self {
        Self::Descriptor(info)
    }
}

impl From<&str> for PluginDescriptor {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_name() {
        assert_eq!(PluginDescriptor::from("analytics").resolve_name(), "analytics");
        assert_eq!(PluginDescriptor::Named(String::new()).resolve_name(), "anonymous");

        let info = PluginInfo {
            name: Some("reporter".to_string()),
            ..Default::default()
        };
        assert_eq!(PluginDescriptor::from(info).resolve_name(), "reporter");
        assert_eq!(
            PluginDescriptor::from(PluginInfo::default()).resolve_name(),
            "anonymous"
        );
    }

    #[test]
    fn test_priority_ordering() {
        assert!(priority::HIGH > priority::NORMAL);
        assert!(priority::NORMAL > priority::LOW);
    }
}
