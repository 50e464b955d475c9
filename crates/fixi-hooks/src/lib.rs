//! # fixi-hooks
//!
//! Plugin hook system for Fixi. Provides:
//!
//! - Hook registry with priority-ordered handler registration
//! - Sequential dispatch where each handler may replace the event
//! - A wildcard hook (`*`) whose handlers run on every dispatch
//! - Plugin descriptors and per-plugin enable/disable
//! - Failure isolation with background `pluginError` reporting
//! - A built-in error-reporter plugin

pub mod event;
pub mod handler;
pub mod macros;
pub mod plugin;
pub mod prelude;
pub mod registry;
pub mod report;
pub mod reporter;

pub use event::HookEvent;
pub use handler::{ClosureHandler, HandlerResult, HookHandler};
pub use plugin::{PluginDescriptor, PluginInfo, priority};
pub use registry::{HandlerInfo, HookRegistry, PLUGIN_ERROR_HOOK, WILDCARD_HOOK};
pub use report::PluginErrorReport;
pub use reporter::ErrorReporter;
