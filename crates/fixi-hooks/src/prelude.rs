//! Prelude for convenient imports.

pub use async_trait::async_trait;

pub use crate::event::HookEvent;
pub use crate::handler::{ClosureHandler, HandlerResult, HookHandler};
pub use crate::plugin::{PluginDescriptor, PluginInfo, priority};
pub use crate::registry::{HandlerInfo, HookRegistry, PLUGIN_ERROR_HOOK, WILDCARD_HOOK};
pub use crate::report::PluginErrorReport;
pub use crate::reporter::ErrorReporter;

pub use crate::{hook_event, plugin_info};
