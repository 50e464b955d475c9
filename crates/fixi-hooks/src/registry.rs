//! Hook registry: plugins register handlers by hook name with priority
//! ordering, and dispatch runs them in sequence over a shared event.
//!
//! Dispatch makes two passes: the handlers registered on the hook itself,
//! then the handlers registered on the wildcard hook `*`. Each handler sees
//! the event left by the one before it. A handler that fails (returns `Err`
//! or panics) is logged and skipped over, and a `pluginError` dispatch is
//! spawned in the background to report it.

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use fixi_core::config::hooks::HooksConfig;
use fixi_core::error::AppError;

use crate::event::HookEvent;
use crate::handler::HookHandler;
use crate::plugin::{PluginDescriptor, priority};
use crate::report::PluginErrorReport;

/// Hook whose handlers run on every dispatch, after the hook's own handlers.
pub const WILDCARD_HOOK: &str = "*";

/// Hook dispatched when a handler fails.
pub const PLUGIN_ERROR_HOOK: &str = "pluginError";

/// Entry in the hook table.
#[derive(Debug, Clone)]
struct HandlerEntry {
    /// The handler.
    handler: Arc<dyn HookHandler>,
    /// Plugin that registered this handler.
    plugin: String,
    /// Priority (higher = earlier execution).
    priority: i32,
}

/// Introspection view of a registered handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerInfo {
    /// Owning plugin.
    pub plugin: String,
    /// Registration priority.
    pub priority: i32,
    /// Handler name as reported by [`HookHandler::name`].
    pub handler: String,
}

#[derive(Debug, Default)]
struct RegistryState {
    /// Hook name → handlers sorted by descending priority.
    hooks: HashMap<String, Vec<HandlerEntry>>,
    /// Plugin name → descriptor.
    plugins: HashMap<String, PluginDescriptor>,
    /// Plugins whose handlers are skipped.
    disabled: HashSet<String>,
}

#[derive(Debug)]
struct RegistryInner {
    state: RwLock<RegistryState>,
    emit_plugin_errors: bool,
}

#[derive(Debug, Clone, Copy)]
enum Pass {
    Specific,
    Wildcard,
}

impl Pass {
    fn list_name<'a>(&self, hook_name: &'a str) -> &'a str {
        match self {
            Self::Specific => hook_name,
            Self::Wildcard => WILDCARD_HOOK,
        }
    }
}

impl std::fmt::Display for Pass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Specific => write!(f, "specific"),
            Self::Wildcard => write!(f, "wildcard"),
        }
    }
}

/// Registry of hook handlers, plugins, and disabled plugins.
///
/// Cloning is cheap and yields a handle to the same registry. Independent
/// registries are created with [`HookRegistry::new`].
#[derive(Debug, Clone)]
pub struct HookRegistry {
    inner: Arc<RegistryInner>,
}

impl HookRegistry {
    /// Creates a new empty hook registry.
    pub fn new() -> Self {
        Self::from_config(&HooksConfig::default())
    }

    /// Creates a registry with the configured plugins already disabled.
    pub fn from_config(config: &HooksConfig) -> Self {
        let state = RegistryState {
            disabled: config.disabled_plugins.iter().cloned().collect(),
            ..Default::default()
        };

        Self {
            inner: Arc::new(RegistryInner {
                state: RwLock::new(state),
                emit_plugin_errors: config.emit_plugin_errors,
            }),
        }
    }

    /// Registers a handler for `hook_name` on behalf of `plugin`.
    ///
    /// Handlers run highest priority first; equal priorities keep their
    /// registration order. Registering the same handler twice adds two entries.
    pub async fn register(
        &self,
        hook_name: &str,
        handler: Arc<dyn HookHandler>,
        plugin: &str,
        priority: i32,
    ) {
        let mut state = self.inner.state.write().await;
        let entries = state.hooks.entry(hook_name.to_string()).or_default();

        entries.push(HandlerEntry {
            handler,
            plugin: plugin.to_string(),
            priority,
        });

        // Stable sort keeps insertion order among equal priorities
        entries.sort_by_key(|e| Reverse(e.priority));

        info!(
            hook = %hook_name,
            plugin = %plugin,
            priority = priority,
            "Hook handler registered"
        );
    }

    /// Registers a handler at normal priority.
    pub async fn on(&self, hook_name: &str, handler: Arc<dyn HookHandler>, plugin: &str) {
        self.register(hook_name, handler, plugin, priority::NORMAL)
            .await;
    }

    /// Removes every entry for `hook_name` whose handler is `handler`,
    /// regardless of owning plugin. Returns the number of entries removed.
    pub async fn unregister(&self, hook_name: &str, handler: &Arc<dyn HookHandler>) -> usize {
        let mut state = self.inner.state.write().await;

        let Some(entries) = state.hooks.get_mut(hook_name) else {
            return 0;
        };

        let before = entries.len();
        entries.retain(|e| !Arc::ptr_eq(&e.handler, handler));
        let removed = before - entries.len();

        if entries.is_empty() {
            state.hooks.remove(hook_name);
        }

        debug!(hook = %hook_name, removed = removed, "Hook handler unregistered");
        removed
    }

    /// Alias for [`HookRegistry::unregister`].
    pub async fn off(&self, hook_name: &str, handler: &Arc<dyn HookHandler>) -> usize {
        self.unregister(hook_name, handler).await
    }

    /// Removes all of a plugin's handlers across every hook, wildcard included.
    /// Returns the number of entries removed.
    pub async fn remove_plugin_hooks(&self, plugin: &str) -> usize {
        let mut state = self.inner.state.write().await;
        let removed = Self::remove_entries_for(&mut state, plugin);

        info!(plugin = %plugin, removed = removed, "All hooks removed for plugin");
        removed
    }

    fn remove_entries_for(state: &mut RegistryState, plugin: &str) -> usize {
        let mut removed = 0;

        for entries in state.hooks.values_mut() {
            let before = entries.len();
            entries.retain(|e| e.plugin != plugin);
            removed += before - entries.len();
        }

        // Remove empty hook entries
        state.hooks.retain(|_, entries| !entries.is_empty());

        removed
    }

    /// Dispatches `hook_name` with `event` and returns the final event.
    ///
    /// Runs the hook's handlers, then the wildcard handlers. Each pass works on
    /// a snapshot of its handler list taken when the pass starts, while the
    /// disabled check is made right before each handler runs. Never fails:
    /// handler failures are logged and reported on `pluginError`.
    pub async fn dispatch(&self, hook_name: &str, event: HookEvent) -> HookEvent {
        let mut result = event;

        debug!(hook = %hook_name, "Dispatching hook");

        for pass in [Pass::Specific, Pass::Wildcard] {
            let entries = self.snapshot(pass.list_name(hook_name)).await;
            if entries.is_empty() {
                continue;
            }

            debug!(
                hook = %hook_name,
                pass = %pass,
                handler_count = entries.len(),
                "Running handlers"
            );

            for entry in &entries {
                if self.is_disabled(&entry.plugin).await {
                    debug!(
                        hook = %hook_name,
                        pass = %pass,
                        plugin = %entry.plugin,
                        "Skipping disabled plugin"
                    );
                    continue;
                }

                result = self.run_entry(entry, hook_name, pass, result).await;
            }
        }

        result
    }

    /// Dispatches `hook_name` starting from an empty event.
    pub async fn dispatch_default(&self, hook_name: &str) -> HookEvent {
        self.dispatch(hook_name, HookEvent::default()).await
    }

    async fn snapshot(&self, list_name: &str) -> Vec<HandlerEntry> {
        let state = self.inner.state.read().await;
        state.hooks.get(list_name).cloned().unwrap_or_default()
    }

    async fn run_entry(
        &self,
        entry: &HandlerEntry,
        hook_name: &str,
        pass: Pass,
        current: HookEvent,
    ) -> HookEvent {
        debug!(
            hook = %hook_name,
            pass = %pass,
            plugin = %entry.plugin,
            handler = %entry.handler.name(),
            "Executing handler"
        );

        let outcome = AssertUnwindSafe(entry.handler.handle(&current, hook_name))
            .catch_unwind()
            .await;

        let err = match outcome {
            Ok(Ok(Some(next))) => return next,
            Ok(Ok(None)) => return current,
            Ok(Err(err)) => err,
            Err(panic) => AppError::panic(panic_message(&*panic)),
        };

        error!(
            hook = %hook_name,
            pass = %pass,
            plugin = %entry.plugin,
            error = %err,
            "Hook handler failed; continuing with previous event"
        );

        self.report_failure(PluginErrorReport::new(
            &entry.plugin,
            hook_name,
            &err,
            &current,
        ));

        current
    }

    /// Spawns a detached `pluginError` dispatch for a failed handler.
    ///
    /// Failures that happen while dispatching `pluginError` itself are only
    /// logged, otherwise a failing listener would report itself forever.
    fn report_failure(&self, report: PluginErrorReport) {
        if !self.inner.emit_plugin_errors {
            return;
        }

        if report.hook_name == PLUGIN_ERROR_HOOK {
            warn!(
                plugin = %report.plugin,
                "Handler failed while handling pluginError; not reporting again"
            );
            return;
        }

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                warn!(error = %e, plugin = %report.plugin, "No runtime to report plugin error on");
                return;
            }
        };

        let event = match report.to_event() {
            Ok(event) => event,
            Err(e) => {
                error!(error = %e, plugin = %report.plugin, "Failed to encode plugin error");
                return;
            }
        };

        let registry = self.clone();
        runtime.spawn(async move {
            let dispatched = AssertUnwindSafe(registry.dispatch(PLUGIN_ERROR_HOOK, event))
                .catch_unwind()
                .await;

            if let Err(panic) = dispatched {
                error!(
                    error = %panic_message(&*panic),
                    "Error dispatching plugin error"
                );
            }
        });
    }

    /// Stores a plugin descriptor, replacing any plugin of the same name.
    /// Returns the name it was stored under.
    pub async fn register_plugin(&self, plugin: impl Into<PluginDescriptor>) -> String {
        let descriptor = plugin.into();
        let name = descriptor.resolve_name();

        let mut state = self.inner.state.write().await;
        if state.plugins.insert(name.clone(), descriptor).is_some() {
            info!(plugin = %name, "Plugin replaced");
        } else {
            info!(plugin = %name, "Plugin registered");
        }

        name
    }

    /// Removes a plugin's descriptor, all of its handlers, and its disabled flag.
    pub async fn unregister_plugin(&self, plugin: &str) -> Option<PluginDescriptor> {
        let mut state = self.inner.state.write().await;

        let descriptor = state.plugins.remove(plugin);
        let removed = Self::remove_entries_for(&mut state, plugin);
        state.disabled.remove(plugin);

        info!(plugin = %plugin, handlers_removed = removed, "Plugin unregistered");
        descriptor
    }

    /// Disables a plugin; its handlers are skipped until it is enabled again.
    pub async fn disable_plugin(&self, plugin: &str) {
        let mut state = self.inner.state.write().await;
        state.disabled.insert(plugin.to_string());

        info!(plugin = %plugin, disabled = state.disabled.len(), "Plugin disabled");
    }

    /// Re-enables a disabled plugin.
    pub async fn enable_plugin(&self, plugin: &str) {
        let mut state = self.inner.state.write().await;
        state.disabled.remove(plugin);

        info!(plugin = %plugin, disabled = state.disabled.len(), "Plugin enabled");
    }

    /// Checks whether a plugin is disabled.
    pub async fn is_disabled(&self, plugin: &str) -> bool {
        let state = self.inner.state.read().await;
        state.disabled.contains(plugin)
    }

    /// Returns the disabled plugin names.
    pub async fn disabled_plugins(&self) -> BTreeSet<String> {
        let state = self.inner.state.read().await;
        state.disabled.iter().cloned().collect()
    }

    /// Returns a copy of the plugin registry.
    pub async fn plugins(&self) -> HashMap<String, PluginDescriptor> {
        let state = self.inner.state.read().await;
        state.plugins.clone()
    }

    /// Gets a plugin descriptor by name.
    pub async fn plugin(&self, plugin: &str) -> Option<PluginDescriptor> {
        let state = self.inner.state.read().await;
        state.plugins.get(plugin).cloned()
    }

    /// Returns a snapshot of the hook table in execution order.
    pub async fn hooks(&self) -> HashMap<String, Vec<HandlerInfo>> {
        let state = self.inner.state.read().await;
        state
            .hooks
            .iter()
            .map(|(hook, entries)| {
                let infos = entries
                    .iter()
                    .map(|e| HandlerInfo {
                        plugin: e.plugin.clone(),
                        priority: e.priority,
                        handler: e.handler.name().to_string(),
                    })
                    .collect();
                (hook.clone(), infos)
            })
            .collect()
    }

    /// Returns whether any handlers are registered for a hook.
    pub async fn has_handlers(&self, hook_name: &str) -> bool {
        self.handler_count(hook_name).await > 0
    }

    /// Returns the number of handlers registered for a hook.
    pub async fn handler_count(&self, hook_name: &str) -> usize {
        let state = self.inner.state.read().await;
        state.hooks.get(hook_name).map(|e| e.len()).unwrap_or(0)
    }

    /// Returns all hook names with at least one handler, sorted.
    pub async fn registered_hooks(&self) -> Vec<String> {
        let state = self.inner.state.read().await;
        let mut hooks: Vec<String> = state.hooks.keys().cloned().collect();
        hooks.sort();
        hooks
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("handler panicked: {s}")
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("handler panicked: {s}")
    } else {
        "handler panicked".to_string()
    }
}
