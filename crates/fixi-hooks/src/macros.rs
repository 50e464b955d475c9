//! Convenience macros for plugin development.

/// Macro for building a plugin descriptor record.
///
/// # Example
/// ```rust,ignore
/// let info = plugin_info!(
///     name: "analytics",
///     version: "1.0.0",
///     description: "Counts page views"
/// );
/// ```
#[macro_export]
macro_rules! plugin_info {
    (
        name: $name:expr,
        version: $version:expr,
        description: $desc:expr
    ) => {
        $crate::plugin::PluginInfo {
            name: Some($name.to_string()),
            version: $version.to_string(),
            description: $desc.to_string(),
            ..Default::default()
        }
    };
    (
        name: $name:expr,
        version: $version:expr,
        description: $desc:expr,
        author: $author:expr
    ) => {
        $crate::plugin::PluginInfo {
            name: Some($name.to_string()),
            version: $version.to_string(),
            description: $desc.to_string(),
            author: $author.to_string(),
            ..Default::default()
        }
    };
}

/// Macro for quickly building a `HookEvent`.
///
/// # Example
/// ```rust,ignore
/// let event = hook_event!({
///     "seen" => json!([]),
///     "user" => json!("ana"),
/// });
/// ```
#[macro_export]
macro_rules! hook_event {
    () => {
        $crate::event::HookEvent::new()
    };
    ({ $($key:expr => $value:expr),* $(,)? }) => {{
        let mut event = $crate::event::HookEvent::new();
        $(
            event.insert($key, $value);
        )*
        event
    }};
}
