//! Hook handler trait and the closure adapter.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::BoxFuture;

use fixi_core::AppResult;

use crate::event::HookEvent;

/// Outcome of a single handler invocation.
///
/// `Ok(Some(event))` replaces the event for every later handler,
/// `Ok(None)` leaves it untouched, and `Err` is a handler failure.
pub type HandlerResult = AppResult<Option<HookEvent>>;

/// Trait for hook handler implementations.
///
/// Handlers are identified by `Arc` pointer identity, so the same
/// `Arc<dyn HookHandler>` must be kept around to unregister it later.
#[async_trait]
pub trait HookHandler: Send + Sync + std::fmt::Debug {
    /// Handles one dispatch of `hook_name` with the current event.
    async fn handle(&self, event: &HookEvent, hook_name: &str) -> HandlerResult;

    /// Name used in logs and introspection.
    fn name(&self) -> &str {
        "handler"
    }
}

type BoxedHandlerFn = Arc<dyn Fn(HookEvent, String) -> BoxFuture<'static, HandlerResult> + Send + Sync>;

/// A closure-based hook handler for quick handler creation.
///
/// The closure receives owned copies of the event and hook name, so it can
/// return an `async move` block without borrowing from the dispatcher.
pub struct ClosureHandler {
    name: String,
    handler: BoxedHandlerFn,
}

impl std::fmt::Debug for ClosureHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClosureHandler")
            .field("name", &self.name)
            .field("handler", &"<closure>")
            .finish()
    }
}

impl ClosureHandler {
    /// Creates a new closure-based handler.
    pub fn new<F, Fut>(name: &str, handler: F) -> Self
    where
        F: Fn(HookEvent, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        Self {
            name: name.to_string(),
            handler: Arc::new(move |event, hook_name| handler(event, hook_name).boxed()),
        }
    }

    /// Creates a closure handler already wrapped as `Arc<dyn HookHandler>`.
    pub fn wrap<F, Fut>(name: &str, handler: F) -> Arc<dyn HookHandler>
    where
        F: Fn(HookEvent, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        Arc::new(Self::new(name, handler))
    }
}

#[async_trait]
impl HookHandler for ClosureHandler {
    async fn handle(&self, event: &HookEvent, hook_name: &str) -> HandlerResult {
        (self.handler)(event.clone(), hook_name.to_string()).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_closure_receives_event_and_hook_name() {
        let handler = ClosureHandler::new("tagger", |event, hook_name| async move {
            Ok(Some(event.with_string("hook", &hook_name)))
        });

        let out = handler
            .handle(&HookEvent::new().with_int("v", 1), "greet")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(out.get_string("hook"), Some("greet"));
        assert_eq!(out.get_i64("v"), Some(1));
        assert_eq!(handler.name(), "tagger");
    }

    #[tokio::test]
    async fn test_wrapped_handlers_have_distinct_identity() {
        let a = ClosureHandler::wrap("a", |_, _| async { Ok(None) });
        let b = ClosureHandler::wrap("a", |_, _| async { Ok(None) });
        let a2 = a.clone();

        assert!(Arc::ptr_eq(&a, &a2));
        assert!(!Arc::ptr_eq(&a, &b));
    }
}
