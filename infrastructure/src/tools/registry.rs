//! Tool Registry
//!
//! The [`ToolRegistry`] is the single dispatcher behind [`ToolExecutorPort`].
//! It owns one ordered catalogue holding two kinds of tools:
//!
//! - **internal** tools, served in-process by a [`ToolHandler`]
//! - **external** tools, whose definition carries a `backend` tag and which
//!   are served through a [`BackendTransport`]
//!
//! # Usage
//!
//! ```ignore
//! let registry = ToolRegistry::new_cyclic(transport, |weak, registry| {
//!     registry.register_internal(automation_definition(), Arc::new(AutomationHandler::new(weak.clone(), ..)));
//!     for tool in default_external_tools() {
//!         registry.register_external(tool);
//!     }
//! });
//!
//! let text = registry.execute_text("list_containers", HashMap::new()).await;
//! ```
//!
//! # Resolution
//!
//! Internal handlers are looked up first, so an internal tool always wins a
//! name collision. A name that is neither internal nor tagged with a backend
//! yields the same not-found result every time.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Weak};
use std::time::Instant;

use async_trait::async_trait;
use futures::FutureExt;
use steward_application::ports::backend_transport::BackendTransport;
use steward_application::ports::tool_executor::ToolExecutorPort;
use steward_domain::tool::note::{ensure_note_fields, is_note_creation_tool};
use steward_domain::{ToolCall, ToolDefinition, ToolError, ToolHandler, ToolResult, ToolSpec};
use tracing::{debug, warn};

/// Dispatcher for internal and external tools
///
/// Immutable once shared: all registration happens before it is wrapped in
/// an `Arc`, so concurrent `execute` calls need no locking.
pub struct ToolRegistry {
    /// Catalogue in registration order
    tool_spec: ToolSpec,
    /// Tool name -> in-process handler
    internal: HashMap<String, Arc<dyn ToolHandler>>,
    transport: Arc<dyn BackendTransport>,
}

impl ToolRegistry {
    /// Create an empty registry that reaches backends through `transport`
    pub fn new(transport: Arc<dyn BackendTransport>) -> Self {
        Self {
            tool_spec: ToolSpec::new(),
            internal: HashMap::new(),
            transport,
        }
    }

    /// Build a shared registry whose handlers may hold a weak reference to it.
    ///
    /// `build` receives the registry's own `Weak` before the `Arc` exists, so
    /// a handler such as the planner tool can dispatch through the registry
    /// that contains it.
    pub fn new_cyclic<F>(transport: Arc<dyn BackendTransport>, build: F) -> Arc<Self>
    where
        F: FnOnce(&Weak<ToolRegistry>, &mut ToolRegistry),
    {
        Arc::new_cyclic(|weak| {
            let mut registry = Self::new(transport);
            build(weak, &mut registry);
            registry
        })
    }

    /// Register an in-process tool.
    ///
    /// Re-registering a name replaces handler and definition in place. Any
    /// backend tag on `definition` is dropped.
    pub fn register_internal(&mut self, mut definition: ToolDefinition, handler: Arc<dyn ToolHandler>) {
        definition.backend = None;
        definition.remote_name = None;
        debug!(tool = %definition.name, "Registered internal tool");
        self.internal.insert(definition.name.clone(), handler);
        self.tool_spec.insert(definition);
    }

    /// Register a backend-served tool. Returns `false` when it was skipped.
    ///
    /// Skipped when the definition has no backend tag or when an internal
    /// tool already owns the name.
    pub fn register_external(&mut self, definition: ToolDefinition) -> bool {
        let Some(backend) = definition.backend.as_deref() else {
            warn!(tool = %definition.name, "External tool has no backend tag, skipping");
            return false;
        };
        if self.internal.contains_key(&definition.name) {
            warn!(
                tool = %definition.name,
                backend,
                "Name already taken by an internal tool, skipping"
            );
            return false;
        }
        debug!(tool = %definition.name, backend, "Registered external tool");
        self.tool_spec.insert(definition);
        true
    }

    pub fn is_internal(&self, name: &str) -> bool {
        self.internal.contains_key(name)
    }

    /// Registry statistics
    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            internal: self.internal.len(),
            external: self.tool_spec.all().filter(|t| t.is_external()).count(),
        }
    }

    async fn run_internal(&self, handler: &Arc<dyn ToolHandler>, call: &ToolCall) -> ToolResult {
        let outcome = AssertUnwindSafe(handler.call(call)).catch_unwind().await;
        match outcome {
            Ok(Ok(output)) => ToolResult::success(&call.tool_name, output),
            Ok(Err(e)) => {
                warn!(tool = %call.tool_name, error = %e, "Internal tool failed");
                ToolResult::failure(&call.tool_name, ToolError::execution_failed(e.to_string()))
            }
            Err(panic) => {
                let detail = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "handler panicked".to_string());
                warn!(tool = %call.tool_name, panic = %detail, "Internal tool panicked");
                ToolResult::failure(&call.tool_name, ToolError::execution_failed(detail))
            }
        }
    }

    async fn run_external(&self, definition: &ToolDefinition, backend: &str, call: &ToolCall) -> ToolResult {
        match self
            .transport
            .call_tool(backend, definition.wire_name(), call.arguments_json())
            .await
        {
            Ok(output) => ToolResult::success(&call.tool_name, output),
            Err(e) => ToolResult::failure(&call.tool_name, ToolError::transport_failed(e.to_string())),
        }
        .with_backend(backend)
    }
}

/// Statistics about the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryStats {
    pub internal: usize,
    pub external: usize,
}

#[async_trait]
impl ToolExecutorPort for ToolRegistry {
    fn tool_spec(&self) -> &ToolSpec {
        &self.tool_spec
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        let start = Instant::now();
        let mut call = call.clone();
        if is_note_creation_tool(&call.tool_name)
            && ensure_note_fields(&mut call.arguments, chrono::Utc::now().timestamp())
        {
            warn!(tool = %call.tool_name, "Filled missing note title or content");
        }

        let result = if let Some(handler) = self.internal.get(&call.tool_name) {
            self.run_internal(handler, &call).await
        } else if let Some((definition, backend)) = self
            .tool_spec
            .get(&call.tool_name)
            .and_then(|d| d.backend.as_deref().map(|b| (d, b)))
        {
            self.run_external(definition, backend, &call).await
        } else {
            debug!(tool = %call.tool_name, "Tool not found");
            return ToolResult::failure(&call.tool_name, ToolError::not_found(&call.tool_name));
        };

        let elapsed = start.elapsed().as_millis() as u64;
        debug!(tool = %call.tool_name, success = result.is_success(), elapsed_ms = elapsed, "Tool dispatched");
        result.with_duration(elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use steward_application::ports::backend_transport::TransportError;
    use steward_domain::HandlerError;

    /// Records every backend call and answers from a fixed table
    struct MockTransport {
        replies: HashMap<String, Result<String, String>>,
        calls: Mutex<Vec<(String, String, serde_json::Value)>>,
    }

    impl MockTransport {
        fn new() -> Self {
            Self {
                replies: HashMap::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn with_reply(mut self, tool: &str, reply: Result<&str, &str>) -> Self {
            self.replies.insert(
                tool.to_string(),
                reply.map(str::to_string).map_err(str::to_string),
            );
            self
        }
    }

    #[async_trait]
    impl BackendTransport for MockTransport {
        async fn call_tool(
            &self,
            backend: &str,
            tool_name: &str,
            arguments: serde_json::Value,
        ) -> Result<String, TransportError> {
            self.calls
                .lock()
                .unwrap()
                .push((backend.to_string(), tool_name.to_string(), arguments));
            match self.replies.get(tool_name) {
                Some(Ok(out)) => Ok(out.clone()),
                Some(Err(e)) => Err(TransportError::Remote(e.clone())),
                None => Ok(format!("{} ok", tool_name)),
            }
        }
    }

    struct EchoHandler;

    #[async_trait]
    impl ToolHandler for EchoHandler {
        async fn call(&self, call: &ToolCall) -> Result<String, HandlerError> {
            Ok(format!("echo {}", call.get_string("text").unwrap_or_default()))
        }
    }

    struct FailingHandler;

    #[async_trait]
    impl ToolHandler for FailingHandler {
        async fn call(&self, _call: &ToolCall) -> Result<String, HandlerError> {
            Err(HandlerError::Failed("disk full".to_string()))
        }
    }

    struct PanickingHandler;

    #[async_trait]
    impl ToolHandler for PanickingHandler {
        async fn call(&self, _call: &ToolCall) -> Result<String, HandlerError> {
            panic!("index out of bounds");
        }
    }

    fn registry(transport: Arc<MockTransport>) -> ToolRegistry {
        let mut registry = ToolRegistry::new(transport);
        registry.register_internal(ToolDefinition::new("echo", "Echo"), Arc::new(EchoHandler));
        registry.register_external(
            ToolDefinition::new("list_containers", "List containers").with_backend("docker"),
        );
        registry.register_external(
            ToolDefinition::new("duckduckgo_search", "Search")
                .with_backend("duckduckgo")
                .with_remote_name("search"),
        );
        registry.register_external(
            ToolDefinition::new("create_note", "Create note").with_backend("obsidian"),
        );
        registry
    }

    #[tokio::test]
    async fn test_internal_tool() {
        let registry = registry(Arc::new(MockTransport::new()));
        let call = ToolCall::new("echo").with_arg("text", "hi");
        let result = registry.execute(&call).await;
        assert_eq!(result.text(), "echo hi");
        assert!(result.metadata.backend.is_none());
    }

    #[tokio::test]
    async fn test_not_found_is_deterministic() {
        let registry = registry(Arc::new(MockTransport::new()));
        let first = registry.execute_text("nonexistent_tool", HashMap::new()).await;
        let second = registry.execute_text("nonexistent_tool", HashMap::new()).await;
        assert_eq!(first, "Error: Tool 'nonexistent_tool' not found.");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_external_uses_backend_tag_and_remote_name() {
        let transport = Arc::new(MockTransport::new());
        let registry = registry(transport.clone());

        let call = ToolCall::new("duckduckgo_search").with_arg("query", "rust");
        let result = registry.execute(&call).await;

        assert!(result.is_success());
        assert_eq!(result.metadata.backend.as_deref(), Some("duckduckgo"));
        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls[0].0, "duckduckgo");
        assert_eq!(calls[0].1, "search");
        assert_eq!(calls[0].2["query"], "rust");
    }

    #[tokio::test]
    async fn test_transport_failure_text() {
        let transport = Arc::new(
            MockTransport::new().with_reply("list_containers", Err("docker daemon not running")),
        );
        let registry = registry(transport);
        let text = registry.execute_text("list_containers", HashMap::new()).await;
        assert_eq!(text, "Tool Execution Failed: docker daemon not running");
    }

    #[tokio::test]
    async fn test_handler_error_and_panic_become_text() {
        let mut registry = ToolRegistry::new(Arc::new(MockTransport::new()));
        registry.register_internal(ToolDefinition::new("fail", ""), Arc::new(FailingHandler));
        registry.register_internal(ToolDefinition::new("boom", ""), Arc::new(PanickingHandler));

        assert_eq!(
            registry.execute_text("fail", HashMap::new()).await,
            "Error executing tool fail: disk full"
        );
        assert_eq!(
            registry.execute_text("boom", HashMap::new()).await,
            "Error executing tool boom: index out of bounds"
        );
    }

    #[tokio::test]
    async fn test_internal_wins_name_collision() {
        let transport = Arc::new(MockTransport::new());
        let mut registry = registry(transport.clone());
        let added = registry.register_external(ToolDefinition::new("echo", "remote echo").with_backend("x"));

        assert!(!added);
        assert_eq!(registry.tool_spec().len(), 4);
        let text = registry
            .execute(&ToolCall::new("echo").with_arg("text", "local"))
            .await
            .into_text();
        assert_eq!(text, "echo local");
        assert!(transport.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_register_internal_is_idempotent() {
        let mut registry = registry(Arc::new(MockTransport::new()));
        registry.register_internal(ToolDefinition::new("echo", "Echo v2"), Arc::new(FailingHandler));

        assert_eq!(registry.tool_spec().names().filter(|n| *n == "echo").count(), 1);
        assert_eq!(registry.tool_spec().get("echo").unwrap().description, "Echo v2");
        assert_eq!(
            registry.execute_text("echo", HashMap::new()).await,
            "Error executing tool echo: disk full"
        );
    }

    #[tokio::test]
    async fn test_untagged_external_skipped() {
        let mut registry = registry(Arc::new(MockTransport::new()));
        assert!(!registry.register_external(ToolDefinition::new("mystery", "")));
        assert!(!registry.has_tool("mystery"));
    }

    #[tokio::test]
    async fn test_note_title_filled_before_dispatch() {
        let transport = Arc::new(MockTransport::new());
        let registry = registry(transport.clone());

        let call = ToolCall::new("create_note").with_arg("content", "Meeting notes for Tuesday sprint review");
        registry.execute(&call).await;

        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls[0].2["title"], "Meeting notes for Tuesday sprint");
        assert_eq!(calls[0].2["content"], "Meeting notes for Tuesday sprint review");
    }

    #[tokio::test]
    async fn test_stats() {
        let registry = registry(Arc::new(MockTransport::new()));
        assert_eq!(
            registry.stats(),
            RegistryStats {
                internal: 1,
                external: 3
            }
        );
    }

    #[test]
    fn test_new_cyclic_hands_out_weak_self() {
        let registry = ToolRegistry::new_cyclic(Arc::new(MockTransport::new()), |weak, registry| {
            assert!(weak.upgrade().is_none());
            registry.register_internal(ToolDefinition::new("echo", ""), Arc::new(EchoHandler));
        });
        assert!(registry.is_internal("echo"));
    }
}
