//! Tool dispatch
//!
//! ## Layout
//!
//! - [`registry`]: the [`ToolRegistry`] dispatcher (internal handlers first,
//!   then backend-tagged tools through a `BackendTransport`)
//! - [`builtin`]: in-process tools (`synthesize_content`, `run_automation`)
//! - [`catalogue`]: the default set of backend-served tools

pub mod builtin;
pub mod catalogue;
mod registry;

pub use builtin::BuiltinTools;
pub use catalogue::default_external_tools;
pub use registry::{RegistryStats, ToolRegistry};

use std::sync::Arc;
use steward_application::ports::backend_transport::BackendTransport;
use steward_domain::ToolDefinition;

/// Assemble the shared registry: built-in tools first, then `external` in order.
///
/// External definitions that collide with a built-in name are skipped.
pub fn build_registry<I>(
    transport: Arc<dyn BackendTransport>,
    builtins: BuiltinTools,
    external: I,
) -> Arc<ToolRegistry>
where
    I: IntoIterator<Item = ToolDefinition>,
{
    ToolRegistry::new_cyclic(transport, |weak, registry| {
        builtins.register(registry, weak);
        for definition in external {
            registry.register_external(definition);
        }
    })
}
