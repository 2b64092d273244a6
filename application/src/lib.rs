//! Application layer for steward
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{PlannerConfig, ResolverConfig, SessionConfig};
pub use ports::{
    backend_transport::{BackendTransport, TransportError},
    device_controller::{DeviceCommand, DeviceControllerPort, DeviceError, UnconfiguredDevices},
    llm_gateway::{GatewayError, LlmGateway},
    progress::{NoPlannerProgress, PlannerProgressNotifier},
    tool_executor::ToolExecutorPort,
};
pub use use_cases::command_session::{CommandReport, CommandSessionUseCase, IntentOutcome};
pub use use_cases::resolve_intent::{
    Resolution, ResolutionOutcome, ResolutionTier, ResolveIntentUseCase,
};
pub use use_cases::run_planner::RunPlannerUseCase;
