//! Device controller port
//!
//! Control intents ("turn on the kitchen lights") are carried out by an
//! external home-automation collaborator. The command session only needs
//! this narrow contract.

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("device control is not configured")]
    NotConfigured,

    #[error("unknown device: {0}")]
    UnknownDevice(String),

    #[error("device action failed: {0}")]
    Failed(String),
}

/// A device action resolved from a control intent
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceCommand {
    /// Friendly name as resolved (e.g. "kitchen lights")
    pub target: String,
    /// Canonical id from the entity registry, when known
    pub entity_id: Option<String>,
    /// Action such as turn_on, turn_off, toggle, volume_up, get_status
    pub action: String,
    pub arguments: HashMap<String, serde_json::Value>,
}

/// Port for carrying out device actions
#[async_trait]
pub trait DeviceControllerPort: Send + Sync {
    async fn apply(&self, command: &DeviceCommand) -> Result<String, DeviceError>;
}

/// Controller used when no home-automation backend is wired in
pub struct UnconfiguredDevices;

#[async_trait]
impl DeviceControllerPort for UnconfiguredDevices {
    async fn apply(&self, _command: &DeviceCommand) -> Result<String, DeviceError> {
        Err(DeviceError::NotConfigured)
    }
}
