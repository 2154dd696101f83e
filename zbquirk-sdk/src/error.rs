use thiserror::Error;
use zbquirk_model::{DeviceId, VendorIdentity};

/// Errors surfaced by the engine facade
#[derive(Debug, Error)]
pub enum EngineError {
    /// Quirk registration or matching failed
    #[error(transparent)]
    Registry(#[from] zbquirk_registry::RegistryError),

    /// Session instantiation failed
    #[error(transparent)]
    Build(#[from] zbquirk_runtime::BuildError),

    /// The built-in definition tables failed to load
    #[error(transparent)]
    Definitions(#[from] zbquirk_devices::DevicesError),

    /// No registered quirk applies; the caller should pass the device
    /// through un-normalized
    #[error("no quirk matches device {identity}")]
    NoMatchingQuirk { identity: VendorIdentity },

    /// The device id is already attached
    #[error("device {0} is already attached")]
    DeviceAlreadyAttached(DeviceId),

    /// The device id is not attached
    #[error("device {0} is not attached")]
    DeviceNotFound(DeviceId),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
