//! # zbquirk SDK
//!
//! Normalizes heterogeneous vendor Zigbee device behavior into a uniform
//! capability model for a home automation hub.
//!
//! Vendor devices advertise non-standard topologies, encode domain events
//! as custom commands, misreport calibrated sensor values, or speak a
//! bridge protocol instead of native attributes. The SDK matches each
//! joining device against registered quirk definitions, rewrites its
//! topology into a standardized one, and translates wire traffic in both
//! directions at runtime.
//!
//! # Architecture
//!
//! ```text
//! transport frames ──▶ per-device worker ──▶ DeviceSession pipeline
//!                                                │
//!                       hub updates  ◀───────────┤
//!                       command bus  ◀───────────┘  (writes to device)
//! ```
//!
//! Devices are fully independent: each gets its own worker thread, its own
//! session state, and its own command bus. Frames for one device are
//! processed strictly in order; concurrency across devices is unbounded.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use zbquirk_sdk::prelude::*;
//!
//! let engine = QuirkEngine::with_builtin_devices()?;
//!
//! // The transport announces a join:
//! let attached = engine.attach(device_id, identity, &topology)?;
//!
//! // Feed inbound frames (strictly ordered per device):
//! attached.frames.send(InboundFrame::Report(report))?;
//!
//! // Consume standardized updates across all devices:
//! for update in engine.updates() {
//!     println!("{}: {:?}", update.device, update.update);
//! }
//!
//! // Dequeue device-bound writes from the per-device bus:
//! while let Some(request) = attached.bus.recv() {
//!     transport.transmit(request)?;
//! }
//! ```

pub mod engine;
pub mod error;
pub mod iter;
pub mod logging;

mod worker;

pub use engine::{AttachedDevice, EngineUpdate, QuirkEngine};
pub use error::{EngineError, Result};
pub use iter::UpdateIterator;
pub use logging::{init_logging, init_logging_from_env, LoggingError, LoggingMode};

// Re-export the layers the facade composes
pub use zbquirk_devices as devices;
pub use zbquirk_model as model;
pub use zbquirk_registry as registry;
pub use zbquirk_runtime as runtime;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::engine::{AttachedDevice, EngineUpdate, QuirkEngine};
    pub use crate::error::{EngineError, Result};
    pub use zbquirk_model::{
        AttributeReport, AttributeValue, CommandFrame, DeviceId, InboundFrame, Topology,
        VendorIdentity,
    };
    pub use zbquirk_registry::{QuirkDefinition, QuirkRegistry};
    pub use zbquirk_runtime::{
        Acknowledgement, BusRequest, ClusterCatalog, HubUpdate, SemanticEvent,
    };
}
