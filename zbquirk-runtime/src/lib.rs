//! Runtime translation pipeline for normalized devices
//!
//! Where the registry crate decides *what* a device should look like, this
//! crate makes it behave that way at runtime. A [`DeviceSession`] owns the
//! instantiated replacement topology for one connected device and drives
//! the whole per-frame pipeline:
//!
//! ```text
//! inbound frame ─▶ dedup / event mapper ─▶ transform pipeline ─▶ hub update
//!                                  │
//! hub command ─▶ command router ───┴──▶ command bus ─▶ transport ─▶ device
//! ```
//!
//! Cluster implementations are a closed set of tagged variants selected at
//! topology-rewrite time; no reflection, no global registries. All shared
//! mutable state is confined to the session: one mode-consistency machine
//! and one command bus per device, never shared across devices.
//!
//! Nothing here blocks on I/O. Enqueueing on the command bus is
//! synchronous; delivery and the device's real acknowledgement are the
//! transport collaborator's business and fold back through the normal
//! inbound path.

pub mod bus;
pub mod catalog;
pub mod clusters;
pub mod datapoint;
pub mod error;
pub mod events;
pub mod reporting;
pub mod router;
pub mod session;
pub mod transform;
pub mod update;
pub mod watchdog;

pub use bus::{BusReceiver, BusRequest, CommandBus, CommandBusEntry, PendingWrite};
pub use catalog::ClusterCatalog;
pub use clusters::{
    AttributeDef, BindPolicy, CalibrationSpec, ClusterImpl, ClusterInstance, ClusterSpec,
    ClusterTemplate,
};
pub use datapoint::{
    CommandRoute, DataPointMapping, DataPointSpec, Redirect, ReportWrite, RouteWrite, RoutedValue,
};
pub use error::{BuildError, Result};
pub use events::{EventMapEntry, EventRelay, EventRelaySpec, FrameDisposition, SemanticEvent};
pub use reporting::{ReportingPolicy, ReportingRecord};
pub use router::Acknowledgement;
pub use session::{DeviceSession, EndpointRuntime};
pub use transform::ReportTransform;
pub use update::{AttributeUpdate, HubUpdate};
pub use watchdog::{DeviceMode, ModeWatchdog, WatchdogSpec};
