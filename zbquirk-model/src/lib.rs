//! Data model for the zbquirk capability normalization SDK
//!
//! This crate defines the vocabulary shared by every other zbquirk crate:
//! endpoint/cluster/attribute identifiers, attribute values, the topology a
//! device advertises on the wire, the inbound frame shapes delivered by the
//! transport, and vendor identity.
//!
//! # Architecture
//!
//! ```text
//! Transport ──(AttributeReport / CommandFrame)──▶ runtime pipeline
//!                                                    │
//! Registry ──(Topology + VendorIdentity)──▶ matcher ─┘
//! ```
//!
//! Types here are plain data: no I/O, no behavior beyond invariant checks.
//! The topology invariant (cluster ids unique within one endpoint's input
//! or output set) is enforced at construction time.

pub mod frame;
pub mod ids;
pub mod identity;
pub mod topology;
pub mod value;

// Well-known wire constants (cluster ids, profile ids, device types)
pub mod consts;

pub use frame::{AttributeReport, CommandFrame, DefaultResponse, FrameStatus, InboundFrame};
pub use identity::VendorIdentity;
pub use ids::{
    AttributeId, ClusterId, CommandId, DeviceId, DeviceTypeId, EndpointId, ProfileId,
};
pub use topology::{EndpointDescriptor, Topology, TopologyError};
pub use value::AttributeValue;
