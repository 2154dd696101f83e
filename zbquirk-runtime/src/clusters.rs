//! Cluster implementation variants
//!
//! A translation-capable cluster is one of a closed set of tagged
//! variants, selected when the topology rewriter names its key and
//! instantiated bound to one endpoint at session build. Static parameters
//! live in shared specs; mutable state (dedup slots, the mode machine) is
//! per instance.

use std::sync::Arc;

use zbquirk_model::{AttributeId, AttributeValue, ClusterId, EndpointId};
use zbquirk_registry::ClusterKey;

use crate::datapoint::DataPointSpec;
use crate::events::{EventRelay, EventRelaySpec};
use crate::reporting::ReportingPolicy;
use crate::transform::ReportTransform;
use crate::watchdog::{ModeWatchdog, WatchdogSpec};

/// Standardized name for one attribute a cluster implementation exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeDef {
    pub id: AttributeId,
    pub name: &'static str,
}

impl AttributeDef {
    pub const fn new(id: u16, name: &'static str) -> Self {
        Self {
            id: AttributeId(id),
            name,
        }
    }
}

/// How the cluster answers a bind request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BindPolicy {
    /// Let the transport bind normally
    #[default]
    Standard,
    /// Accept locally, never forward (clusters that must not be bound)
    Suppress,
    /// Vendor wake-up: publish the magic attribute read against the Basic
    /// cluster of the anchor endpoint, then assert the desired mode
    VendorHandshake { anchor: EndpointId },
}

/// Static parameters of a calibration cluster
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalibrationSpec {
    /// Per-attribute value transforms
    pub transforms: Vec<(AttributeId, ReportTransform)>,
    /// Fixed attribute values reported once at session build
    pub constants: Vec<(AttributeId, AttributeValue)>,
}

impl CalibrationSpec {
    pub fn transform_for(&self, attribute: AttributeId) -> Option<&ReportTransform> {
        self.transforms
            .iter()
            .find(|(id, _)| *id == attribute)
            .map(|(_, t)| t)
    }
}

/// Behavior selector carried by a catalog template
#[derive(Debug, Clone)]
pub enum ClusterSpec {
    /// Inbound value calibration and constant attributes
    Calibration(Arc<CalibrationSpec>),
    /// Pass-through cluster whose only job is the reporting denylist
    ReportingFilter,
    /// Vendor data-point bridge and command routing
    DataPointRelay(Arc<DataPointSpec>),
    /// Mode-consistency watchdog with embedded event relay
    ModeWatchdog(Arc<WatchdogSpec>),
    /// Standalone dedup and semantic event mapping
    EventRelay(Arc<EventRelaySpec>),
}

/// Registered description of one cluster implementation
#[derive(Debug, Clone)]
pub struct ClusterTemplate {
    pub key: ClusterKey,
    pub cluster_id: ClusterId,
    pub attributes: Vec<AttributeDef>,
    pub bind: BindPolicy,
    pub reporting: ReportingPolicy,
    pub spec: ClusterSpec,
}

impl ClusterTemplate {
    pub fn new(key: &'static str, cluster_id: ClusterId, spec: ClusterSpec) -> Self {
        Self {
            key: ClusterKey(key),
            cluster_id,
            attributes: Vec::new(),
            bind: BindPolicy::Standard,
            reporting: ReportingPolicy::Forward,
            spec,
        }
    }

    pub fn with_attributes(mut self, attributes: Vec<AttributeDef>) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_bind(mut self, bind: BindPolicy) -> Self {
        self.bind = bind;
        self
    }

    pub fn with_reporting(mut self, reporting: ReportingPolicy) -> Self {
        self.reporting = reporting;
        self
    }

    /// Instantiate the template bound to one endpoint
    pub fn instantiate(&self, endpoint: EndpointId) -> ClusterInstance {
        let imp = match &self.spec {
            ClusterSpec::Calibration(spec) => ClusterImpl::Calibration(Arc::clone(spec)),
            ClusterSpec::ReportingFilter => ClusterImpl::ReportingFilter,
            ClusterSpec::DataPointRelay(spec) => ClusterImpl::DataPointRelay(Arc::clone(spec)),
            ClusterSpec::ModeWatchdog(spec) => {
                ClusterImpl::ModeWatchdog(ModeWatchdog::new(Arc::clone(spec), self.key))
            }
            ClusterSpec::EventRelay(spec) => {
                ClusterImpl::EventRelay(EventRelay::new(Arc::clone(spec)))
            }
        };
        ClusterInstance {
            key: self.key,
            cluster_id: self.cluster_id,
            endpoint,
            attributes: self.attributes.clone(),
            bind: self.bind,
            reporting: self.reporting.clone(),
            imp,
        }
    }
}

/// Per-instance behavior, carrying whatever state the variant needs
#[derive(Debug)]
pub enum ClusterImpl {
    Calibration(Arc<CalibrationSpec>),
    ReportingFilter,
    DataPointRelay(Arc<DataPointSpec>),
    ModeWatchdog(ModeWatchdog),
    EventRelay(EventRelay),
}

/// One instantiated cluster, bound to an endpoint for a session's lifetime
#[derive(Debug)]
pub struct ClusterInstance {
    pub key: ClusterKey,
    pub cluster_id: ClusterId,
    pub endpoint: EndpointId,
    pub attributes: Vec<AttributeDef>,
    pub bind: BindPolicy,
    pub reporting: ReportingPolicy,
    pub imp: ClusterImpl,
}

impl ClusterInstance {
    /// Resolve a standardized attribute name to its wire id
    pub fn attribute_id(&self, name: &str) -> Option<AttributeId> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.id)
    }

    /// Resolve a wire id back to its standardized name
    pub fn attribute_name(&self, id: AttributeId) -> Option<&'static str> {
        self.attributes.iter().find(|a| a.id == id).map(|a| a.name)
    }
}
