//! Quirk definition types
//!
//! A definition is immutable once registered: an identity list, a signature
//! topology made of raw cluster ids, a replacement template that may name
//! translation-capable cluster implementations, and an optional automation
//! trigger table.

use std::collections::BTreeMap;
use std::fmt;

use zbquirk_model::{
    ClusterId, DeviceTypeId, EndpointId, ProfileId, Topology, VendorIdentity,
};

/// Name of a translation-capable cluster implementation in the catalog
///
/// Keys are static strings declared next to the quirk tables, e.g.
/// `"scene_controller/buttons"` or `"irrigation/valve"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClusterKey(pub &'static str);

impl fmt::Display for ClusterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One entry in a replacement endpoint's cluster set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterRef {
    /// Raw numeric id, passed through to the rewritten topology unchanged
    Raw(ClusterId),
    /// Reference to a cluster implementation, instantiated at session build
    Custom(ClusterKey),
}

impl From<ClusterId> for ClusterRef {
    fn from(id: ClusterId) -> Self {
        ClusterRef::Raw(id)
    }
}

impl From<ClusterKey> for ClusterRef {
    fn from(key: ClusterKey) -> Self {
        ClusterRef::Custom(key)
    }
}

/// Template for one endpoint in the replacement topology
///
/// `profile_id`/`device_type` may be left `None` to inherit the observed
/// endpoint's values (the common case when only the cluster sets change).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementEndpoint {
    pub profile_id: Option<ProfileId>,
    pub device_type: Option<DeviceTypeId>,
    pub input_clusters: Vec<ClusterRef>,
    pub output_clusters: Vec<ClusterRef>,
}

/// One row of the automation trigger table
///
/// Maps a human-facing (event, affordance) pair to the wire-level command
/// the hub's automation system should listen for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomationTrigger {
    pub event: &'static str,
    pub affordance: &'static str,
    pub endpoint: EndpointId,
    pub cluster: Option<ClusterId>,
    pub command: &'static str,
    /// Fixed parameters attached to the trigger (e.g. rotation direction)
    pub params: Vec<(&'static str, u8)>,
}

impl AutomationTrigger {
    pub fn new(
        event: &'static str,
        affordance: &'static str,
        endpoint: u8,
        command: &'static str,
    ) -> Self {
        Self {
            event,
            affordance,
            endpoint: EndpointId(endpoint),
            cluster: None,
            command,
            params: Vec::new(),
        }
    }

    pub fn on_cluster(mut self, cluster: ClusterId) -> Self {
        self.cluster = Some(cluster);
        self
    }

    pub fn with_param(mut self, name: &'static str, value: u8) -> Self {
        self.params.push((name, value));
        self
    }
}

/// A registered device override, immutable after registration
#[derive(Debug, Clone)]
pub struct QuirkDefinition {
    /// Stable name used in logs and error reports
    pub name: &'static str,
    /// Exact vendor identities this quirk applies to
    pub identities: Vec<VendorIdentity>,
    /// Advertised topology pattern (raw ids only)
    pub signature: Topology,
    /// Replacement topology template
    pub replacement: BTreeMap<EndpointId, ReplacementEndpoint>,
    /// Automation trigger table exposed to the hub
    pub triggers: Vec<AutomationTrigger>,
}

impl QuirkDefinition {
    pub fn applies_to(&self, identity: &VendorIdentity) -> bool {
        self.identities.contains(identity)
    }

    /// Look up a trigger by its (event, affordance) key
    pub fn trigger(&self, event: &str, affordance: &str) -> Option<&AutomationTrigger> {
        self.triggers
            .iter()
            .find(|t| t.event == event && t.affordance == affordance)
    }
}

/// Convenience constructor for replacement endpoints
pub fn replacement_endpoint(
    profile_id: Option<ProfileId>,
    device_type: Option<DeviceTypeId>,
    input_clusters: Vec<ClusterRef>,
    output_clusters: Vec<ClusterRef>,
) -> ReplacementEndpoint {
    ReplacementEndpoint {
        profile_id,
        device_type,
        input_clusters,
        output_clusters,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_lookup_by_pair() {
        let quirk = QuirkDefinition {
            name: "test",
            identities: vec![VendorIdentity::new("acme", "X1")],
            signature: Topology::new(),
            replacement: BTreeMap::new(),
            triggers: vec![
                AutomationTrigger::new("Pressed", "Button 1", 1, "short_press"),
                AutomationTrigger::new("Held", "Button 1", 1, "long_press"),
            ],
        };

        let t = quirk.trigger("Held", "Button 1").expect("trigger");
        assert_eq!(t.command, "long_press");
        assert!(quirk.trigger("Held", "Button 2").is_none());
    }

    #[test]
    fn test_applies_to_is_exact() {
        let quirk = QuirkDefinition {
            name: "test",
            identities: vec![VendorIdentity::new("acme", "X1")],
            signature: Topology::new(),
            replacement: BTreeMap::new(),
            triggers: vec![],
        };
        assert!(quirk.applies_to(&VendorIdentity::new("acme", "X1")));
        assert!(!quirk.applies_to(&VendorIdentity::new("acme", "X2")));
    }
}
