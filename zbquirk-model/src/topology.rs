//! Device topology: ordered endpoints exposing cluster sets
//!
//! A topology is what a device advertises during discovery and what quirk
//! signatures pattern-match against. Endpoints are kept in id order and the
//! cluster lists within one endpoint must be free of duplicates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::{ClusterId, DeviceTypeId, EndpointId, ProfileId};

/// Topology construction errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TopologyError {
    /// A cluster id appeared twice in one endpoint's input or output set
    #[error("duplicate cluster {cluster} in endpoint {endpoint} {direction} set")]
    DuplicateCluster {
        endpoint: EndpointId,
        cluster: ClusterId,
        direction: &'static str,
    },
}

/// One endpoint's advertised shape: profile, device type, and cluster sets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointDescriptor {
    pub profile_id: ProfileId,
    pub device_type: DeviceTypeId,
    pub input_clusters: Vec<ClusterId>,
    pub output_clusters: Vec<ClusterId>,
}

impl EndpointDescriptor {
    /// Build a descriptor, enforcing per-set cluster uniqueness
    ///
    /// The cluster lists keep their given order; ordering is part of the
    /// advertised shape but matching treats them as sets.
    pub fn new(
        profile_id: ProfileId,
        device_type: DeviceTypeId,
        input_clusters: Vec<ClusterId>,
        output_clusters: Vec<ClusterId>,
    ) -> Result<Self, TopologyError> {
        // Caller does not know the endpoint id yet; re-checked on insert.
        check_unique(EndpointId(0), &input_clusters, "input")?;
        check_unique(EndpointId(0), &output_clusters, "output")?;
        Ok(Self {
            profile_id,
            device_type,
            input_clusters,
            output_clusters,
        })
    }

    pub fn has_input(&self, cluster: ClusterId) -> bool {
        self.input_clusters.contains(&cluster)
    }

    pub fn has_output(&self, cluster: ClusterId) -> bool {
        self.output_clusters.contains(&cluster)
    }
}

fn check_unique(
    endpoint: EndpointId,
    clusters: &[ClusterId],
    direction: &'static str,
) -> Result<(), TopologyError> {
    for (i, cluster) in clusters.iter().enumerate() {
        if clusters[..i].contains(cluster) {
            return Err(TopologyError::DuplicateCluster {
                endpoint,
                cluster: *cluster,
                direction,
            });
        }
    }
    Ok(())
}

/// Ordered mapping of endpoint id to endpoint descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    endpoints: BTreeMap<EndpointId, EndpointDescriptor>,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an endpoint, replacing any previous descriptor for that id
    pub fn insert(
        &mut self,
        endpoint: EndpointId,
        descriptor: EndpointDescriptor,
    ) -> Result<(), TopologyError> {
        check_unique(endpoint, &descriptor.input_clusters, "input")?;
        check_unique(endpoint, &descriptor.output_clusters, "output")?;
        self.endpoints.insert(endpoint, descriptor);
        Ok(())
    }

    /// Chainable insert for declarative topology tables
    pub fn with_endpoint(
        mut self,
        endpoint: u8,
        descriptor: EndpointDescriptor,
    ) -> Result<Self, TopologyError> {
        self.insert(EndpointId(endpoint), descriptor)?;
        Ok(self)
    }

    pub fn get(&self, endpoint: EndpointId) -> Option<&EndpointDescriptor> {
        self.endpoints.get(&endpoint)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EndpointId, &EndpointDescriptor)> {
        self.endpoints.iter()
    }

    pub fn endpoint_ids(&self) -> impl Iterator<Item = EndpointId> + '_ {
        self.endpoints.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(inputs: &[u16], outputs: &[u16]) -> EndpointDescriptor {
        EndpointDescriptor::new(
            ProfileId(0x0104),
            DeviceTypeId(0x0051),
            inputs.iter().map(|&c| ClusterId(c)).collect(),
            outputs.iter().map(|&c| ClusterId(c)).collect(),
        )
        .expect("valid descriptor")
    }

    #[test]
    fn test_duplicate_input_cluster_rejected() {
        let result = EndpointDescriptor::new(
            ProfileId(0x0104),
            DeviceTypeId(0x0051),
            vec![ClusterId(6), ClusterId(6)],
            vec![],
        );
        assert!(matches!(
            result,
            Err(TopologyError::DuplicateCluster { cluster: ClusterId(6), .. })
        ));
    }

    #[test]
    fn test_same_cluster_allowed_across_directions() {
        // Identify commonly appears on both sides of one endpoint.
        let d = descriptor(&[0x0003], &[0x0003]);
        assert!(d.has_input(ClusterId(0x0003)));
        assert!(d.has_output(ClusterId(0x0003)));
    }

    #[test]
    fn test_endpoints_iterate_in_id_order() {
        let topology = Topology::new()
            .with_endpoint(3, descriptor(&[0], &[]))
            .unwrap()
            .with_endpoint(1, descriptor(&[0], &[]))
            .unwrap()
            .with_endpoint(2, descriptor(&[0], &[]))
            .unwrap();

        let ids: Vec<_> = topology.endpoint_ids().collect();
        assert_eq!(ids, vec![EndpointId(1), EndpointId(2), EndpointId(3)]);
    }
}
