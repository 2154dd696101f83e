//! Topology rewriting: signature topology in, standardized topology out
//!
//! For every endpoint the replacement template names, the endpoint's
//! cluster sets are replaced wholesale by the template's sets. Endpoints
//! the template does not mention are dropped; quirks routinely discard
//! clusters that exist on the wire but are useless to the hub. Endpoints
//! the template adds (virtual per-button endpoints) are created even if the
//! device never advertised them.
//!
//! Rewriting is deterministic and total: unknown cluster keys are *not*
//! resolved here, so nothing can fail. Resolution happens at session build
//! in the runtime crate, where a missing key is a fatal configuration
//! error.

use std::collections::BTreeMap;

use zbquirk_model::{consts::profile, DeviceTypeId, EndpointId, ProfileId, Topology};

use crate::quirk::{ClusterRef, QuirkDefinition};

/// One endpoint of the rewritten topology
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenEndpoint {
    pub profile_id: ProfileId,
    pub device_type: DeviceTypeId,
    pub input_clusters: Vec<ClusterRef>,
    pub output_clusters: Vec<ClusterRef>,
}

/// The standardized topology produced by applying a quirk
pub type RewrittenTopology = BTreeMap<EndpointId, RewrittenEndpoint>;

/// Apply `quirk.replacement` to an observed topology
///
/// Profile and device type fall back to the observed endpoint when the
/// template leaves them unset; a template endpoint with no observed
/// counterpart defaults to the home automation profile.
pub fn rewrite(observed: &Topology, quirk: &QuirkDefinition) -> RewrittenTopology {
    let mut rewritten = RewrittenTopology::new();

    for (endpoint, template) in &quirk.replacement {
        let advertised = observed.get(*endpoint);

        let profile_id = template
            .profile_id
            .or(advertised.map(|d| d.profile_id))
            .unwrap_or(profile::HOME_AUTOMATION);
        let device_type = template
            .device_type
            .or(advertised.map(|d| d.device_type))
            .unwrap_or(DeviceTypeId(0x0000));

        rewritten.insert(
            *endpoint,
            RewrittenEndpoint {
                profile_id,
                device_type,
                input_clusters: template.input_clusters.clone(),
                output_clusters: template.output_clusters.clone(),
            },
        );
    }

    tracing::debug!(
        quirk = quirk.name,
        observed_endpoints = observed.len(),
        rewritten_endpoints = rewritten.len(),
        "rewrote topology"
    );
    rewritten
}
