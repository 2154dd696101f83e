//! Signature matching: does a quirk apply to an observed device?
//!
//! A quirk matches iff the vendor identity is an exact element of its
//! identity list AND every endpoint named in the signature pattern is
//! present in the observed topology with identical profile id, device type,
//! and cluster sets. Set equality, not superset: a device advertising one
//! extra cluster on a patterned endpoint does not match. Endpoints the
//! pattern does not name are ignored entirely.

use zbquirk_model::{ClusterId, EndpointDescriptor, Topology, VendorIdentity};

use crate::quirk::QuirkDefinition;

/// Pure query: true iff `quirk` applies to the observed device
pub fn matches(quirk: &QuirkDefinition, topology: &Topology, identity: &VendorIdentity) -> bool {
    if !quirk.applies_to(identity) {
        return false;
    }
    signature_matches(&quirk.signature, topology)
}

/// Compare every patterned endpoint against the observed topology
pub fn signature_matches(signature: &Topology, observed: &Topology) -> bool {
    signature.iter().all(|(endpoint, pattern)| {
        observed
            .get(*endpoint)
            .is_some_and(|descriptor| endpoint_matches(pattern, descriptor))
    })
}

fn endpoint_matches(pattern: &EndpointDescriptor, observed: &EndpointDescriptor) -> bool {
    pattern.profile_id == observed.profile_id
        && pattern.device_type == observed.device_type
        && set_equal(&pattern.input_clusters, &observed.input_clusters)
        && set_equal(&pattern.output_clusters, &observed.output_clusters)
}

/// Order-insensitive equality over duplicate-free cluster lists
fn set_equal(a: &[ClusterId], b: &[ClusterId]) -> bool {
    a.len() == b.len() && a.iter().all(|c| b.contains(c))
}
