//! Temperature & humidity sensor: pure topology rewrite
//!
//! No translation needed; the quirk only trims the Identify cluster the
//! hub has no use for on a sleepy sensor.

use std::collections::BTreeMap;

use zbquirk_model::consts::{cluster, device_type, profile};
use zbquirk_model::{
    EndpointDescriptor, EndpointId, Topology, TopologyError, VendorIdentity,
};
use zbquirk_registry::{replacement_endpoint, ClusterRef, QuirkDefinition};

pub fn quirk() -> Result<QuirkDefinition, TopologyError> {
    let signature = Topology::new().with_endpoint(
        1,
        EndpointDescriptor::new(
            profile::HOME_AUTOMATION,
            device_type::TEMPERATURE_SENSOR,
            vec![
                cluster::BASIC,
                cluster::POWER_CONFIGURATION,
                cluster::IDENTIFY,
                cluster::TEMPERATURE_MEASUREMENT,
                cluster::RELATIVE_HUMIDITY,
            ],
            vec![cluster::IDENTIFY],
        )?,
    )?;

    let mut replacement = BTreeMap::new();
    replacement.insert(
        EndpointId(1),
        replacement_endpoint(
            Some(profile::HOME_AUTOMATION),
            Some(device_type::TEMPERATURE_SENSOR),
            vec![
                ClusterRef::Raw(cluster::BASIC),
                ClusterRef::Raw(cluster::POWER_CONFIGURATION),
                ClusterRef::Raw(cluster::TEMPERATURE_MEASUREMENT),
                ClusterRef::Raw(cluster::RELATIVE_HUMIDITY),
            ],
            vec![],
        ),
    );

    Ok(QuirkDefinition {
        name: "temp_humidity_sete",
        identities: vec![VendorIdentity::new("Candeo", "C-ZB-SETE")],
        signature,
        replacement,
        triggers: vec![],
    })
}
