//! Door contact sensor: fixed zone type, Identify dropped

use std::collections::BTreeMap;
use std::sync::Arc;

use zbquirk_model::consts::{attribute, cluster, device_type, profile, zone_type};
use zbquirk_model::{
    AttributeValue, EndpointDescriptor, EndpointId, Topology, TopologyError, VendorIdentity,
};
use zbquirk_registry::{replacement_endpoint, ClusterKey, ClusterRef, QuirkDefinition};
use zbquirk_runtime::{AttributeDef, CalibrationSpec, ClusterSpec, ClusterTemplate};

pub const ZONE: &str = "door_contact/zone";

pub fn templates() -> Vec<ClusterTemplate> {
    vec![ClusterTemplate::new(
        ZONE,
        cluster::IAS_ZONE,
        ClusterSpec::Calibration(Arc::new(CalibrationSpec {
            transforms: vec![],
            constants: vec![(
                attribute::IAS_ZONE_TYPE,
                AttributeValue::U16(zone_type::CONTACT_SWITCH),
            )],
        })),
    )
    .with_attributes(vec![AttributeDef::new(0x0001, "zone_type")])]
}

pub fn quirk() -> Result<QuirkDefinition, TopologyError> {
    let signature = Topology::new().with_endpoint(
        1,
        EndpointDescriptor::new(
            profile::HOME_AUTOMATION,
            device_type::IAS_ZONE,
            vec![
                cluster::BASIC,
                cluster::POWER_CONFIGURATION,
                cluster::IDENTIFY,
                cluster::IAS_ZONE,
            ],
            vec![],
        )?,
    )?;

    let mut replacement = BTreeMap::new();
    replacement.insert(
        EndpointId(1),
        replacement_endpoint(
            Some(profile::HOME_AUTOMATION),
            Some(device_type::IAS_ZONE),
            vec![
                ClusterRef::Raw(cluster::BASIC),
                ClusterRef::Raw(cluster::POWER_CONFIGURATION),
                ClusterRef::Custom(ClusterKey(ZONE)),
            ],
            vec![],
        ),
    );

    Ok(QuirkDefinition {
        name: "door_contact_sedc",
        identities: vec![VendorIdentity::new("Candeo", "C-ZB-SEDC")],
        signature,
        replacement,
        triggers: vec![],
    })
}
