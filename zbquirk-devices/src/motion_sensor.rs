//! Motion sensor with miscalibrated illuminance optics
//!
//! The zone type is fixed (the firmware reports none) and the log-lux
//! illuminance readings run consistently off; the replacement substitutes
//! a calibration cluster for the raw measurement cluster.

use std::collections::BTreeMap;
use std::sync::Arc;

use zbquirk_model::consts::{attribute, cluster, device_type, profile, zone_type};
use zbquirk_model::{
    AttributeValue, EndpointDescriptor, EndpointId, Topology, TopologyError, VendorIdentity,
};
use zbquirk_registry::{replacement_endpoint, ClusterKey, ClusterRef, QuirkDefinition};
use zbquirk_runtime::{
    AttributeDef, CalibrationSpec, ClusterSpec, ClusterTemplate, ReportTransform,
};

pub const ILLUMINANCE: &str = "motion_sensor/illuminance";
pub const ZONE: &str = "motion_sensor/zone";

pub fn templates() -> Vec<ClusterTemplate> {
    vec![
        ClusterTemplate::new(
            ILLUMINANCE,
            cluster::ILLUMINANCE_MEASUREMENT,
            ClusterSpec::Calibration(Arc::new(CalibrationSpec {
                transforms: vec![(
                    attribute::ILLUMINANCE_MEASURED,
                    ReportTransform::IlluminanceLogLux,
                )],
                constants: vec![],
            })),
        )
        .with_attributes(vec![AttributeDef::new(0x0000, "measured_value")]),
        ClusterTemplate::new(
            ZONE,
            cluster::IAS_ZONE,
            ClusterSpec::Calibration(Arc::new(CalibrationSpec {
                transforms: vec![],
                constants: vec![(
                    attribute::IAS_ZONE_TYPE,
                    AttributeValue::U16(zone_type::MOTION_SENSOR),
                )],
            })),
        )
        .with_attributes(vec![AttributeDef::new(0x0001, "zone_type")]),
    ]
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
                cluster::ILLUMINANCE_MEASUREMENT,
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
                ClusterRef::Custom(ClusterKey(ILLUMINANCE)),
                ClusterRef::Custom(ClusterKey(ZONE)),
            ],
            vec![],
        ),
    );

    Ok(QuirkDefinition {
        name: "motion_sensor_semo",
        identities: vec![VendorIdentity::new("Candeo", "C-ZB-SEMO")],
        signature,
        replacement,
        triggers: vec![],
    })
}
