//! Color-temperature LED controller
//!
//! The color cluster only supports the color-temperature model; the quirk
//! strikes CIE x/y records from reporting configuration so the hub stops
//! asking for coordinates the firmware will never report.

use std::collections::BTreeMap;

use zbquirk_model::consts::{attribute, cluster, device_type, profile};
use zbquirk_model::{
    EndpointDescriptor, EndpointId, Topology, TopologyError, VendorIdentity,
};
use zbquirk_registry::{replacement_endpoint, ClusterKey, ClusterRef, QuirkDefinition};
use zbquirk_runtime::{AttributeDef, ClusterSpec, ClusterTemplate, ReportingPolicy};

pub const COLOR: &str = "led_cct/color";

pub fn templates() -> Vec<ClusterTemplate> {
    vec![ClusterTemplate::new(
        COLOR,
        cluster::COLOR_CONTROL,
        ClusterSpec::ReportingFilter,
    )
    .with_attributes(vec![
        AttributeDef::new(0x0007, "color_temperature"),
        AttributeDef::new(0x0003, "current_x"),
        AttributeDef::new(0x0004, "current_y"),
    ])
    .with_reporting(ReportingPolicy::Denylist(vec![
        attribute::COLOR_CURRENT_X,
        attribute::COLOR_CURRENT_Y,
    ]))]
}

pub fn quirk() -> Result<QuirkDefinition, TopologyError> {
    let clusters_in = vec![
        cluster::BASIC,
        cluster::IDENTIFY,
        cluster::GROUPS,
        cluster::SCENES,
        cluster::ON_OFF,
        cluster::LEVEL_CONTROL,
        cluster::COLOR_CONTROL,
        cluster::LIGHT_LINK,
    ];

    let signature = Topology::new().with_endpoint(
        11,
        EndpointDescriptor::new(
            profile::HOME_AUTOMATION,
            device_type::COLOR_TEMPERATURE_LIGHT,
            clusters_in,
            vec![cluster::OTA],
        )?,
    )?;

    let mut replacement = BTreeMap::new();
    replacement.insert(
        EndpointId(11),
        replacement_endpoint(
            Some(profile::HOME_AUTOMATION),
            Some(device_type::COLOR_TEMPERATURE_LIGHT),
            vec![
                ClusterRef::Raw(cluster::BASIC),
                ClusterRef::Raw(cluster::IDENTIFY),
                ClusterRef::Raw(cluster::GROUPS),
                ClusterRef::Raw(cluster::SCENES),
                ClusterRef::Raw(cluster::ON_OFF),
                ClusterRef::Raw(cluster::LEVEL_CONTROL),
                ClusterRef::Custom(ClusterKey(COLOR)),
                ClusterRef::Raw(cluster::LIGHT_LINK),
            ],
            vec![ClusterRef::Raw(cluster::OTA)],
        ),
    );

    Ok(QuirkDefinition {
        name: "led_controller_lc20_cct",
        identities: vec![VendorIdentity::new("Candeo", "C-ZB-LC20-CCT")],
        signature,
        replacement,
        triggers: vec![],
    })
}
