//! Rotary dimmer in remote mode
//!
//! Two advertised endpoints: a metering endpoint the quirk demotes to a
//! meter interface, and a remote endpoint whose on/off and level clusters
//! emit press and rotation commands instead of acting locally.

use std::collections::BTreeMap;
use std::sync::Arc;

use zbquirk_model::consts::{cluster, device_type, profile};
use zbquirk_model::{
    EndpointDescriptor, EndpointId, Topology, TopologyError, VendorIdentity,
};
use zbquirk_registry::{
    replacement_endpoint, AutomationTrigger, ClusterKey, ClusterRef, QuirkDefinition,
};
use zbquirk_runtime::{ClusterSpec, ClusterTemplate, EventMapEntry, EventRelaySpec};

pub const SWITCH: &str = "rotary_remote/switch";
pub const DIMMER: &str = "rotary_remote/dimmer";

/// Rotation direction parameter values
pub const DIRECTION_RIGHT: u8 = 0;
pub const DIRECTION_LEFT: u8 = 1;

pub fn templates() -> Vec<ClusterTemplate> {
    vec![
        ClusterTemplate::new(
            SWITCH,
            cluster::ON_OFF,
            ClusterSpec::EventRelay(Arc::new(EventRelaySpec::new(vec![
                EventMapEntry::new(0x00, "double_press"),
                EventMapEntry::new(0x01, "press"),
                EventMapEntry::new(0x02, "hold"),
                EventMapEntry::new(0x03, "release"),
            ]))),
        ),
        ClusterTemplate::new(
            DIMMER,
            cluster::LEVEL_CONTROL,
            ClusterSpec::EventRelay(Arc::new(EventRelaySpec::new(vec![
                EventMapEntry::new(0x05, "started_rotating").with_arg("direction"),
                EventMapEntry::new(0x06, "continued_rotating").with_arg("direction"),
                EventMapEntry::new(0x03, "stopped_rotating"),
            ]))),
        ),
    ]
}

pub fn quirk() -> Result<QuirkDefinition, TopologyError> {
    let signature = Topology::new()
        .with_endpoint(
            1,
            EndpointDescriptor::new(
                profile::HOME_AUTOMATION,
                device_type::DIMMABLE_LIGHT,
                vec![
                    cluster::BASIC,
                    cluster::IDENTIFY,
                    cluster::METERING,
                    cluster::ELECTRICAL_MEASUREMENT,
                    cluster::LIGHT_LINK,
                ],
                vec![cluster::IDENTIFY, cluster::OTA],
            )?,
        )?
        .with_endpoint(
            2,
            EndpointDescriptor::new(
                profile::HOME_AUTOMATION,
                device_type::REMOTE_CONTROL,
                vec![cluster::BASIC, cluster::IDENTIFY],
                vec![cluster::IDENTIFY, cluster::ON_OFF, cluster::LEVEL_CONTROL],
            )?,
        )?;

    let mut replacement = BTreeMap::new();
    replacement.insert(
        EndpointId(1),
        replacement_endpoint(
            Some(profile::HOME_AUTOMATION),
            Some(device_type::METER_INTERFACE),
            vec![
                ClusterRef::Raw(cluster::BASIC),
                ClusterRef::Raw(cluster::METERING),
                ClusterRef::Raw(cluster::ELECTRICAL_MEASUREMENT),
                ClusterRef::Raw(cluster::LIGHT_LINK),
            ],
            vec![],
        ),
    );
    replacement.insert(
        EndpointId(2),
        replacement_endpoint(
            Some(profile::HOME_AUTOMATION),
            Some(device_type::REMOTE_CONTROL),
            vec![ClusterRef::Raw(cluster::BASIC)],
            vec![
                ClusterRef::Custom(ClusterKey(SWITCH)),
                ClusterRef::Custom(ClusterKey(DIMMER)),
            ],
        ),
    );

    let knob = "Rotary knob";
    let triggers = vec![
        AutomationTrigger::new("Pressed", knob, 2, "press").on_cluster(cluster::ON_OFF),
        AutomationTrigger::new("Double pressed", knob, 2, "double_press")
            .on_cluster(cluster::ON_OFF),
        AutomationTrigger::new("Held", knob, 2, "hold").on_cluster(cluster::ON_OFF),
        AutomationTrigger::new("Released", knob, 2, "release").on_cluster(cluster::ON_OFF),
        AutomationTrigger::new("Started rotating left", knob, 2, "started_rotating")
            .on_cluster(cluster::LEVEL_CONTROL)
            .with_param("direction", DIRECTION_LEFT),
        AutomationTrigger::new("Rotating left", knob, 2, "continued_rotating")
            .on_cluster(cluster::LEVEL_CONTROL)
            .with_param("direction", DIRECTION_LEFT),
        AutomationTrigger::new("Started rotating right", knob, 2, "started_rotating")
            .on_cluster(cluster::LEVEL_CONTROL)
            .with_param("direction", DIRECTION_RIGHT),
        AutomationTrigger::new("Rotating right", knob, 2, "continued_rotating")
            .on_cluster(cluster::LEVEL_CONTROL)
            .with_param("direction", DIRECTION_RIGHT),
        AutomationTrigger::new("Stopped rotating", knob, 2, "stopped_rotating")
            .on_cluster(cluster::LEVEL_CONTROL),
    ];

    Ok(QuirkDefinition {
        name: "rotary_dimmer_rd1p_remote",
        identities: vec![VendorIdentity::new("Candeo", "C-ZB-RD1P-REM")],
        signature,
        replacement,
        triggers,
    })
}
