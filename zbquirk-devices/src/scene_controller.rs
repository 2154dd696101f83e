//! Four-button scene controller (TS004F family)
//!
//! The device advertises one dimmer-switch endpoint but physically has
//! four buttons, and its firmware falls back to an auto-execute switch
//! mode after power loss. The replacement spreads a button cluster across
//! four endpoints and puts the mode watchdog on endpoint 1, where the
//! mode attribute lives.

use std::collections::BTreeMap;
use std::sync::Arc;

use zbquirk_model::consts::{attribute, cluster, device_type, profile};
use zbquirk_model::{EndpointDescriptor, EndpointId, Topology, TopologyError, VendorIdentity};
use zbquirk_registry::{
    replacement_endpoint, AutomationTrigger, ClusterKey, ClusterRef, QuirkDefinition,
};
use zbquirk_runtime::{
    AttributeDef, BindPolicy, ClusterSpec, ClusterTemplate, EventMapEntry, EventRelaySpec,
    ReportingPolicy, WatchdogSpec,
};

/// Watchdog + event cluster on endpoint 1
pub const MAIN: &str = "scene_controller/main";
/// Event-only cluster on the virtual button endpoints
pub const BUTTON: &str = "scene_controller/button";

fn press_events() -> EventRelaySpec {
    EventRelaySpec::new(vec![
        EventMapEntry::new(0xFD, "short_press").with_selector(0x00),
        EventMapEntry::new(0xFD, "double_press").with_selector(0x01),
        EventMapEntry::new(0xFD, "long_press").with_selector(0x02),
    ])
}

pub fn templates() -> Vec<ClusterTemplate> {
    let attributes = vec![
        AttributeDef::new(0x0000, "on_off"),
        AttributeDef::new(0x8004, "switch_mode"),
    ];

    vec![
        ClusterTemplate::new(
            MAIN,
            cluster::ON_OFF,
            ClusterSpec::ModeWatchdog(Arc::new(WatchdogSpec {
                mode_attribute: attribute::SWITCH_MODE,
                mode_attribute_name: "switch_mode",
                command_mode_value: 0x00,
                event_mode_value: 0x01,
                symptom_attribute: attribute::ON_OFF,
                symptom_commands: vec![
                    zbquirk_model::CommandId(0x00),
                    zbquirk_model::CommandId(0x01),
                ],
                events: press_events(),
            })),
        )
        .with_attributes(attributes.clone())
        .with_bind(BindPolicy::VendorHandshake {
            anchor: EndpointId(1),
        })
        .with_reporting(ReportingPolicy::SuppressAll),
        ClusterTemplate::new(
            BUTTON,
            cluster::ON_OFF,
            ClusterSpec::EventRelay(Arc::new(press_events())),
        )
        .with_attributes(attributes)
        .with_reporting(ReportingPolicy::SuppressAll),
    ]
}

pub fn quirk() -> Result<QuirkDefinition, TopologyError> {
    let signature = Topology::new().with_endpoint(
        1,
        EndpointDescriptor::new(
            profile::HOME_AUTOMATION,
            device_type::DIMMER_SWITCH,
            vec![
                cluster::BASIC,
                cluster::POWER_CONFIGURATION,
                cluster::IDENTIFY,
                cluster::GROUPS,
                cluster::ON_OFF,
                cluster::LIGHT_LINK,
            ],
            vec![
                cluster::OTA,
                cluster::TIME,
                cluster::IDENTIFY,
                cluster::GROUPS,
                cluster::SCENES,
                cluster::ON_OFF,
                cluster::LEVEL_CONTROL,
                cluster::LIGHT_LINK,
            ],
        )?,
    )?;

    let mut replacement = BTreeMap::new();
    replacement.insert(
        EndpointId(1),
        replacement_endpoint(
            Some(profile::HOME_AUTOMATION),
            Some(device_type::NON_COLOR_CONTROLLER),
            vec![
                ClusterRef::Custom(ClusterKey(MAIN)),
                ClusterRef::Raw(cluster::BASIC),
            ],
            vec![
                ClusterRef::Custom(ClusterKey(MAIN)),
                ClusterRef::Raw(cluster::TIME),
            ],
        ),
    );
    for endpoint in 2..=4 {
        replacement.insert(
            EndpointId(endpoint),
            replacement_endpoint(
                Some(profile::HOME_AUTOMATION),
                Some(device_type::NON_COLOR_CONTROLLER),
                vec![],
                vec![ClusterRef::Custom(ClusterKey(BUTTON))],
            ),
        );
    }

    let mut triggers = Vec::new();
    for (endpoint, affordance) in [
        (1, "Button 1"),
        (2, "Button 2"),
        (3, "Button 3"),
        (4, "Button 4"),
    ] {
        for (event, command) in [
            ("Pressed", "short_press"),
            ("Double pressed", "double_press"),
            ("Held", "long_press"),
        ] {
            triggers.push(
                AutomationTrigger::new(event, affordance, endpoint, command)
                    .on_cluster(cluster::ON_OFF),
            );
        }
    }

    Ok(QuirkDefinition {
        name: "scene_controller_ts004f",
        identities: vec![
            VendorIdentity::new("_TZ3000_czuyt8lz", "TS004F"),
            VendorIdentity::new("_TZ3000_b3mgfu0d", "TS004F"),
        ],
        signature,
        replacement,
        triggers,
    })
}
