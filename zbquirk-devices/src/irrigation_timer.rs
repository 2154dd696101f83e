//! Battery irrigation valve timer (TS0601 bridge device)
//!
//! Pure data-point device: everything rides the vendor MCU cluster. The
//! replacement fronts it with a standardized on/off cluster and a battery
//! cluster, both fed by the data-point table. Turning the valve on always
//! re-arms the firmware countdown to its maximum sentinel so the valve
//! does not shut itself after the vendor default.

use std::collections::BTreeMap;
use std::sync::Arc;

use zbquirk_model::consts::{attribute, cluster, device_type, profile};
use zbquirk_model::{
    AttributeId, AttributeValue, CommandId, EndpointDescriptor, EndpointId, Topology,
    TopologyError, VendorIdentity,
};
use zbquirk_registry::{replacement_endpoint, ClusterKey, ClusterRef, QuirkDefinition};
use zbquirk_runtime::{
    AttributeDef, BindPolicy, CalibrationSpec, ClusterSpec, ClusterTemplate, CommandRoute,
    DataPointMapping, DataPointSpec, ReportWrite, ReportingPolicy, ReportTransform, RouteWrite,
    RoutedValue,
};

/// Battery cluster fed by data point 7
pub const POWER: &str = "irrigation/power";
/// Standardized valve on/off front
pub const VALVE: &str = "irrigation/valve";
/// Vendor MCU data-point bus
pub const BUS: &str = "irrigation/bus";

/// Firmware countdown sentinel: maximum 32-bit signed seconds
pub const COUNTDOWN_MAX: i32 = 2_147_483_647;

fn countdown_reset() -> RouteWrite {
    RouteWrite {
        cluster: ClusterKey(BUS),
        attribute: "timer_remaining",
        value: RoutedValue::Fixed(AttributeValue::I32(COUNTDOWN_MAX)),
    }
}

fn valve_route(command: u8) -> CommandRoute {
    CommandRoute {
        command: CommandId(command),
        writes: vec![
            RouteWrite {
                cluster: ClusterKey(VALVE),
                attribute: "on_off",
                value: RoutedValue::CommandBool,
            },
            countdown_reset(),
        ],
    }
}

pub fn templates() -> Vec<ClusterTemplate> {
    vec![
        // Battery percentage arrives halved and the cluster must never be
        // bound or configured for reporting.
        ClusterTemplate::new(
            POWER,
            cluster::POWER_CONFIGURATION,
            ClusterSpec::Calibration(Arc::new(CalibrationSpec {
                transforms: vec![(
                    attribute::BATTERY_PERCENTAGE,
                    ReportTransform::Scale { factor: 2 },
                )],
                constants: vec![],
            })),
        )
        .with_attributes(vec![AttributeDef::new(0x0021, "battery_percentage")])
        .with_bind(BindPolicy::Suppress)
        .with_reporting(ReportingPolicy::SuppressAll),
        ClusterTemplate::new(
            VALVE,
            cluster::ON_OFF,
            ClusterSpec::DataPointRelay(Arc::new(DataPointSpec {
                mappings: vec![],
                routes: vec![valve_route(0x00), valve_route(0x01)],
                // Physical-button openings bypass the hub; the inbound
                // report itself re-arms the countdown.
                report_writes: vec![ReportWrite {
                    attribute: attribute::ON_OFF,
                    write: countdown_reset(),
                }],
            })),
        )
        .with_attributes(vec![AttributeDef::new(0x0000, "on_off")])
        .with_bind(BindPolicy::VendorHandshake {
            anchor: EndpointId(1),
        })
        .with_reporting(ReportingPolicy::SuppressAll),
        ClusterTemplate::new(
            BUS,
            cluster::VENDOR_MCU,
            ClusterSpec::DataPointRelay(Arc::new(DataPointSpec {
                mappings: vec![
                    DataPointMapping {
                        data_point: 1,
                        cluster: ClusterKey(VALVE),
                        attribute: "on_off",
                    },
                    DataPointMapping {
                        data_point: 5,
                        cluster: ClusterKey(BUS),
                        attribute: "water_consumed_ml",
                    },
                    DataPointMapping {
                        data_point: 6,
                        cluster: ClusterKey(BUS),
                        attribute: "water_consumed_l",
                    },
                    DataPointMapping {
                        data_point: 7,
                        cluster: ClusterKey(POWER),
                        attribute: "battery_percentage",
                    },
                    DataPointMapping {
                        data_point: 10,
                        cluster: ClusterKey(BUS),
                        attribute: "weather_delay",
                    },
                    DataPointMapping {
                        data_point: 11,
                        cluster: ClusterKey(BUS),
                        attribute: "timer_remaining",
                    },
                    DataPointMapping {
                        data_point: 12,
                        cluster: ClusterKey(BUS),
                        attribute: "timer_state",
                    },
                    DataPointMapping {
                        data_point: 15,
                        cluster: ClusterKey(BUS),
                        attribute: "last_valve_open_duration",
                    },
                ],
                routes: vec![],
                report_writes: vec![],
            })),
        )
        .with_attributes(vec![
            AttributeDef::new(0xEF01, "timer_remaining"),
            AttributeDef::new(0xEF02, "timer_state"),
            AttributeDef::new(0xEF03, "last_valve_open_duration"),
            AttributeDef::new(0xEF04, "water_consumed_l"),
            AttributeDef::new(0xEF05, "water_consumed_ml"),
            AttributeDef::new(0xEF06, "weather_delay"),
        ]),
    ]
}

pub fn quirk() -> Result<QuirkDefinition, TopologyError> {
    let signature = Topology::new().with_endpoint(
        1,
        EndpointDescriptor::new(
            profile::HOME_AUTOMATION,
            device_type::SMART_PLUG,
            vec![
                cluster::BASIC,
                cluster::GROUPS,
                cluster::SCENES,
                cluster::VENDOR_MCU,
            ],
            vec![cluster::OTA, cluster::TIME],
        )?,
    )?;

    let mut replacement = BTreeMap::new();
    replacement.insert(
        EndpointId(1),
        replacement_endpoint(
            None,
            Some(device_type::PUMP_CONTROLLER),
            vec![
                ClusterRef::Raw(cluster::BASIC),
                ClusterRef::Custom(ClusterKey(POWER)),
                ClusterRef::Custom(ClusterKey(VALVE)),
                ClusterRef::Custom(ClusterKey(BUS)),
            ],
            vec![ClusterRef::Raw(cluster::TIME)],
        ),
    );

    Ok(QuirkDefinition {
        name: "irrigation_timer_ts0601",
        identities: vec![VendorIdentity::new("_TZE200_81isopgh", "TS0601")],
        signature,
        replacement,
        triggers: vec![],
    })
}

/// Attribute id of the countdown on the vendor bus cluster
pub const TIMER_REMAINING: AttributeId = AttributeId(0xEF01);
