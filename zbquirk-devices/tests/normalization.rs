//! End-to-end normalization flows for the shipped device family
//!
//! Each test walks the full path a real device join takes: match the
//! advertised topology against the registry, build a session from the
//! matched quirk, then feed wire frames and observe hub updates and
//! command-bus traffic.

use std::sync::mpsc;

use zbquirk_devices::{irrigation_timer, register_all};
use zbquirk_model::consts::{attribute, cluster, device_type, profile, zone_type};
use zbquirk_model::{
    AttributeId, AttributeReport, AttributeValue, CommandFrame, CommandId, EndpointDescriptor,
    EndpointId, FrameStatus, Topology, VendorIdentity,
};
use zbquirk_registry::QuirkRegistry;
use zbquirk_runtime::{
    BusReceiver, BusRequest, ClusterCatalog, DeviceSession, HubUpdate,
};

fn build(
    identity: VendorIdentity,
    observed: &Topology,
) -> (DeviceSession, BusReceiver, mpsc::Receiver<HubUpdate>) {
    let mut registry = QuirkRegistry::new();
    let mut catalog = ClusterCatalog::new();
    register_all(&mut registry, &mut catalog).expect("definitions load");

    let quirk = registry
        .match_device(observed, &identity)
        .expect("unambiguous")
        .expect("a quirk matches");

    let (hub_tx, hub_rx) = mpsc::channel();
    let (session, bus_rx) =
        DeviceSession::new(identity, quirk, observed, &catalog, hub_tx).expect("session builds");
    (session, bus_rx, hub_rx)
}

fn scene_controller_topology() -> Topology {
    Topology::new()
        .with_endpoint(
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
            )
            .unwrap(),
        )
        .unwrap()
}

fn irrigation_topology() -> Topology {
    Topology::new()
        .with_endpoint(
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
            )
            .unwrap(),
        )
        .unwrap()
}

fn press_frame(endpoint: u8, tsn: u8, press_type: u8) -> CommandFrame {
    CommandFrame {
        endpoint: EndpointId(endpoint),
        cluster: cluster::ON_OFF,
        command: CommandId(0xFD),
        args: vec![AttributeValue::U8(press_type)],
        tsn,
        disable_default_response: false,
    }
}

fn drain_writes(bus: &BusReceiver) -> Vec<zbquirk_runtime::CommandBusEntry> {
    bus.drain()
        .into_iter()
        .filter_map(|request| match request {
            BusRequest::Write(entry) => Some(entry),
            BusRequest::ReadAttributes { .. } => None,
        })
        .collect()
}

#[test]
fn scene_controller_matches_and_spreads_buttons() {
    let identity = VendorIdentity::new("_TZ3000_czuyt8lz", "TS004F");
    let (session, _bus, _hub) = build(identity, &scene_controller_topology());

    let endpoints: Vec<_> = session.endpoint_ids().collect();
    assert_eq!(
        endpoints,
        vec![EndpointId(1), EndpointId(2), EndpointId(3), EndpointId(4)]
    );
}

#[test]
fn scene_controller_dedups_retransmitted_presses() {
    let identity = VendorIdentity::new("_TZ3000_b3mgfu0d", "TS004F");
    let (mut session, _bus, hub) = build(identity, &scene_controller_topology());

    for tsn in [5u8, 5, 6, 6, 7] {
        session.handle_command(&press_frame(2, tsn, 0x00));
    }

    let events: Vec<_> = hub
        .try_iter()
        .filter_map(|update| update.as_event().cloned())
        .collect();
    assert_eq!(events.len(), 3);
    assert!(events.iter().all(|e| e.event == "short_press"));
    assert!(events.iter().all(|e| e.endpoint == EndpointId(2)));
}

#[test]
fn scene_controller_mode_watchdog_converges() {
    let identity = VendorIdentity::new("_TZ3000_czuyt8lz", "TS004F");
    let (mut session, bus, _hub) = build(identity, &scene_controller_topology());

    // Device reports it fell back to command mode.
    session.handle_report(&AttributeReport {
        endpoint: EndpointId(1),
        cluster: cluster::ON_OFF,
        attribute: attribute::SWITCH_MODE,
        value: AttributeValue::Enum8(0x00),
        tsn: 1,
    });

    let writes = drain_writes(&bus);
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].attribute, "switch_mode");
    assert_eq!(writes[0].value, AttributeValue::Enum8(0x01));
}

#[test]
fn scene_controller_three_symptoms_three_identical_corrections() {
    let identity = VendorIdentity::new("_TZ3000_czuyt8lz", "TS004F");
    let (mut session, bus, _hub) = build(identity, &scene_controller_topology());

    let mode_report = |value: u8, tsn: u8| AttributeReport {
        endpoint: EndpointId(1),
        cluster: cluster::ON_OFF,
        attribute: attribute::SWITCH_MODE,
        value: AttributeValue::Enum8(value),
        tsn,
    };

    session.handle_report(&mode_report(0x00, 1));
    session.handle_report(&AttributeReport {
        endpoint: EndpointId(1),
        cluster: cluster::ON_OFF,
        attribute: attribute::ON_OFF,
        value: AttributeValue::Bool(true),
        tsn: 2,
    });
    session.handle_report(&mode_report(0x00, 3));

    let writes = drain_writes(&bus);
    assert_eq!(writes.len(), 3);
    assert!(writes
        .windows(2)
        .all(|w| w[0].attribute == w[1].attribute && w[0].value == w[1].value));
}

#[test]
fn scene_controller_bind_casts_wakeup_then_mode_write() {
    let identity = VendorIdentity::new("_TZ3000_czuyt8lz", "TS004F");
    let (session, bus, _hub) = build(identity, &scene_controller_topology());

    session.bind_all();

    let requests = bus.drain();
    assert_eq!(requests.len(), 2);
    match &requests[0] {
        BusRequest::ReadAttributes {
            endpoint,
            cluster: c,
            attributes,
        } => {
            assert_eq!(*endpoint, EndpointId(1));
            assert_eq!(*c, cluster::BASIC);
            assert_eq!(attributes.len(), 6);
            assert_eq!(attributes[5], AttributeId(0xFFFE));
        }
        other => panic!("expected read request first, got {other:?}"),
    }
    match &requests[1] {
        BusRequest::Write(entry) => {
            assert_eq!(entry.attribute, "switch_mode");
            assert_eq!(entry.value, AttributeValue::Enum8(0x01));
        }
        other => panic!("expected mode write second, got {other:?}"),
    }
}

#[test]
fn irrigation_on_command_fans_out_valve_write_then_countdown_reset() {
    let identity = VendorIdentity::new("_TZE200_81isopgh", "TS0601");
    let (session, bus, _hub) = build(identity, &irrigation_topology());

    let ack = session.route_command(EndpointId(1), cluster::ON_OFF, CommandId(0x01));
    assert!(ack.is_success());

    let writes = drain_writes(&bus);
    assert_eq!(writes.len(), 2);
    assert_eq!(writes[0].attribute, "on_off");
    assert_eq!(writes[0].value, AttributeValue::Bool(true));
    assert_eq!(writes[1].attribute, "timer_remaining");
    assert_eq!(
        writes[1].value,
        AttributeValue::I32(irrigation_timer::COUNTDOWN_MAX)
    );
    assert!(writes[0].correlation < writes[1].correlation);
}

#[test]
fn irrigation_unsupported_command_enqueues_nothing() {
    let identity = VendorIdentity::new("_TZE200_81isopgh", "TS0601");
    let (session, bus, _hub) = build(identity, &irrigation_topology());

    let ack = session.route_command(EndpointId(1), cluster::ON_OFF, CommandId(0x42));
    assert!(!ack.is_success());
    assert!(bus.drain().is_empty());
}

#[test]
fn irrigation_battery_data_point_is_doubled() {
    let identity = VendorIdentity::new("_TZE200_81isopgh", "TS0601");
    let (mut session, _bus, hub) = build(identity, &irrigation_topology());
    let _ = hub.try_iter().count();

    let response = session.handle_command(&CommandFrame {
        endpoint: EndpointId(1),
        cluster: cluster::VENDOR_MCU,
        command: CommandId(0x02),
        args: vec![AttributeValue::U8(7), AttributeValue::U8(47)],
        tsn: 9,
        disable_default_response: false,
    });
    assert_eq!(response.map(|r| r.status), Some(FrameStatus::Success));

    let update = hub.try_recv().expect("battery update");
    let update = update.as_attribute().expect("attribute");
    assert_eq!(update.cluster, cluster::POWER_CONFIGURATION);
    assert_eq!(update.value, AttributeValue::U8(94));
    assert_eq!(update.name, Some("battery_percentage"));
}

#[test]
fn irrigation_valve_data_point_rearms_countdown() {
    let identity = VendorIdentity::new("_TZE200_81isopgh", "TS0601");
    let (mut session, bus, hub) = build(identity, &irrigation_topology());
    let _ = hub.try_iter().count();

    // The valve opened (possibly via the physical button).
    session.handle_command(&CommandFrame {
        endpoint: EndpointId(1),
        cluster: cluster::VENDOR_MCU,
        command: CommandId(0x01),
        args: vec![AttributeValue::U8(1), AttributeValue::Bool(true)],
        tsn: 10,
        disable_default_response: false,
    });

    // The on/off state reaches the hub and the countdown is re-armed.
    let update = hub.try_recv().expect("valve update");
    let update = update.as_attribute().expect("attribute");
    assert_eq!(update.cluster, cluster::ON_OFF);
    assert_eq!(update.value, AttributeValue::Bool(true));

    let writes = drain_writes(&bus);
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].attribute, "timer_remaining");
    assert_eq!(
        writes[0].value,
        AttributeValue::I32(irrigation_timer::COUNTDOWN_MAX)
    );
}

#[test]
fn motion_sensor_illuminance_is_recalibrated() {
    let identity = VendorIdentity::new("Candeo", "C-ZB-SEMO");
    let observed = Topology::new()
        .with_endpoint(
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
            )
            .unwrap(),
        )
        .unwrap();
    let (mut session, _bus, hub) = build(identity, &observed);

    // The zone type constant is reported at session build.
    let constant = hub.try_recv().expect("zone type");
    let constant = constant.as_attribute().expect("attribute");
    assert_eq!(constant.value, AttributeValue::U16(zone_type::MOTION_SENSOR));

    // Raw 20000 (~100 lux) corrects below the floor and clamps to 1 lux.
    session.handle_report(&AttributeReport {
        endpoint: EndpointId(1),
        cluster: cluster::ILLUMINANCE_MEASUREMENT,
        attribute: attribute::ILLUMINANCE_MEASURED,
        value: AttributeValue::U16(20_000),
        tsn: 1,
    });

    let update = hub.try_recv().expect("illuminance update");
    let update = update.as_attribute().expect("attribute");
    assert_eq!(update.value, AttributeValue::U16(1));
}

#[test]
fn cct_controller_strikes_color_coordinate_reporting() {
    let identity = VendorIdentity::new("Candeo", "C-ZB-LC20-CCT");
    let observed = Topology::new()
        .with_endpoint(
            11,
            EndpointDescriptor::new(
                profile::HOME_AUTOMATION,
                device_type::COLOR_TEMPERATURE_LIGHT,
                vec![
                    cluster::BASIC,
                    cluster::IDENTIFY,
                    cluster::GROUPS,
                    cluster::SCENES,
                    cluster::ON_OFF,
                    cluster::LEVEL_CONTROL,
                    cluster::COLOR_CONTROL,
                    cluster::LIGHT_LINK,
                ],
                vec![cluster::OTA],
            )
            .unwrap(),
        )
        .unwrap();
    let (session, _bus, _hub) = build(identity, &observed);

    let record = |attribute: u16| zbquirk_runtime::ReportingRecord {
        attribute: AttributeId(attribute),
        min_interval: 1,
        max_interval: 300,
        reportable_change: 1,
    };
    let filtered = session.filter_reporting_request(
        EndpointId(11),
        cluster::COLOR_CONTROL,
        vec![record(0x0003), record(0x0007), record(0x0004)],
    );

    assert_eq!(filtered, vec![record(0x0007)]);
}

#[test]
fn rotary_remote_rotation_carries_direction() {
    let identity = VendorIdentity::new("Candeo", "C-ZB-RD1P-REM");
    let observed = Topology::new()
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
            )
            .unwrap(),
        )
        .unwrap()
        .with_endpoint(
            2,
            EndpointDescriptor::new(
                profile::HOME_AUTOMATION,
                device_type::REMOTE_CONTROL,
                vec![cluster::BASIC, cluster::IDENTIFY],
                vec![cluster::IDENTIFY, cluster::ON_OFF, cluster::LEVEL_CONTROL],
            )
            .unwrap(),
        )
        .unwrap();
    let (mut session, _bus, hub) = build(identity, &observed);

    let response = session.handle_command(&CommandFrame {
        endpoint: EndpointId(2),
        cluster: cluster::LEVEL_CONTROL,
        command: CommandId(0x05),
        args: vec![AttributeValue::Enum8(1)],
        tsn: 20,
        disable_default_response: false,
    });
    assert_eq!(response.map(|r| r.status), Some(FrameStatus::Success));

    let event = hub.try_recv().expect("rotation event");
    let event = event.as_event().cloned().expect("event");
    assert_eq!(event.event, "started_rotating");
    assert_eq!(event.params, vec![("direction", 1)]);
    assert_eq!(event.endpoint, EndpointId(2));
}

#[test]
fn superset_topology_does_not_match() {
    let mut registry = QuirkRegistry::new();
    let mut catalog = ClusterCatalog::new();
    register_all(&mut registry, &mut catalog).unwrap();

    // Same scene controller but with one extra input cluster on EP1.
    let mut observed = scene_controller_topology();
    let mut descriptor = observed.get(EndpointId(1)).unwrap().clone();
    descriptor.input_clusters.push(cluster::SCENES);
    observed.insert(EndpointId(1), descriptor).unwrap();

    let matched = registry
        .match_device(&observed, &VendorIdentity::new("_TZ3000_czuyt8lz", "TS004F"))
        .unwrap();
    assert!(matched.is_none());
}
