//! Vendor command router
//!
//! Standardized commands addressed to a bridge-style cluster are not
//! executed locally. The router looks the command up in the cluster's
//! route table, fans the resulting writes out on the command bus in FIFO
//! order, and immediately returns a locally-synthesized acknowledgement.
//! The device's real acknowledgement, if it sends one, arrives later as an
//! ordinary inbound frame.

use zbquirk_model::CommandId;

use crate::bus::CommandBus;
use crate::clusters::{ClusterImpl, ClusterInstance};
use crate::datapoint::resolve_write;

/// Locally-synthesized acknowledgement returned to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acknowledgement {
    /// The command was routed; writes are on the bus
    Success { command: CommandId },
    /// No route exists; nothing was enqueued
    Unsupported { command: CommandId },
}

impl Acknowledgement {
    pub fn is_success(&self) -> bool {
        matches!(self, Acknowledgement::Success { .. })
    }
}

/// Route one standardized command through a cluster instance
pub fn route(instance: &ClusterInstance, command: CommandId, bus: &CommandBus) -> Acknowledgement {
    let ClusterImpl::DataPointRelay(spec) = &instance.imp else {
        tracing::warn!(
            cluster = %instance.key,
            %command,
            "command routed to a cluster with no vendor routes"
        );
        return Acknowledgement::Unsupported { command };
    };

    let Some(route) = spec.route(command) else {
        tracing::warn!(cluster = %instance.key, %command, "unsupported command");
        return Acknowledgement::Unsupported { command };
    };

    for write in &route.writes {
        bus.enqueue_write(instance.endpoint, resolve_write(write, command, true));
    }
    tracing::debug!(
        cluster = %instance.key,
        %command,
        writes = route.writes.len(),
        "routed command to bus"
    );
    Acknowledgement::Success { command }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use zbquirk_model::{AttributeValue, ClusterId, EndpointId};
    use zbquirk_registry::ClusterKey;

    use crate::bus::BusRequest;
    use crate::clusters::{ClusterSpec, ClusterTemplate};
    use crate::datapoint::{CommandRoute, DataPointSpec, RouteWrite, RoutedValue};

    use super::*;

    const COUNTDOWN_MAX: i32 = 2_147_483_647;

    fn valve_instance() -> ClusterInstance {
        let spec = DataPointSpec {
            mappings: vec![],
            routes: vec![
                CommandRoute {
                    command: CommandId(0x00),
                    writes: vec![
                        RouteWrite {
                            cluster: ClusterKey("valve/on_off"),
                            attribute: "on_off",
                            value: RoutedValue::CommandBool,
                        },
                        RouteWrite {
                            cluster: ClusterKey("valve/bus"),
                            attribute: "timer_remaining",
                            value: RoutedValue::Fixed(AttributeValue::I32(COUNTDOWN_MAX)),
                        },
                    ],
                },
                CommandRoute {
                    command: CommandId(0x01),
                    writes: vec![
                        RouteWrite {
                            cluster: ClusterKey("valve/on_off"),
                            attribute: "on_off",
                            value: RoutedValue::CommandBool,
                        },
                        RouteWrite {
                            cluster: ClusterKey("valve/bus"),
                            attribute: "timer_remaining",
                            value: RoutedValue::Fixed(AttributeValue::I32(COUNTDOWN_MAX)),
                        },
                    ],
                },
            ],
            report_writes: vec![],
        };
        ClusterTemplate::new(
            "valve/on_off",
            ClusterId(0x0006),
            ClusterSpec::DataPointRelay(Arc::new(spec)),
        )
        .instantiate(EndpointId(1))
    }

    #[test]
    fn test_on_command_fans_out_two_writes_in_order() {
        let (bus, rx) = CommandBus::channel();
        let ack = route(&valve_instance(), CommandId(0x01), &bus);
        assert!(ack.is_success());

        let drained = rx.drain();
        assert_eq!(drained.len(), 2);
        match (&drained[0], &drained[1]) {
            (BusRequest::Write(first), BusRequest::Write(second)) => {
                assert_eq!(first.attribute, "on_off");
                assert_eq!(first.value, AttributeValue::Bool(true));
                assert_eq!(second.attribute, "timer_remaining");
                assert_eq!(second.value, AttributeValue::I32(COUNTDOWN_MAX));
            }
            other => panic!("unexpected requests: {other:?}"),
        }
    }

    #[test]
    fn test_unsupported_command_enqueues_nothing() {
        let (bus, rx) = CommandBus::channel();
        let ack = route(&valve_instance(), CommandId(0x42), &bus);
        assert_eq!(
            ack,
            Acknowledgement::Unsupported {
                command: CommandId(0x42)
            }
        );
        assert!(rx.drain().is_empty());
    }
}
