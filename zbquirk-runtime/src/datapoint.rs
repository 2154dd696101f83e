//! Vendor data-point relay
//!
//! Bridge-style devices do not speak standardized attributes at all; an
//! embedded MCU multiplexes everything over numerically-keyed *data
//! points* on one vendor cluster. The relay translates in both directions:
//! inbound data-point updates are redirected to the standardized cluster
//! that owns them, and standardized commands become data-point writes on
//! the command bus.

use zbquirk_model::{AttributeId, AttributeValue, CommandFrame, CommandId};
use zbquirk_registry::ClusterKey;

use crate::bus::PendingWrite;

/// Inbound data-point update command ids on the vendor cluster
pub const DP_RESPONSE: CommandId = CommandId(0x01);
pub const DP_REPORT: CommandId = CommandId(0x02);

/// One row of the bidirectional data-point table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataPointMapping {
    pub data_point: u8,
    /// Cluster implementation that owns the standardized attribute
    pub cluster: ClusterKey,
    pub attribute: &'static str,
}

/// Value carried by a routed write
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoutedValue {
    /// Derive a boolean from the routed command id (off = 0x00, on = 0x01)
    CommandBool,
    /// A fixed payload (countdown sentinels and the like)
    Fixed(AttributeValue),
}

/// One write produced by routing a standardized command
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteWrite {
    pub cluster: ClusterKey,
    pub attribute: &'static str,
    pub value: RoutedValue,
}

/// A standardized command and the writes it fans out to, in order
#[derive(Debug, Clone, PartialEq)]
pub struct CommandRoute {
    pub command: CommandId,
    pub writes: Vec<RouteWrite>,
}

/// A write re-armed whenever a given attribute is reported
///
/// The irrigation valve's countdown must be reset to its maximum whenever
/// the valve opens, including openings the hub never commanded (the
/// physical button), so the trigger is the inbound report itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportWrite {
    pub attribute: AttributeId,
    pub write: RouteWrite,
}

/// Static configuration of one data-point relay cluster
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataPointSpec {
    pub mappings: Vec<DataPointMapping>,
    pub routes: Vec<CommandRoute>,
    pub report_writes: Vec<ReportWrite>,
}

/// A standardized update extracted from an inbound data-point frame,
/// addressed to the cluster implementation that owns the attribute
#[derive(Debug, Clone, PartialEq)]
pub struct Redirect {
    pub cluster: ClusterKey,
    pub attribute: &'static str,
    pub value: AttributeValue,
}

impl DataPointSpec {
    pub fn mapping(&self, data_point: u8) -> Option<&DataPointMapping> {
        self.mappings.iter().find(|m| m.data_point == data_point)
    }

    /// Reverse lookup for write-back: which data point carries an
    /// attribute owned by `cluster`
    pub fn data_point_for(&self, cluster: ClusterKey, attribute: &str) -> Option<u8> {
        self.mappings
            .iter()
            .find(|m| m.cluster == cluster && m.attribute == attribute)
            .map(|m| m.data_point)
    }

    pub fn route(&self, command: CommandId) -> Option<&CommandRoute> {
        self.routes.iter().find(|r| r.command == command)
    }

    /// Decode an inbound data-point frame into a redirect
    ///
    /// Malformed or unmapped frames are diagnostics, never failures: the
    /// caller still acknowledges the frame, it just updates nothing.
    pub fn decode_frame(&self, frame: &CommandFrame) -> Option<Redirect> {
        if frame.command != DP_RESPONSE && frame.command != DP_REPORT {
            tracing::debug!(command = %frame.command, "not a data-point update");
            return None;
        }

        let data_point = match frame.args.first().and_then(|v| v.as_u64()) {
            Some(dp) => dp as u8,
            None => {
                tracing::debug!("malformed data-point frame: missing data point id");
                return None;
            }
        };
        let Some(value) = frame.args.get(1).copied() else {
            tracing::debug!(data_point, "malformed data-point frame: missing value");
            return None;
        };

        match self.mapping(data_point) {
            Some(mapping) => Some(Redirect {
                cluster: mapping.cluster,
                attribute: mapping.attribute,
                value,
            }),
            None => {
                tracing::debug!(data_point, "unmapped data point");
                None
            }
        }
    }
}

/// Materialize a route write into a pending bus write
pub fn resolve_write(write: &RouteWrite, command: CommandId, expect_reply: bool) -> PendingWrite {
    let value = match write.value {
        RoutedValue::CommandBool => AttributeValue::Bool(command.0 == 0x01),
        RoutedValue::Fixed(v) => v,
    };
    PendingWrite {
        cluster: write.cluster,
        attribute: write.attribute,
        value,
        expect_reply,
    }
}

#[cfg(test)]
mod tests {
    use zbquirk_model::{ClusterId, EndpointId};

    use super::*;

    fn spec() -> DataPointSpec {
        DataPointSpec {
            mappings: vec![
                DataPointMapping {
                    data_point: 1,
                    cluster: ClusterKey("valve/on_off"),
                    attribute: "on_off",
                },
                DataPointMapping {
                    data_point: 7,
                    cluster: ClusterKey("valve/power"),
                    attribute: "battery_percentage",
                },
            ],
            routes: vec![CommandRoute {
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
                        value: RoutedValue::Fixed(AttributeValue::I32(i32::MAX)),
                    },
                ],
            }],
            report_writes: vec![],
        }
    }

    fn dp_frame(command: u8, args: Vec<AttributeValue>) -> CommandFrame {
        CommandFrame {
            endpoint: EndpointId(1),
            cluster: ClusterId(0xEF00),
            command: CommandId(command),
            args,
            tsn: 1,
            disable_default_response: false,
        }
    }

    #[test]
    fn test_decode_redirects_mapped_data_point() {
        let redirect = spec()
            .decode_frame(&dp_frame(
                0x01,
                vec![AttributeValue::U8(7), AttributeValue::U8(50)],
            ))
            .expect("redirect");
        assert_eq!(redirect.cluster, ClusterKey("valve/power"));
        assert_eq!(redirect.attribute, "battery_percentage");
        assert_eq!(redirect.value, AttributeValue::U8(50));
    }

    #[test]
    fn test_unmapped_data_point_is_none() {
        assert!(spec()
            .decode_frame(&dp_frame(
                0x02,
                vec![AttributeValue::U8(99), AttributeValue::U8(1)]
            ))
            .is_none());
    }

    #[test]
    fn test_malformed_frame_is_none() {
        assert!(spec().decode_frame(&dp_frame(0x01, vec![])).is_none());
        assert!(spec()
            .decode_frame(&dp_frame(0x01, vec![AttributeValue::U8(1)]))
            .is_none());
    }

    #[test]
    fn test_reverse_lookup_for_write_back() {
        let s = spec();
        assert_eq!(s.data_point_for(ClusterKey("valve/on_off"), "on_off"), Some(1));
        assert_eq!(s.data_point_for(ClusterKey("valve/on_off"), "level"), None);
    }

    #[test]
    fn test_resolve_command_bool() {
        let write = RouteWrite {
            cluster: ClusterKey("valve/on_off"),
            attribute: "on_off",
            value: RoutedValue::CommandBool,
        };
        let on = resolve_write(&write, CommandId(0x01), true);
        let off = resolve_write(&write, CommandId(0x00), true);
        assert_eq!(on.value, AttributeValue::Bool(true));
        assert_eq!(off.value, AttributeValue::Bool(false));
    }
}
