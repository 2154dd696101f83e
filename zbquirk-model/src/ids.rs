//! Identifier newtypes for endpoints, clusters, attributes, and commands
//!
//! Small wrappers over the raw wire integers. Keeping these distinct types
//! prevents the classic mixup between a cluster id and an attribute id when
//! both are bare `u16`s.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical sub-device address within one physical device (1-240 on the wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EndpointId(pub u8);

impl fmt::Display for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Numeric cluster identifier (e.g. 0x0006 for on/off)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClusterId(pub u16);

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04X}", self.0)
    }
}

impl From<u16> for ClusterId {
    fn from(raw: u16) -> Self {
        ClusterId(raw)
    }
}

/// Attribute identifier within one cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AttributeId(pub u16);

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04X}", self.0)
    }
}

/// Command identifier within one cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CommandId(pub u8);

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}", self.0)
    }
}

/// Application profile identifier (0x0104 for home automation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProfileId(pub u16);

/// Device type within a profile (e.g. dimmer switch, smart plug)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceTypeId(pub u16);

/// Opaque device identifier assigned by the transport layer
///
/// Usually the stringified IEEE address. The core never interprets it; it
/// only keys per-device sessions and outbound updates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_id_display_is_hex() {
        assert_eq!(ClusterId(0x0006).to_string(), "0x0006");
        assert_eq!(ClusterId(0xEF00).to_string(), "0xEF00");
    }

    #[test]
    fn test_device_id_round_trip() {
        let id = DeviceId::new("00:12:4b:00:1c:a1:b2:c3");
        assert_eq!(id.as_str(), "00:12:4b:00:1c:a1:b2:c3");
    }

    #[test]
    fn test_endpoint_ordering() {
        assert!(EndpointId(1) < EndpointId(2));
    }
}
