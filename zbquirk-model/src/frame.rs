//! Inbound frame shapes delivered by the transport collaborator
//!
//! The transport parses the wire format; this crate only sees the already
//! decoded report/command payloads plus the transaction sequence number the
//! dedup stage keys on.

use serde::{Deserialize, Serialize};

use crate::ids::{AttributeId, ClusterId, CommandId, EndpointId};
use crate::value::AttributeValue;

/// An unsolicited or polled value update for one attribute
///
/// Transient: consumed by the transform pipeline, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeReport {
    pub endpoint: EndpointId,
    pub cluster: ClusterId,
    pub attribute: AttributeId,
    pub value: AttributeValue,
    /// Transaction sequence number, the report's ordering key
    pub tsn: u8,
}

/// A cluster-specific command received from the device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandFrame {
    pub endpoint: EndpointId,
    pub cluster: ClusterId,
    pub command: CommandId,
    pub args: Vec<AttributeValue>,
    pub tsn: u8,
    /// Set when the sender asked for no default response
    pub disable_default_response: bool,
}

/// Either inbound shape, as delivered on a device's frame stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InboundFrame {
    Report(AttributeReport),
    Command(CommandFrame),
}

impl InboundFrame {
    pub fn endpoint(&self) -> EndpointId {
        match self {
            InboundFrame::Report(r) => r.endpoint,
            InboundFrame::Command(c) => c.endpoint,
        }
    }

    pub fn cluster(&self) -> ClusterId {
        match self {
            InboundFrame::Report(r) => r.cluster,
            InboundFrame::Command(c) => c.cluster,
        }
    }
}

/// Status carried in a default response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameStatus {
    Success,
    UnsupportedCommand,
}

/// Acknowledgement frame returned to the transport for a processed command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultResponse {
    pub endpoint: EndpointId,
    pub cluster: ClusterId,
    pub command: CommandId,
    pub status: FrameStatus,
    pub tsn: u8,
}

impl DefaultResponse {
    /// Success response echoing a command frame's addressing
    pub fn success(frame: &CommandFrame) -> Self {
        Self {
            endpoint: frame.endpoint,
            cluster: frame.cluster,
            command: frame.command,
            status: FrameStatus::Success,
            tsn: frame.tsn,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_response_echoes_frame() {
        let frame = CommandFrame {
            endpoint: EndpointId(2),
            cluster: ClusterId(0x0006),
            command: CommandId(0xFD),
            args: vec![AttributeValue::U8(1)],
            tsn: 42,
            disable_default_response: false,
        };
        let rsp = DefaultResponse::success(&frame);
        assert_eq!(rsp.endpoint, EndpointId(2));
        assert_eq!(rsp.tsn, 42);
        assert_eq!(rsp.status, FrameStatus::Success);
    }
}
