//! Mode-consistency state machine
//!
//! Some switch firmware toggles between a mode that executes actions
//! locally (`Command`) and a mode that only emits notification events
//! (`Event`), and silently falls back to `Command` after power loss or
//! re-pairing. The hub needs `Event`. The watchdog observes inbound
//! traffic for symptoms of the wrong mode and re-asserts the desired mode
//! through the command bus. Purely reactive: no polling, no timers, and no
//! terminal state; it runs for the device's whole connected lifetime.

use std::sync::Arc;

use zbquirk_model::{AttributeId, AttributeValue, CommandFrame, CommandId};

use crate::bus::PendingWrite;
use crate::events::{EventRelay, EventRelaySpec, FrameDisposition};

/// Observed operating mode of the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceMode {
    #[default]
    Unknown,
    Command,
    Event,
}

/// Static configuration for a watchdog cluster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchdogSpec {
    /// Attribute carrying the device's mode
    pub mode_attribute: AttributeId,
    /// Name used for the corrective write on the command bus
    pub mode_attribute_name: &'static str,
    /// Wire value of the undesired auto-execute mode
    pub command_mode_value: u8,
    /// Wire value of the desired notification-only mode
    pub event_mode_value: u8,
    /// Attribute whose report is a symptom of the wrong mode
    pub symptom_attribute: AttributeId,
    /// Command ids whose arrival is a symptom of the wrong mode
    pub symptom_commands: Vec<CommandId>,
    /// Event table for the same wire cluster's command traffic
    pub events: EventRelaySpec,
}

/// What the watchdog wants done after observing one frame
#[derive(Debug, Default, PartialEq)]
pub struct WatchdogEffect {
    /// Corrective mode write to enqueue, if any
    pub corrective: Option<PendingWrite>,
    /// True when the report was consumed and must not reach the hub
    pub consumed: bool,
    /// Semantic event decoded from a command frame
    pub event: Option<crate::events::SemanticEvent>,
    /// Whether a default response is owed for a command frame
    pub respond: bool,
}

/// The per-device mode machine plus the embedded command relay
///
/// This instance is the sole owner of the device's mode state; it is
/// mutated only from the device's (serial) inbound processing path.
#[derive(Debug)]
pub struct ModeWatchdog {
    spec: Arc<WatchdogSpec>,
    mode: DeviceMode,
    relay: EventRelay,
    key: zbquirk_registry::ClusterKey,
}

impl ModeWatchdog {
    pub fn new(spec: Arc<WatchdogSpec>, key: zbquirk_registry::ClusterKey) -> Self {
        let relay = EventRelay::new(Arc::new(spec.events.clone()));
        Self {
            spec,
            mode: DeviceMode::Unknown,
            relay,
            key,
        }
    }

    pub fn mode(&self) -> DeviceMode {
        self.mode
    }

    /// Last transaction sequence number seen on this cluster
    pub fn last_tsn(&self) -> Option<u8> {
        self.relay.last_tsn()
    }

    /// The write that asserts the desired mode on the device
    ///
    /// Identical every time it is issued; duplicate delivery is harmless.
    pub fn corrective_write(&self) -> PendingWrite {
        PendingWrite {
            cluster: self.key,
            attribute: self.spec.mode_attribute_name,
            value: AttributeValue::Enum8(self.spec.event_mode_value),
            expect_reply: true,
        }
    }

    /// The device showed a symptom of being in auto-execute mode
    ///
    /// Always re-asserts the desired mode: corrective writes are
    /// idempotent, and when the state was already `Command` the previous
    /// correction may simply not have taken effect yet.
    fn on_symptom(&mut self) -> PendingWrite {
        if self.mode == DeviceMode::Command {
            tracing::debug!("repeat wrong-mode symptom; re-issuing corrective write");
        } else {
            tracing::debug!(previous = ?self.mode, "wrong-mode symptom; flagging command mode");
        }
        self.mode = DeviceMode::Command;
        self.corrective_write()
    }

    /// Process an attribute report addressed to this cluster
    pub fn on_report(&mut self, attribute: AttributeId, value: AttributeValue) -> WatchdogEffect {
        let mut effect = WatchdogEffect::default();

        if attribute == self.spec.mode_attribute {
            effect.consumed = true;
            let raw = value.as_u64().map(|v| v as u8);
            if raw == Some(self.spec.command_mode_value) {
                tracing::debug!("device reported command mode; reconfiguring to event mode");
                effect.corrective = Some(self.on_symptom());
            } else if raw == Some(self.spec.event_mode_value) {
                tracing::debug!("device reported event mode");
                self.mode = DeviceMode::Event;
            } else {
                // Unrecognized mode value: forward it rather than guess.
                effect.consumed = false;
            }
        } else if attribute == self.spec.symptom_attribute {
            effect.consumed = true;
            effect.corrective = Some(self.on_symptom());
        }

        effect
    }

    /// Process a command frame addressed to this cluster
    pub fn on_command(&mut self, frame: &CommandFrame) -> WatchdogEffect {
        let mut effect = WatchdogEffect::default();

        match self.relay.on_frame(frame) {
            FrameDisposition::Duplicate => {
                effect.consumed = true;
            }
            FrameDisposition::Processed { event, respond } => {
                effect.respond = respond;
                effect.event = event;
                if effect.event.is_none() && self.spec.symptom_commands.contains(&frame.command) {
                    effect.corrective = Some(self.on_symptom());
                }
            }
        }
        effect
    }
}

#[cfg(test)]
mod tests {
    use zbquirk_model::{ClusterId, EndpointId};
    use zbquirk_registry::ClusterKey;

    use crate::events::EventMapEntry;

    use super::*;

    fn spec() -> Arc<WatchdogSpec> {
        Arc::new(WatchdogSpec {
            mode_attribute: AttributeId(0x8004),
            mode_attribute_name: "switch_mode",
            command_mode_value: 0x00,
            event_mode_value: 0x01,
            symptom_attribute: AttributeId(0x0000),
            symptom_commands: vec![CommandId(0x00), CommandId(0x01)],
            events: EventRelaySpec::new(vec![
                EventMapEntry::new(0xFD, "short_press").with_selector(0x00),
            ]),
        })
    }

    fn watchdog() -> ModeWatchdog {
        ModeWatchdog::new(spec(), ClusterKey("test/watchdog"))
    }

    fn onoff_frame(tsn: u8) -> CommandFrame {
        CommandFrame {
            endpoint: EndpointId(1),
            cluster: ClusterId(0x0006),
            command: CommandId(0x01),
            args: vec![],
            tsn,
            disable_default_response: false,
        }
    }

    #[test]
    fn test_command_mode_report_triggers_single_corrective() {
        let mut dog = watchdog();
        let effect = dog.on_report(AttributeId(0x8004), AttributeValue::Enum8(0x00));

        assert!(effect.consumed);
        let write = effect.corrective.expect("corrective write");
        assert_eq!(write.attribute, "switch_mode");
        assert_eq!(write.value, AttributeValue::Enum8(0x01));
        assert_eq!(dog.mode(), DeviceMode::Command);
    }

    #[test]
    fn test_event_mode_report_settles_without_write() {
        let mut dog = watchdog();
        let effect = dog.on_report(AttributeId(0x8004), AttributeValue::Enum8(0x01));
        assert!(effect.consumed);
        assert!(effect.corrective.is_none());
        assert_eq!(dog.mode(), DeviceMode::Event);
    }

    #[test]
    fn test_three_symptoms_three_identical_writes() {
        // Command report, on/off report, Command report: one corrective
        // write per symptom, all with the same payload.
        let mut dog = watchdog();
        let mut writes = vec![];

        for effect in [
            dog.on_report(AttributeId(0x8004), AttributeValue::Enum8(0x00)),
            dog.on_report(AttributeId(0x0000), AttributeValue::Bool(true)),
            dog.on_report(AttributeId(0x8004), AttributeValue::Enum8(0x00)),
        ] {
            writes.extend(effect.corrective);
        }

        assert_eq!(writes.len(), 3);
        assert!(writes.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_onoff_command_is_symptom_even_when_settled() {
        let mut dog = watchdog();
        dog.on_report(AttributeId(0x8004), AttributeValue::Enum8(0x01));
        assert_eq!(dog.mode(), DeviceMode::Event);

        let effect = dog.on_command(&onoff_frame(1));
        assert!(effect.corrective.is_some());
        assert!(effect.respond);
        assert_eq!(dog.mode(), DeviceMode::Command);
    }

    #[test]
    fn test_duplicate_command_absorbed() {
        let mut dog = watchdog();
        let first = dog.on_command(&onoff_frame(7));
        let second = dog.on_command(&onoff_frame(7));

        assert!(first.corrective.is_some());
        assert!(second.corrective.is_none());
        assert!(second.consumed);
        assert!(!second.respond);
    }

    #[test]
    fn test_press_event_is_not_a_symptom() {
        let mut dog = watchdog();
        let frame = CommandFrame {
            command: CommandId(0xFD),
            args: vec![AttributeValue::U8(0x00)],
            ..onoff_frame(3)
        };
        let effect = dog.on_command(&frame);
        assert_eq!(effect.event.expect("event").event, "short_press");
        assert!(effect.corrective.is_none());
        assert_eq!(dog.mode(), DeviceMode::Unknown);
    }

    #[test]
    fn test_unknown_mode_value_passes_through() {
        let mut dog = watchdog();
        let effect = dog.on_report(AttributeId(0x8004), AttributeValue::Enum8(0x07));
        assert!(!effect.consumed);
        assert!(effect.corrective.is_none());
        assert_eq!(dog.mode(), DeviceMode::Unknown);
    }
}
