//! Frame deduplication and semantic event mapping
//!
//! Button and rotary devices speak in cluster commands, and they retransmit
//! aggressively. The relay drops frames whose transaction sequence number
//! repeats the last one processed for its endpoint, then maps the command
//! through a static table to a semantic event (press/hold/rotate). The
//! frame ordering guarantee is per device, so the single-slot dedup is
//! sufficient.

use std::sync::Arc;

use zbquirk_model::{CommandFrame, CommandId, EndpointId};

/// A hub-facing event decoded from a vendor command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticEvent {
    pub endpoint: EndpointId,
    pub event: &'static str,
    /// Named parameters (e.g. rotation direction)
    pub params: Vec<(&'static str, u8)>,
}

/// One row of the command-to-event table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventMapEntry {
    pub command: CommandId,
    /// When set, dispatch on the first argument as well as the command id
    /// (multi-press commands carry the press type as an argument)
    pub selector: Option<u8>,
    pub event: &'static str,
    /// Names assigned positionally to the remaining arguments
    pub arg_names: Vec<&'static str>,
}

impl EventMapEntry {
    pub fn new(command: u8, event: &'static str) -> Self {
        Self {
            command: CommandId(command),
            selector: None,
            event,
            arg_names: Vec::new(),
        }
    }

    pub fn with_selector(mut self, selector: u8) -> Self {
        self.selector = Some(selector);
        self
    }

    pub fn with_arg(mut self, name: &'static str) -> Self {
        self.arg_names.push(name);
        self
    }
}

/// Static configuration for one event relay cluster
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventRelaySpec {
    pub events: Vec<EventMapEntry>,
}

impl EventRelaySpec {
    pub fn new(events: Vec<EventMapEntry>) -> Self {
        Self { events }
    }
}

/// What became of one inbound command frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameDisposition {
    /// Retransmission of the last processed frame; absorbed silently
    Duplicate,
    /// Processed; respond unless the frame disabled the default response
    Processed {
        event: Option<SemanticEvent>,
        respond: bool,
    },
}

/// Per-endpoint dedup state plus the event table
#[derive(Debug)]
pub struct EventRelay {
    spec: Arc<EventRelaySpec>,
    last_tsn: Option<u8>,
}

impl EventRelay {
    pub fn new(spec: Arc<EventRelaySpec>) -> Self {
        Self {
            spec,
            last_tsn: None,
        }
    }

    /// Last transaction sequence number processed, if any
    pub fn last_tsn(&self) -> Option<u8> {
        self.last_tsn
    }

    /// Dedup the frame and map it to a semantic event
    ///
    /// Unmapped command ids are not an error: the frame is still
    /// acknowledged, it just produces no event.
    pub fn on_frame(&mut self, frame: &CommandFrame) -> FrameDisposition {
        if self.last_tsn == Some(frame.tsn) {
            tracing::debug!(tsn = frame.tsn, "ignoring duplicate frame");
            return FrameDisposition::Duplicate;
        }
        self.last_tsn = Some(frame.tsn);

        let event = self.map_event(frame);
        if event.is_none() {
            tracing::debug!(command = %frame.command, "no event mapped for command");
        }
        FrameDisposition::Processed {
            event,
            respond: !frame.disable_default_response,
        }
    }

    fn map_event(&self, frame: &CommandFrame) -> Option<SemanticEvent> {
        let first_arg = frame.args.first().and_then(|v| v.as_u64()).map(|v| v as u8);

        let entry = self.spec.events.iter().find(|e| {
            e.command == frame.command
                && match e.selector {
                    Some(selector) => first_arg == Some(selector),
                    None => true,
                }
        })?;

        // Selector-dispatched entries consume the first argument; the rest
        // bind positionally to the declared names.
        let skip = usize::from(entry.selector.is_some());
        let params = entry
            .arg_names
            .iter()
            .zip(frame.args.iter().skip(skip))
            .filter_map(|(name, value)| value.as_u64().map(|v| (*name, v as u8)))
            .collect();

        Some(SemanticEvent {
            endpoint: frame.endpoint,
            event: entry.event,
            params,
        })
    }
}
