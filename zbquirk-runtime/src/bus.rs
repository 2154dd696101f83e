//! Per-device command bus
//!
//! A producer/consumer queue between the normalization core and the
//! transport collaborator. Producers (the command router and the mode
//! watchdog) enqueue synchronously from the device's processing path; the
//! transport dequeues and transmits in FIFO order, and the device's real
//! acknowledgement (if any) arrives later as an ordinary inbound report.
//!
//! Entries are consumed exactly once. There is no retry and no timeout
//! here: an entry the device never confirms stays unresolved, and the mode
//! watchdog's symptom-based re-assertion is the fallback consistency
//! mechanism.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;

use zbquirk_model::{AttributeId, AttributeValue, ClusterId, EndpointId};
use zbquirk_registry::ClusterKey;

/// A single value write bound for the device
#[derive(Debug, Clone, PartialEq)]
pub struct CommandBusEntry {
    pub endpoint: EndpointId,
    /// Cluster implementation the write targets
    pub cluster: ClusterKey,
    /// Standardized attribute or command name
    pub attribute: &'static str,
    pub value: AttributeValue,
    pub expect_reply: bool,
    /// Best-effort correlation key for the vendor acknowledgement channel
    pub correlation: u64,
}

/// A request published on the command bus
#[derive(Debug, Clone, PartialEq)]
pub enum BusRequest {
    /// Write a value to the device
    Write(CommandBusEntry),
    /// Ask the transport to read attributes from a raw cluster
    ///
    /// Used instead of reaching into a sibling cluster object: whoever
    /// needs the read publishes it here and the result comes back as an
    /// ordinary inbound report.
    ReadAttributes {
        endpoint: EndpointId,
        cluster: ClusterId,
        attributes: Vec<AttributeId>,
    },
}

/// A write intent produced inside the pipeline, before the bus assigns
/// endpoint context and a correlation key
#[derive(Debug, Clone, PartialEq)]
pub struct PendingWrite {
    pub cluster: ClusterKey,
    pub attribute: &'static str,
    pub value: AttributeValue,
    pub expect_reply: bool,
}

/// Producer half of the per-device bus
#[derive(Debug)]
pub struct CommandBus {
    tx: mpsc::Sender<BusRequest>,
    next_correlation: AtomicU64,
}

impl CommandBus {
    /// Create a bus and the receiver handed to the transport
    pub fn channel() -> (CommandBus, BusReceiver) {
        let (tx, rx) = mpsc::channel();
        (
            CommandBus {
                tx,
                next_correlation: AtomicU64::new(1),
            },
            BusReceiver { rx },
        )
    }

    /// Enqueue a value write, returning its correlation key
    pub fn enqueue_write(&self, endpoint: EndpointId, write: PendingWrite) -> u64 {
        let correlation = self.next_correlation.fetch_add(1, Ordering::Relaxed);
        let entry = CommandBusEntry {
            endpoint,
            cluster: write.cluster,
            attribute: write.attribute,
            value: write.value,
            expect_reply: write.expect_reply,
            correlation,
        };
        tracing::debug!(?entry, "enqueueing command bus write");
        if self.tx.send(BusRequest::Write(entry)).is_err() {
            tracing::warn!("command bus receiver dropped; write discarded");
        }
        correlation
    }

    /// Enqueue an attribute read request
    pub fn enqueue_read(
        &self,
        endpoint: EndpointId,
        cluster: ClusterId,
        attributes: Vec<AttributeId>,
    ) {
        tracing::debug!(%endpoint, %cluster, ?attributes, "enqueueing read request");
        let request = BusRequest::ReadAttributes {
            endpoint,
            cluster,
            attributes,
        };
        if self.tx.send(request).is_err() {
            tracing::warn!("command bus receiver dropped; read request discarded");
        }
    }
}

/// Consumer half of the per-device bus, owned by the transport
#[derive(Debug)]
pub struct BusReceiver {
    rx: mpsc::Receiver<BusRequest>,
}

impl BusReceiver {
    /// Block until the next request (or the producer side is gone)
    pub fn recv(&self) -> Option<BusRequest> {
        self.rx.recv().ok()
    }

    /// Drain everything currently queued, in FIFO order
    pub fn drain(&self) -> Vec<BusRequest> {
        self.rx.try_iter().collect()
    }
}
