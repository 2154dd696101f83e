//! The engine facade: registry + catalog + per-device sessions
//!
//! One engine per hub process. Attaching a device runs the load-time path
//! (match, rewrite, instantiate) and spawns a dedicated worker thread for
//! the device's frame stream. All engine methods are synchronous.

use std::sync::mpsc;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;

use zbquirk_model::{
    AttributeValue, ClusterId, CommandId, DeviceId, EndpointId, InboundFrame, Topology,
    VendorIdentity,
};
use zbquirk_registry::QuirkRegistry;
use zbquirk_runtime::{
    Acknowledgement, BusReceiver, ClusterCatalog, DeviceSession, HubUpdate, ReportingRecord,
};

use crate::error::{EngineError, Result};
use crate::iter::UpdateIterator;
use crate::worker::spawn_device_worker;

/// A standardized update tagged with the device it came from
#[derive(Debug, Clone, PartialEq)]
pub struct EngineUpdate {
    pub device: DeviceId,
    pub update: HubUpdate,
}

/// Transport-facing handles returned by [`QuirkEngine::attach`]
#[derive(Debug)]
pub struct AttachedDevice {
    /// Feed the device's inbound frames here, strictly in wire order
    pub frames: mpsc::Sender<InboundFrame>,
    /// Dequeue device-bound writes and read requests, FIFO
    pub bus: BusReceiver,
    /// Default responses owed to the device for processed commands
    pub responses: mpsc::Receiver<zbquirk_model::DefaultResponse>,
}

struct DeviceEntry {
    session: Arc<Mutex<DeviceSession>>,
    /// Keeps the worker's frame channel open until detach
    _frame_tx: mpsc::Sender<InboundFrame>,
    _worker: std::thread::JoinHandle<()>,
}

/// Owns the quirk registry, the cluster catalog, and every live session
pub struct QuirkEngine {
    registry: QuirkRegistry,
    catalog: ClusterCatalog,
    devices: DashMap<DeviceId, DeviceEntry>,
    update_tx: mpsc::Sender<EngineUpdate>,
    update_rx: Arc<Mutex<mpsc::Receiver<EngineUpdate>>>,
}

impl QuirkEngine {
    /// Build an engine around an already-populated registry and catalog
    pub fn new(registry: QuirkRegistry, catalog: ClusterCatalog) -> Self {
        let (update_tx, update_rx) = mpsc::channel();
        Self {
            registry,
            catalog,
            devices: DashMap::new(),
            update_tx,
            update_rx: Arc::new(Mutex::new(update_rx)),
        }
    }

    /// Build an engine preloaded with the built-in device family
    pub fn with_builtin_devices() -> Result<Self> {
        let mut registry = QuirkRegistry::new();
        let mut catalog = ClusterCatalog::new();
        zbquirk_devices::register_all(&mut registry, &mut catalog)?;
        Ok(Self::new(registry, catalog))
    }

    /// Normalize a joining device and spawn its worker
    ///
    /// Matches the advertised topology, instantiates the replacement, runs
    /// the bind overrides, and returns the transport-facing handles.
    pub fn attach(
        &self,
        device: DeviceId,
        identity: VendorIdentity,
        topology: &Topology,
    ) -> Result<AttachedDevice> {
        if self.devices.contains_key(&device) {
            return Err(EngineError::DeviceAlreadyAttached(device));
        }

        let quirk = self
            .registry
            .match_device(topology, &identity)?
            .ok_or_else(|| EngineError::NoMatchingQuirk {
                identity: identity.clone(),
            })?;

        tracing::info!(%device, quirk = quirk.name, "attaching device");

        let (hub_tx, hub_rx) = mpsc::channel();
        let (session, bus_rx) =
            DeviceSession::new(identity, quirk, topology, &self.catalog, hub_tx)?;
        session.bind_all();

        let session = Arc::new(Mutex::new(session));
        let (frame_tx, frame_rx) = mpsc::channel();
        let (response_tx, response_rx) = mpsc::channel();

        let worker = spawn_device_worker(
            device.clone(),
            Arc::clone(&session),
            frame_rx,
            hub_rx,
            self.update_tx.clone(),
            response_tx,
        );

        self.devices.insert(
            device,
            DeviceEntry {
                session,
                _frame_tx: frame_tx.clone(),
                _worker: worker,
            },
        );

        Ok(AttachedDevice {
            frames: frame_tx,
            bus: bus_rx,
            responses: response_rx,
        })
    }

    /// Drop a device's session; its worker drains and exits
    pub fn detach(&self, device: &DeviceId) -> Result<()> {
        match self.devices.remove(device) {
            Some(_) => {
                tracing::info!(%device, "detached device");
                Ok(())
            }
            None => Err(EngineError::DeviceNotFound(device.clone())),
        }
    }

    pub fn is_attached(&self, device: &DeviceId) -> bool {
        self.devices.contains_key(device)
    }

    pub fn attached_count(&self) -> usize {
        self.devices.len()
    }

    /// Route a hub-issued command to a device, returning the synthesized
    /// acknowledgement
    pub fn route_command(
        &self,
        device: &DeviceId,
        endpoint: EndpointId,
        cluster: ClusterId,
        command: CommandId,
    ) -> Result<Acknowledgement> {
        let entry = self
            .devices
            .get(device)
            .ok_or_else(|| EngineError::DeviceNotFound(device.clone()))?;
        let ack = entry.session.lock().route_command(endpoint, cluster, command);
        Ok(ack)
    }

    /// Queue a hub-issued attribute write on a device's bus
    pub fn write_attribute(
        &self,
        device: &DeviceId,
        endpoint: EndpointId,
        cluster: ClusterId,
        attribute: &str,
        value: AttributeValue,
    ) -> Result<Option<u64>> {
        let entry = self
            .devices
            .get(device)
            .ok_or_else(|| EngineError::DeviceNotFound(device.clone()))?;
        let result = entry
            .session
            .lock()
            .write_attribute(endpoint, cluster, attribute, value);
        Ok(result)
    }

    /// Apply a device's reporting policies to a configuration request
    pub fn filter_reporting_request(
        &self,
        device: &DeviceId,
        endpoint: EndpointId,
        cluster: ClusterId,
        records: Vec<ReportingRecord>,
    ) -> Result<Vec<ReportingRecord>> {
        let entry = self
            .devices
            .get(device)
            .ok_or_else(|| EngineError::DeviceNotFound(device.clone()))?;
        let filtered = entry
            .session
            .lock()
            .filter_reporting_request(endpoint, cluster, records);
        Ok(filtered)
    }

    /// Blocking iterator over standardized updates from every device
    pub fn updates(&self) -> UpdateIterator {
        UpdateIterator::new(Arc::clone(&self.update_rx))
    }
}

impl std::fmt::Debug for QuirkEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuirkEngine")
            .field("quirks", &self.registry.len())
            .field("devices", &self.devices.len())
            .finish()
    }
}
