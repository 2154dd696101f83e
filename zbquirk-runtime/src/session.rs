//! Per-device session: the instantiated replacement topology at runtime
//!
//! One session per connected device, processing that device's frames
//! strictly in order. The session owns every cluster instance, the
//! command bus producer, and the hub update sender; nothing in here is
//! shared with any other device's session.
//!
//! # Frame flow
//!
//! ```text
//! handle_report ──▶ owning instance ──▶ transform ──▶ hub update
//!                          │
//!                          └─▶ corrective / companion writes ──▶ bus
//! handle_command ──▶ dedup / event map ──▶ semantic event ──▶ hub
//!                          │
//!                          └─▶ data-point redirect ──▶ sibling pipeline
//! ```

use std::collections::BTreeMap;
use std::sync::mpsc;
use std::sync::Arc;

use zbquirk_model::{
    consts::cluster, AttributeId, AttributeReport, AttributeValue, ClusterId, CommandFrame,
    CommandId, DefaultResponse, DeviceTypeId, EndpointId, FrameStatus, ProfileId, Topology,
    VendorIdentity,
};
use zbquirk_registry::{rewrite, ClusterRef, QuirkDefinition};

use crate::bus::{BusReceiver, CommandBus, CommandBusEntry, PendingWrite};
use crate::catalog::ClusterCatalog;
use crate::clusters::{BindPolicy, ClusterImpl, ClusterInstance};
use crate::datapoint::{Redirect, RoutedValue};
use crate::error::{BuildError, Result};
use crate::events::{FrameDisposition, SemanticEvent};
use crate::reporting::ReportingRecord;
use crate::router::{self, Acknowledgement};
use crate::update::{AttributeUpdate, HubUpdate};

/// Attributes read during the vendor wake-up handshake
const VENDOR_HANDSHAKE_ATTRIBUTES: [AttributeId; 6] = [
    AttributeId(0x0004),
    AttributeId(0x0000),
    AttributeId(0x0001),
    AttributeId(0x0005),
    AttributeId(0x0007),
    AttributeId(0xFFFE),
];

/// One endpoint of the instantiated topology
#[derive(Debug)]
pub struct EndpointRuntime {
    pub profile_id: ProfileId,
    pub device_type: DeviceTypeId,
    pub input_clusters: Vec<ClusterId>,
    pub output_clusters: Vec<ClusterId>,
    clusters: BTreeMap<ClusterId, ClusterInstance>,
}

impl EndpointRuntime {
    pub fn instance(&self, cluster: ClusterId) -> Option<&ClusterInstance> {
        self.clusters.get(&cluster)
    }

    fn lists_cluster(&self, cluster: ClusterId) -> bool {
        self.input_clusters.contains(&cluster) || self.output_clusters.contains(&cluster)
    }
}

/// Everything one inbound frame asked the session to do
#[derive(Debug, Default)]
struct Effects {
    response: Option<FrameStatus>,
    event: Option<SemanticEvent>,
    writes: Vec<(EndpointId, PendingWrite)>,
    redirects: Vec<Redirect>,
    update: Option<AttributeUpdate>,
}

/// Runtime state for one connected, quirk-normalized device
#[derive(Debug)]
pub struct DeviceSession {
    identity: VendorIdentity,
    quirk: Arc<QuirkDefinition>,
    endpoints: BTreeMap<EndpointId, EndpointRuntime>,
    bus: CommandBus,
    hub_tx: mpsc::Sender<HubUpdate>,
}

impl DeviceSession {
    /// Instantiate the replacement topology for one device
    ///
    /// Rewrites the observed topology through the quirk, resolves every
    /// named cluster implementation against the catalog, and reports the
    /// constant attributes once. Returns the bus receiver the transport
    /// consumes. Fails only on configuration errors.
    pub fn new(
        identity: VendorIdentity,
        quirk: Arc<QuirkDefinition>,
        observed: &Topology,
        catalog: &ClusterCatalog,
        hub_tx: mpsc::Sender<HubUpdate>,
    ) -> Result<(Self, BusReceiver)> {
        let rewritten = rewrite(observed, &quirk);
        let (bus, bus_rx) = CommandBus::channel();

        let mut endpoints = BTreeMap::new();
        for (endpoint_id, endpoint) in &rewritten {
            let mut runtime = EndpointRuntime {
                profile_id: endpoint.profile_id,
                device_type: endpoint.device_type,
                input_clusters: Vec::new(),
                output_clusters: Vec::new(),
                clusters: BTreeMap::new(),
            };

            for (refs, ids) in [
                (&endpoint.input_clusters, &mut runtime.input_clusters),
                (&endpoint.output_clusters, &mut runtime.output_clusters),
            ] {
                for cluster_ref in refs {
                    match cluster_ref {
                        ClusterRef::Raw(id) => ids.push(*id),
                        ClusterRef::Custom(key) => {
                            let template = catalog.get(key.0).ok_or(
                                BuildError::UnknownClusterImpl {
                                    quirk: quirk.name,
                                    key: *key,
                                },
                            )?;
                            ids.push(template.cluster_id);
                            // One instance per (endpoint, cluster id), even
                            // when referenced from both directions.
                            runtime
                                .clusters
                                .entry(template.cluster_id)
                                .or_insert_with(|| template.instantiate(*endpoint_id));
                        }
                    }
                }
            }
            endpoints.insert(*endpoint_id, runtime);
        }

        for trigger in &quirk.triggers {
            if !endpoints.contains_key(&trigger.endpoint) {
                return Err(BuildError::MissingEndpoint {
                    quirk: quirk.name,
                    endpoint: trigger.endpoint,
                });
            }
        }

        let session = Self {
            identity,
            quirk,
            endpoints,
            bus,
            hub_tx,
        };
        session.emit_constants();
        Ok((session, bus_rx))
    }

    pub fn identity(&self) -> &VendorIdentity {
        &self.identity
    }

    pub fn quirk(&self) -> &Arc<QuirkDefinition> {
        &self.quirk
    }

    pub fn endpoint(&self, endpoint: EndpointId) -> Option<&EndpointRuntime> {
        self.endpoints.get(&endpoint)
    }

    pub fn endpoint_ids(&self) -> impl Iterator<Item = EndpointId> + '_ {
        self.endpoints.keys().copied()
    }

    /// Process an inbound attribute report
    ///
    /// Reports for raw clusters forward unchanged; reports for quirk
    /// clusters run the transform pipeline. Errors never escape a frame.
    pub fn handle_report(&mut self, report: &AttributeReport) {
        let Some(endpoint) = self.endpoints.get_mut(&report.endpoint) else {
            tracing::debug!(endpoint = %report.endpoint, "report for unknown endpoint");
            return;
        };

        let lists_cluster = endpoint.lists_cluster(report.cluster);
        let effects = match endpoint.clusters.get_mut(&report.cluster) {
            Some(instance) => {
                apply_report(instance, report.attribute, report.value)
            }
            None if lists_cluster => {
                // Raw cluster: standardized as-is.
                let mut effects = Effects::default();
                effects.update = Some(AttributeUpdate {
                    endpoint: report.endpoint,
                    cluster: report.cluster,
                    attribute: report.attribute,
                    name: None,
                    value: report.value,
                });
                effects
            }
            None => {
                tracing::debug!(
                    endpoint = %report.endpoint,
                    cluster = %report.cluster,
                    "report for cluster outside the rewritten topology"
                );
                return;
            }
        };

        self.settle(effects);
    }

    /// Process an inbound cluster command
    ///
    /// Returns the default response owed to the device, if any. Duplicate
    /// frames produce nothing at all.
    pub fn handle_command(&mut self, frame: &CommandFrame) -> Option<DefaultResponse> {
        let Some(endpoint) = self.endpoints.get_mut(&frame.endpoint) else {
            tracing::debug!(endpoint = %frame.endpoint, "command for unknown endpoint");
            return None;
        };
        let Some(instance) = endpoint.clusters.get_mut(&frame.cluster) else {
            tracing::debug!(
                endpoint = %frame.endpoint,
                cluster = %frame.cluster,
                "command for cluster outside the quirk; left to the transport"
            );
            return None;
        };

        let effects = dispatch_command(instance, frame);
        let response = effects.response.map(|status| DefaultResponse {
            endpoint: frame.endpoint,
            cluster: frame.cluster,
            command: frame.command,
            status,
            tsn: frame.tsn,
        });
        self.settle(effects);
        response
    }

    /// Route a hub-issued standardized command to the device
    ///
    /// Returns immediately with a locally-synthesized acknowledgement; the
    /// real acknowledgement folds back through the inbound path.
    pub fn route_command(
        &self,
        endpoint: EndpointId,
        cluster: ClusterId,
        command: CommandId,
    ) -> Acknowledgement {
        match self
            .endpoints
            .get(&endpoint)
            .and_then(|ep| ep.instance(cluster))
        {
            Some(instance) => router::route(instance, command, &self.bus),
            None => {
                tracing::warn!(%endpoint, %cluster, %command, "command for unknown cluster");
                Acknowledgement::Unsupported { command }
            }
        }
    }

    /// Queue a hub-issued attribute write, returning its correlation key
    pub fn write_attribute(
        &self,
        endpoint: EndpointId,
        cluster: ClusterId,
        attribute: &str,
        value: AttributeValue,
    ) -> Option<u64> {
        let instance = self.endpoints.get(&endpoint)?.instance(cluster)?;
        let def = instance.attributes.iter().find(|a| a.name == attribute)?;
        Some(self.bus.enqueue_write(
            endpoint,
            PendingWrite {
                cluster: instance.key,
                attribute: def.name,
                value,
                expect_reply: true,
            },
        ))
    }

    /// Map a bus entry back to the vendor data point that carries it
    ///
    /// The data-point table is bidirectional; the transport calls this
    /// while encoding a dequeued write for a bridge-style device.
    pub fn resolve_data_point(&self, entry: &CommandBusEntry) -> Option<u8> {
        self.endpoints.values().find_map(|ep| {
            ep.clusters.values().find_map(|instance| match &instance.imp {
                ClusterImpl::DataPointRelay(spec) => {
                    spec.data_point_for(entry.cluster, entry.attribute)
                }
                _ => None,
            })
        })
    }

    /// Apply the per-cluster reporting policy to a configuration request
    pub fn filter_reporting_request(
        &self,
        endpoint: EndpointId,
        cluster: ClusterId,
        records: Vec<ReportingRecord>,
    ) -> Vec<ReportingRecord> {
        match self
            .endpoints
            .get(&endpoint)
            .and_then(|ep| ep.instance(cluster))
        {
            Some(instance) => instance.reporting.filter(records),
            None => records,
        }
    }

    /// Run every cluster's bind override at join time
    ///
    /// Standard clusters are bound by the transport; this only performs
    /// the vendor wake-up handshakes and the initial mode assertion.
    pub fn bind_all(&self) {
        for endpoint in self.endpoints.values() {
            for instance in endpoint.clusters.values() {
                match instance.bind {
                    BindPolicy::Standard => {}
                    BindPolicy::Suppress => {
                        tracing::debug!(cluster = %instance.key, "bind suppressed");
                    }
                    BindPolicy::VendorHandshake { anchor } => {
                        if instance.endpoint != anchor {
                            continue;
                        }
                        tracing::debug!(cluster = %instance.key, "casting vendor wake-up");
                        self.bus.enqueue_read(
                            anchor,
                            cluster::BASIC,
                            VENDOR_HANDSHAKE_ATTRIBUTES.to_vec(),
                        );
                        if let ClusterImpl::ModeWatchdog(dog) = &instance.imp {
                            self.bus
                                .enqueue_write(instance.endpoint, dog.corrective_write());
                        }
                    }
                }
            }
        }
    }

    /// Report constant attributes to the hub, once per session
    fn emit_constants(&self) {
        for endpoint in self.endpoints.values() {
            for instance in endpoint.clusters.values() {
                let ClusterImpl::Calibration(spec) = &instance.imp else {
                    continue;
                };
                for (attribute, value) in &spec.constants {
                    self.emit(AttributeUpdate {
                        endpoint: instance.endpoint,
                        cluster: instance.cluster_id,
                        attribute: *attribute,
                        name: instance.attribute_name(*attribute),
                        value: *value,
                    });
                }
            }
        }
    }

    /// Apply the side effects collected from one frame
    fn settle(&mut self, effects: Effects) {
        for (endpoint, write) in effects.writes {
            self.bus.enqueue_write(endpoint, write);
        }
        for redirect in effects.redirects {
            self.apply_redirect(redirect);
        }
        if let Some(update) = effects.update {
            self.emit(update);
        }
        if let Some(event) = effects.event {
            tracing::debug!(event = event.event, endpoint = %event.endpoint, "semantic event");
            if self.hub_tx.send(HubUpdate::Event(event)).is_err() {
                tracing::warn!("hub update receiver dropped; event discarded");
            }
        }
    }

    /// Deliver a redirected data-point value to the cluster that owns it
    fn apply_redirect(&mut self, redirect: Redirect) {
        let target = self.endpoints.values_mut().find_map(|ep| {
            ep.clusters
                .values_mut()
                .find(|instance| instance.key == redirect.cluster)
        });
        let Some(instance) = target else {
            tracing::warn!(cluster = %redirect.cluster, "data point targets unknown cluster");
            return;
        };
        let Some(attribute) = instance.attribute_id(redirect.attribute) else {
            tracing::warn!(
                cluster = %redirect.cluster,
                attribute = redirect.attribute,
                "data point targets unknown attribute"
            );
            return;
        };

        let effects = apply_report(instance, attribute, redirect.value);
        self.settle(effects);
    }

    fn emit(&self, update: AttributeUpdate) {
        tracing::debug!(?update, "standardized attribute update");
        if self.hub_tx.send(HubUpdate::Attribute(update)).is_err() {
            tracing::warn!("hub update receiver dropped; update discarded");
        }
    }
}

/// Run one attribute through a cluster instance's report pipeline
fn apply_report(
    instance: &mut ClusterInstance,
    attribute: AttributeId,
    value: AttributeValue,
) -> Effects {
    let mut effects = Effects::default();
    let mut emitted = Some(value);

    match &mut instance.imp {
        ClusterImpl::Calibration(spec) => {
            if let Some(transform) = spec.transform_for(attribute) {
                emitted = Some(transform.apply(value));
            }
        }
        ClusterImpl::ReportingFilter | ClusterImpl::EventRelay(_) => {}
        ClusterImpl::DataPointRelay(spec) => {
            for report_write in &spec.report_writes {
                if report_write.attribute != attribute {
                    continue;
                }
                let resolved = match report_write.write.value {
                    RoutedValue::Fixed(v) => v,
                    RoutedValue::CommandBool => AttributeValue::Bool(value.as_bool()),
                };
                effects.writes.push((
                    instance.endpoint,
                    PendingWrite {
                        cluster: report_write.write.cluster,
                        attribute: report_write.write.attribute,
                        value: resolved,
                        expect_reply: true,
                    },
                ));
            }
        }
        ClusterImpl::ModeWatchdog(dog) => {
            let effect = dog.on_report(attribute, value);
            if let Some(write) = effect.corrective {
                effects.writes.push((instance.endpoint, write));
            }
            if effect.consumed {
                emitted = None;
            }
        }
    }

    if let Some(value) = emitted {
        effects.update = Some(AttributeUpdate {
            endpoint: instance.endpoint,
            cluster: instance.cluster_id,
            attribute,
            name: instance.attribute_name(attribute),
            value,
        });
    }
    effects
}

/// Run one command frame through a cluster instance
fn dispatch_command(instance: &mut ClusterInstance, frame: &CommandFrame) -> Effects {
    let mut effects = Effects::default();
    let respond = |effects: &mut Effects| {
        if !frame.disable_default_response {
            effects.response = Some(FrameStatus::Success);
        }
    };

    match &mut instance.imp {
        ClusterImpl::DataPointRelay(spec) => {
            effects.redirects.extend(spec.decode_frame(frame));
            respond(&mut effects);
        }
        ClusterImpl::ModeWatchdog(dog) => {
            let effect = dog.on_command(frame);
            if effect.respond {
                effects.response = Some(FrameStatus::Success);
            }
            effects.event = effect.event;
            if let Some(write) = effect.corrective {
                effects.writes.push((instance.endpoint, write));
            }
        }
        ClusterImpl::EventRelay(relay) => match relay.on_frame(frame) {
            FrameDisposition::Duplicate => {}
            FrameDisposition::Processed { event, respond } => {
                effects.event = event;
                if respond {
                    effects.response = Some(FrameStatus::Success);
                }
            }
        },
        ClusterImpl::Calibration(_) | ClusterImpl::ReportingFilter => {
            // Unmapped command id: acknowledged, nothing else happens.
            tracing::debug!(
                cluster = %instance.key,
                command = %frame.command,
                "command for a cluster with no command handler"
            );
            respond(&mut effects);
        }
    }
    effects
}
