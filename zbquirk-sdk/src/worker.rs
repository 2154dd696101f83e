//! Per-device frame worker
//!
//! One thread per attached device, consuming that device's frame channel
//! in order and forwarding whatever the session emits. The thread exits
//! when the last frame sender is dropped (detach or engine shutdown).

use std::sync::mpsc;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;

use zbquirk_model::{DefaultResponse, DeviceId, InboundFrame};
use zbquirk_runtime::{DeviceSession, HubUpdate};

use crate::engine::EngineUpdate;

pub(crate) fn spawn_device_worker(
    device: DeviceId,
    session: Arc<Mutex<DeviceSession>>,
    frame_rx: mpsc::Receiver<InboundFrame>,
    hub_rx: mpsc::Receiver<HubUpdate>,
    update_tx: mpsc::Sender<EngineUpdate>,
    response_tx: mpsc::Sender<DefaultResponse>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        tracing::debug!(%device, "device worker started");

        // Constants reported during session build are already queued.
        forward_updates(&device, &hub_rx, &update_tx);

        for frame in frame_rx.iter() {
            let response = {
                let mut session = session.lock();
                match &frame {
                    InboundFrame::Report(report) => {
                        session.handle_report(report);
                        None
                    }
                    InboundFrame::Command(command) => session.handle_command(command),
                }
            };

            if let Some(response) = response {
                if response_tx.send(response).is_err() {
                    tracing::debug!(%device, "response receiver dropped");
                }
            }
            forward_updates(&device, &hub_rx, &update_tx);
        }

        tracing::debug!(%device, "device worker stopped");
    })
}

/// Wrap pending session updates with the device id and pass them on
fn forward_updates(
    device: &DeviceId,
    hub_rx: &mpsc::Receiver<HubUpdate>,
    update_tx: &mpsc::Sender<EngineUpdate>,
) {
    for update in hub_rx.try_iter() {
        let tagged = EngineUpdate {
            device: device.clone(),
            update,
        };
        if update_tx.send(tagged).is_err() {
            tracing::debug!(%device, "engine update receiver dropped");
            return;
        }
    }
}
