//! Blocking iteration over engine updates

use std::sync::mpsc;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::engine::EngineUpdate;

/// Blocking iterator over standardized updates from all attached devices
///
/// Ends when the engine (and with it the update channel) is dropped.
///
/// ```rust,ignore
/// for update in engine.updates() {
///     match update.update {
///         HubUpdate::Attribute(attr) => apply_state(update.device, attr),
///         HubUpdate::Event(event) => fire_trigger(update.device, event),
///     }
/// }
/// ```
pub struct UpdateIterator {
    rx: Arc<Mutex<mpsc::Receiver<EngineUpdate>>>,
}

impl UpdateIterator {
    pub(crate) fn new(rx: Arc<Mutex<mpsc::Receiver<EngineUpdate>>>) -> Self {
        Self { rx }
    }

    /// Non-blocking poll, for callers with their own scheduling
    pub fn try_next(&self) -> Option<EngineUpdate> {
        self.rx.lock().try_recv().ok()
    }
}

impl Iterator for UpdateIterator {
    type Item = EngineUpdate;

    fn next(&mut self) -> Option<EngineUpdate> {
        self.rx.lock().recv().ok()
    }
}
