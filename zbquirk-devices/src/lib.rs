//! Declarative quirk definitions for the supported device family
//!
//! Everything in this crate is data: advertised signatures transcribed
//! from real devices, the replacement topologies the hub should see, the
//! calibration parameters, data-point tables, and automation triggers.
//! The behavior lives in `zbquirk-runtime`; these tables only select and
//! parameterize it.
//!
//! Call [`register_all`] with a registry and catalog at startup:
//!
//! ```rust,ignore
//! let mut registry = QuirkRegistry::new();
//! let mut catalog = ClusterCatalog::new();
//! zbquirk_devices::register_all(&mut registry, &mut catalog)?;
//! ```

use thiserror::Error;

use zbquirk_model::TopologyError;
use zbquirk_registry::{QuirkRegistry, RegistryError};
use zbquirk_runtime::{BuildError, ClusterCatalog, ClusterTemplate};

pub mod door_contact;
pub mod irrigation_timer;
pub mod led_controller_cct;
pub mod motion_sensor;
pub mod rotary_remote;
pub mod scene_controller;
pub mod temp_humidity;

/// Errors raised while loading the definition tables
#[derive(Debug, Error)]
pub enum DevicesError {
    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Catalog(#[from] BuildError),
}

/// Result type for definition loading
pub type Result<T> = std::result::Result<T, DevicesError>;

/// Register every quirk definition and cluster template in this crate
pub fn register_all(registry: &mut QuirkRegistry, catalog: &mut ClusterCatalog) -> Result<()> {
    registry.register(scene_controller::quirk()?)?;
    registry.register(irrigation_timer::quirk()?)?;
    registry.register(motion_sensor::quirk()?)?;
    registry.register(door_contact::quirk()?)?;
    registry.register(temp_humidity::quirk()?)?;
    registry.register(led_controller_cct::quirk()?)?;
    registry.register(rotary_remote::quirk()?)?;

    for template in templates() {
        catalog.register(template)?;
    }
    Ok(())
}

/// Every cluster template the definitions reference
pub fn templates() -> Vec<ClusterTemplate> {
    let mut templates = Vec::new();
    templates.extend(scene_controller::templates());
    templates.extend(irrigation_timer::templates());
    templates.extend(motion_sensor::templates());
    templates.extend(door_contact::templates());
    templates.extend(led_controller_cct::templates());
    templates.extend(rotary_remote::templates());
    templates
}
