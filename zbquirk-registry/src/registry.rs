//! The quirk registry: explicit, populated at startup, immutable after
//!
//! The registry is an owned collection handed to whoever performs device
//! joins. There is no global state and no auto-registration; the devices
//! crate registers its definitions into a registry the caller constructs.

use std::sync::Arc;

use zbquirk_model::{Topology, VendorIdentity};

use crate::error::{RegistryError, Result};
use crate::matcher;
use crate::quirk::QuirkDefinition;

/// Collection of registered quirk definitions
#[derive(Debug, Default)]
pub struct QuirkRegistry {
    quirks: Vec<Arc<QuirkDefinition>>,
}

impl QuirkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition, rejecting identity/signature duplicates
    ///
    /// Two quirks may share identities as long as their signatures differ
    /// (remote-mode vs. switch-mode firmware of the same model). A quirk
    /// whose identity *and* signature are already claimed is refused; the
    /// first registration stays active.
    pub fn register(&mut self, quirk: QuirkDefinition) -> Result<()> {
        for existing in &self.quirks {
            for identity in &quirk.identities {
                if existing.applies_to(identity) && existing.signature == quirk.signature {
                    return Err(RegistryError::DuplicateSignature {
                        first: existing.name,
                        second: quirk.name,
                        identity: identity.clone(),
                    });
                }
            }
        }

        tracing::debug!(quirk = quirk.name, "registered quirk definition");
        self.quirks.push(Arc::new(quirk));
        Ok(())
    }

    /// Find the quirk applying to an observed device
    ///
    /// Returns `Ok(None)` when nothing matches (the device is passed
    /// through un-normalized). Two matching quirks are a configuration
    /// error, reported rather than silently resolved.
    pub fn match_device(
        &self,
        topology: &Topology,
        identity: &VendorIdentity,
    ) -> Result<Option<Arc<QuirkDefinition>>> {
        let mut found: Option<&Arc<QuirkDefinition>> = None;

        for quirk in &self.quirks {
            if !matcher::matches(quirk, topology, identity) {
                continue;
            }
            if let Some(first) = found {
                return Err(RegistryError::AmbiguousMatch {
                    first: first.name,
                    second: quirk.name,
                    identity: identity.clone(),
                });
            }
            found = Some(quirk);
        }

        if let Some(quirk) = found {
            tracing::debug!(quirk = quirk.name, %identity, "matched quirk");
        } else {
            tracing::debug!(%identity, "no quirk matches device");
        }
        Ok(found.cloned())
    }

    pub fn len(&self) -> usize {
        self.quirks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quirks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<QuirkDefinition>> {
        self.quirks.iter()
    }
}
