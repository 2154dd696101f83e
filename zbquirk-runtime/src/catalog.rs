//! Cluster implementation catalog
//!
//! An explicit, owned mapping from cluster key to template, populated at
//! startup alongside the quirk registry and handed to session construction.
//! No global state, no auto-registration.

use std::collections::HashMap;

use crate::clusters::ClusterTemplate;
use crate::error::{BuildError, Result};

#[derive(Debug, Default)]
pub struct ClusterCatalog {
    templates: HashMap<&'static str, ClusterTemplate>,
}

impl ClusterCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template; re-registering a key is a configuration error
    pub fn register(&mut self, template: ClusterTemplate) -> Result<()> {
        let key = template.key;
        if self.templates.contains_key(key.0) {
            return Err(BuildError::DuplicateClusterKey { key });
        }
        tracing::debug!(%key, cluster = %template.cluster_id, "registered cluster template");
        self.templates.insert(key.0, template);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&ClusterTemplate> {
        self.templates.get(key)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
