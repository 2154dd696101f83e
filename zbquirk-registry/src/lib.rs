//! Quirk registry, signature matching, and topology rewriting
//!
//! A *quirk* is a registered override describing how to reinterpret one
//! vendor device: which advertised topology it applies to, what the
//! standardized replacement topology looks like, and which automation
//! triggers the device offers.
//!
//! # Architecture
//!
//! ```text
//! startup:  QuirkDefinition ──register──▶ QuirkRegistry
//! join:     (Topology, VendorIdentity) ──match──▶ Option<Arc<QuirkDefinition>>
//!                                          │
//!                                       rewrite
//!                                          ▼
//!                              RewrittenTopology (raw ids + cluster keys)
//! ```
//!
//! Matching is an exact-set comparison (never superset) over the endpoints
//! the signature names; rewriting substitutes the replacement template's
//! cluster sets wholesale and drops endpoints the template does not
//! mention. Both are pure: instantiation of the named cluster
//! implementations happens later, in the runtime crate.

pub mod error;
pub mod matcher;
pub mod quirk;
pub mod registry;
pub mod rewriter;

pub use error::{RegistryError, Result};
pub use quirk::{
    replacement_endpoint, AutomationTrigger, ClusterKey, ClusterRef, QuirkDefinition,
    ReplacementEndpoint,
};
pub use registry::QuirkRegistry;
pub use rewriter::{rewrite, RewrittenEndpoint, RewrittenTopology};
