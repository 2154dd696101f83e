use thiserror::Error;
use zbquirk_model::{TopologyError, VendorIdentity};

/// Errors raised while loading or matching quirk definitions
///
/// All of these are configuration errors in the sense of the error
/// taxonomy: they surface to the operator at load or join time and the
/// affected quirk or device is not activated.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A second quirk was registered with an identity and signature already
    /// claimed by an earlier one. The first registration stays active.
    #[error("quirk '{second}' duplicates the identity/signature of '{first}' for {identity}")]
    DuplicateSignature {
        first: &'static str,
        second: &'static str,
        identity: VendorIdentity,
    },

    /// Two distinct registered quirks both match one observed device
    #[error("quirks '{first}' and '{second}' both match device {identity}")]
    AmbiguousMatch {
        first: &'static str,
        second: &'static str,
        identity: VendorIdentity,
    },

    /// A signature or replacement violated a topology invariant
    #[error("invalid topology in quirk '{quirk}': {source}")]
    InvalidTopology {
        quirk: &'static str,
        #[source]
        source: TopologyError,
    },
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;
