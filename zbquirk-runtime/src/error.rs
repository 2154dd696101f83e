use thiserror::Error;
use zbquirk_model::EndpointId;
use zbquirk_registry::ClusterKey;

/// Fatal configuration errors raised while instantiating a session
///
/// Per-frame conditions (unsupported commands, unmappable data points,
/// duplicate frames) are never errors; they are explicit values or are
/// absorbed by the pipeline.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A replacement template referenced a key the catalog does not hold
    #[error("quirk '{quirk}' references unregistered cluster implementation '{key}'")]
    UnknownClusterImpl { quirk: &'static str, key: ClusterKey },

    /// Two templates were registered under the same key
    #[error("cluster implementation key '{key}' registered twice")]
    DuplicateClusterKey { key: ClusterKey },

    /// A trigger references an endpoint the replacement does not produce
    #[error("quirk '{quirk}' trigger targets endpoint {endpoint} missing from the replacement")]
    MissingEndpoint {
        quirk: &'static str,
        endpoint: EndpointId,
    },
}

/// Result type for session construction
pub type Result<T> = std::result::Result<T, BuildError>;
