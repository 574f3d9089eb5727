//! Error types for node group operations
//!
//! Validation errors are raised before any remote call and carry the
//! offending values. Remote failures keep the client error as source and add
//! cluster/node context.

use flow_client::ClientError;
use thiserror::Error;

/// Expected sign of a resize delta.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeltaSign {
    /// Scale up requests
    Positive,
    /// Target decrease requests
    Negative,
}

impl std::fmt::Display for DeltaSign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positive => f.write_str("positive"),
            Self::Negative => f.write_str("negative"),
        }
    }
}

/// Direction of a resize request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScaleDirection {
    /// Adding workers
    Increase,
    /// Lowering the pending target
    Decrease,
}

impl std::fmt::Display for ScaleDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Increase => f.write_str("increase"),
            Self::Decrease => f.write_str("decrease"),
        }
    }
}

/// Errors returned by node group, manager and provider operations
#[derive(Debug, Error)]
pub enum Error {
    /// Resize delta has the wrong sign
    #[error("delta must be {expected}, have: {delta}")]
    InvalidDelta {
        /// Requested delta
        delta: i32,
        /// Sign the operation requires
        expected: DeltaSign,
    },

    /// Scale up would exceed the maximum size
    #[error("size increase is too large. current: {current} desired: {desired} max: {max}")]
    SizeIncreaseTooLarge {
        /// Cached node count
        current: i32,
        /// Requested target
        desired: i32,
        /// Configured maximum
        max: i32,
    },

    /// Target decrease would go below the minimum size
    #[error("size decrease is too small. current: {current} desired: {desired} min: {min}")]
    SizeDecreaseTooSmall {
        /// Cached node count
        current: i32,
        /// Requested target
        desired: i32,
        /// Configured minimum
        min: i32,
    },

    /// The API acknowledged a different worker count than requested
    #[error("couldn't {direction} size to {target} (delta: {delta}). Current size is: {acknowledged}")]
    ResizeMismatch {
        /// Whether this was a scale up or a target decrease
        direction: ScaleDirection,
        /// Requested worker count
        target: i32,
        /// Requested delta
        delta: i32,
        /// Expected worker count reported by the API
        acknowledged: i32,
    },

    /// Provider id is not of the form `flow://<id>`
    #[error("invalid provider ID {provider_id:?}: {reason}")]
    InvalidProviderId {
        /// The raw provider id
        provider_id: String,
        /// What's wrong with it
        reason: String,
    },

    /// Deleting one node of a batch failed; earlier nodes stay deleted
    #[error("deleting node failed for cluster: {cluster_id} node pool: {node_group} node: {node:?}: {source}")]
    DeleteNode {
        /// Flow cluster id
        cluster_id: i64,
        /// Node group id
        node_group: i32,
        /// Kubernetes node name
        node: String,
        /// Parse or remote failure
        #[source]
        source: Box<Error>,
    },

    /// Updating the worker flavor failed
    #[error("updating worker flavor failed for cluster: {cluster_id}: {source}")]
    UpdateCluster {
        /// Flow cluster id
        cluster_id: i64,
        /// Underlying client error
        #[source]
        source: ClientError,
    },

    /// Listing cluster nodes failed
    #[error("couldn't list Kubernetes cluster nodes for cluster: {cluster_id}: {source}")]
    ListNodes {
        /// Flow cluster id
        cluster_id: i64,
        /// Underlying client error
        #[source]
        source: ClientError,
    },

    /// Node group has never been populated by a refresh
    #[error("node pool instance is not created")]
    NotCreated,

    /// No `min:max:name` spec configured for the node group
    #[error("no node group spec configured for {name:?}")]
    MissingNodeGroupSpec {
        /// Expected spec name
        name: String,
    },

    /// Remote call failed
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Provider configuration error
    #[error(transparent)]
    Config(#[from] flow_common::Error),
}
