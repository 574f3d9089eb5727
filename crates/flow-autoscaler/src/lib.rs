//! Cluster autoscaler provider for Flow managed Kubernetes
//!
//! Exposes the single worker pool of a Flow cluster as an autoscaler node group:
//! - Sizing with min/max bound checks and acknowledged-count verification
//! - Node deletion by provider id (`flow://<id>`)
//! - Translation of Flow node states into autoscaler instance states
//! - Periodic refresh of the cached node snapshot

#![cfg_attr(not(test), deny(missing_docs))]

pub mod client;
pub mod cloud_provider;
pub mod error;
pub mod manager;
pub mod node_group;
pub mod provider_id;
pub mod status;

pub use client::{FlowNodeGroupClient, NodeGroupClient};
pub use cloud_provider::FlowCloudProvider;
pub use error::{DeltaSign, Error, ScaleDirection};
pub use manager::Manager;
pub use node_group::NodeGroup;
pub use status::{Instance, InstanceErrorClass, InstanceErrorInfo, InstanceState};

#[cfg(test)]
pub use client::MockNodeGroupClient;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Id of the worker node group. Flow clusters have exactly one worker pool.
pub const WORKER_NODE_GROUP_ID: i32 = 1;

/// Role key marking control-plane nodes, which are never autoscaled
pub const CONTROL_PLANE_ROLE: &str = "control-plane";
