//! Client for the Flow managed Kubernetes API
//!
//! Only the operations the autoscaler needs are implemented:
//! - listing the nodes of a cluster
//! - updating the worker flavor (count and product) of a cluster
//! - deleting a single node

pub mod client;
pub mod clusters;
pub mod error;
pub mod nodes;
pub mod types;

pub use client::Client;
pub use error::{ClientError, Result};
pub use types::{
    Cluster, ClusterUpdateFlavor, ClusterWorkerUpdate, Cursor, Node, NodeCount, NodeList,
    NodeRole, NodeStatus, NodeStatusKey, Pagination, Product, RoleCount,
};
