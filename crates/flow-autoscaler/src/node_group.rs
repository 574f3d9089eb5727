//! The Flow worker pool as an autoscaler node group
//!
//! A `NodeGroup` is an immutable snapshot built by [`Manager::refresh`]: the
//! cached member nodes plus the configured bounds. Scale operations talk to
//! the Flow API but never touch the cache; the next refresh is the point where
//! the snapshot catches up with the remote state.
//!
//! [`Manager::refresh`]: crate::Manager::refresh

use std::sync::Arc;

use k8s_openapi::api::core::v1::Node as KubeNode;
use tracing::{debug, info};

use flow_client::{ClusterUpdateFlavor, ClusterWorkerUpdate, Node};

use crate::client::NodeGroupClient;
use crate::error::{DeltaSign, ScaleDirection};
use crate::provider_id::{kube_node_name, kube_provider_id, to_node_id};
use crate::status::Instance;
use crate::{Error, Result};

/// A resizable pool of Flow worker nodes
pub struct NodeGroup {
    id: i32,
    cluster_id: i64,
    client: Arc<dyn NodeGroupClient>,
    /// `None` until populated by a refresh; `Some(vec![])` is a real, empty pool.
    nodes: Option<Vec<Node>>,
    min_size: i32,
    max_size: i32,
}

impl std::fmt::Debug for NodeGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeGroup")
            .field("id", &self.id)
            .field("cluster_id", &self.cluster_id)
            .field("nodes", &self.nodes.as_ref().map(Vec::len))
            .field("min_size", &self.min_size)
            .field("max_size", &self.max_size)
            .finish()
    }
}

impl NodeGroup {
    /// Create a node group snapshot.
    pub fn new(
        id: i32,
        cluster_id: i64,
        client: Arc<dyn NodeGroupClient>,
        nodes: Option<Vec<Node>>,
        min_size: i32,
        max_size: i32,
    ) -> Self {
        Self {
            id,
            cluster_id,
            client,
            nodes,
            min_size,
            max_size,
        }
    }

    /// Unique identifier of the node group.
    pub fn id(&self) -> String {
        self.id.to_string()
    }

    /// Flow cluster the node group belongs to.
    pub fn cluster_id(&self) -> i64 {
        self.cluster_id
    }

    /// Maximum size of the node group.
    pub fn max_size(&self) -> i32 {
        self.max_size
    }

    /// Minimum size of the node group.
    pub fn min_size(&self) -> i32 {
        self.min_size
    }

    /// Number of nodes in the last refreshed snapshot.
    ///
    /// This is not live: after a successful resize it keeps reporting the old
    /// count until the next refresh.
    pub fn target_size(&self) -> i32 {
        let len = self.nodes.as_ref().map_or(0, Vec::len);
        i32::try_from(len).unwrap_or(i32::MAX)
    }

    /// Whether the node group was populated by a refresh.
    pub fn exist(&self) -> bool {
        self.nodes.is_some()
    }

    /// Node groups are never created by the autoscaler.
    pub fn autoprovisioned(&self) -> bool {
        false
    }

    /// Whether the snapshot contains the given Flow node.
    pub fn contains_node(&self, node_id: i64) -> bool {
        self.nodes
            .as_ref()
            .is_some_and(|nodes| nodes.iter().any(|n| n.id == node_id))
    }

    /// One line summary for autoscaler debug output.
    pub fn debug(&self) -> String {
        format!(
            "cluster ID: {} (min:{} max:{})",
            self.id(),
            self.min_size(),
            self.max_size()
        )
    }

    /// Increase the worker count by `delta`.
    ///
    /// Fails without any remote call if `delta` is not positive or the target
    /// would exceed the maximum. The API must acknowledge exactly the target.
    pub async fn increase_size(&self, delta: i32) -> Result<()> {
        if delta <= 0 {
            return Err(Error::InvalidDelta {
                delta,
                expected: DeltaSign::Positive,
            });
        }

        let current = self.target_size();
        let target = current.saturating_add(delta);
        if target > self.max_size() {
            return Err(Error::SizeIncreaseTooLarge {
                current,
                desired: target,
                max: self.max_size(),
            });
        }

        self.request_worker_count(target, delta, ScaleDirection::Increase)
            .await
    }

    /// Decrease the target size by `delta` (negative).
    ///
    /// Only lowers the requested worker count so that pending scale ups shrink;
    /// it never picks specific nodes to remove. Use [`delete_nodes`] for that.
    ///
    /// [`delete_nodes`]: NodeGroup::delete_nodes
    pub async fn decrease_target_size(&self, delta: i32) -> Result<()> {
        if delta >= 0 {
            return Err(Error::InvalidDelta {
                delta,
                expected: DeltaSign::Negative,
            });
        }

        let current = self.target_size();
        let target = current.saturating_add(delta);
        if target < self.min_size() {
            return Err(Error::SizeDecreaseTooSmall {
                current,
                desired: target,
                min: self.min_size(),
            });
        }

        self.request_worker_count(target, delta, ScaleDirection::Decrease)
            .await
    }

    /// Delete the given Kubernetes nodes, in order.
    ///
    /// The first failure aborts the batch. Nodes deleted before the failure
    /// stay deleted.
    pub async fn delete_nodes(&self, nodes: &[KubeNode]) -> Result<()> {
        for node in nodes {
            let name = kube_node_name(node);
            let wrap = |source: Error| Error::DeleteNode {
                cluster_id: self.cluster_id,
                node_group: self.id,
                node: name.to_string(),
                source: Box::new(source),
            };

            let node_id = to_node_id(kube_provider_id(node)).map_err(wrap)?;

            debug!(cluster_id = self.cluster_id, node = %name, node_id, "Deleting node");

            self.client
                .delete_cluster_node(node_id)
                .await
                .map_err(|e| wrap(Error::Client(e)))?;

            info!(cluster_id = self.cluster_id, node = %name, node_id, "Node deleted");
        }

        Ok(())
    }

    /// Members of the node group as autoscaler instances.
    pub fn nodes(&self) -> Result<Vec<Instance>> {
        let nodes = self.nodes.as_ref().ok_or(Error::NotCreated)?;
        Ok(nodes.iter().map(Instance::from).collect())
    }

    /// Product of the last cached node, `0` when the pool is empty.
    fn node_product_id(&self) -> i64 {
        self.nodes
            .as_ref()
            .and_then(|nodes| nodes.last())
            .map_or(0, |node| node.product.id)
    }

    async fn request_worker_count(
        &self,
        target: i32,
        delta: i32,
        direction: ScaleDirection,
    ) -> Result<()> {
        let body = ClusterUpdateFlavor {
            worker: ClusterWorkerUpdate {
                product_id: self.node_product_id(),
                count: target,
            },
        };

        info!(
            cluster_id = self.cluster_id,
            %direction,
            delta,
            target,
            product_id = body.worker.product_id,
            "Requesting worker count"
        );

        let cluster = self
            .client
            .update_cluster(self.cluster_id, body)
            .await
            .map_err(|source| Error::UpdateCluster {
                cluster_id: self.cluster_id,
                source,
            })?;

        let acknowledged = cluster.node_count.expected.worker;
        if acknowledged != target {
            return Err(Error::ResizeMismatch {
                direction,
                target,
                delta,
                acknowledged,
            });
        }

        Ok(())
    }
}
