//! Provider facade consumed by the cluster autoscaler.

use std::sync::Arc;

use k8s_openapi::api::core::v1::Node as KubeNode;
use tracing::debug;

use flow_common::PROVIDER_NAME;

use crate::manager::Manager;
use crate::node_group::NodeGroup;
use crate::provider_id::{kube_provider_id, to_node_id};
use crate::Result;

/// Flow implementation of the autoscaler cloud provider interface
#[derive(Debug)]
pub struct FlowCloudProvider {
    manager: Manager,
}

impl FlowCloudProvider {
    /// Wrap a manager. The manager is not refreshed here.
    pub fn new(manager: Manager) -> Self {
        Self { manager }
    }

    /// Name of the cloud provider.
    pub fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    /// The underlying manager.
    pub fn manager(&self) -> &Manager {
        &self.manager
    }

    /// All node groups configured for this provider.
    pub async fn node_groups(&self) -> Vec<Arc<NodeGroup>> {
        self.manager.node_groups().await
    }

    /// Node group the given Kubernetes node belongs to.
    ///
    /// `Ok(None)` means the node is not autoscaled (e.g. a control-plane node
    /// or a node that appeared after the last refresh).
    pub async fn node_group_for_node(&self, node: &KubeNode) -> Result<Option<Arc<NodeGroup>>> {
        let node_id = to_node_id(kube_provider_id(node))?;

        let group = self
            .manager
            .node_groups()
            .await
            .into_iter()
            .find(|group| group.contains_node(node_id));

        if group.is_none() {
            debug!(node_id, "Node does not belong to any node group");
        }
        Ok(group)
    }

    /// Refresh the node group cache. Called before every autoscaler loop.
    pub async fn refresh(&self) -> Result<()> {
        self.manager.refresh().await
    }

    /// Release resources. Nothing to clean up for Flow.
    pub fn cleanup(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockNodeGroupClient;
    use crate::Error;
    use flow_client::{Cursor, Node, NodeList, NodeStatus, NodeStatusKey};
    use flow_common::NodeGroupSpec;
    use k8s_openapi::api::core::v1::NodeSpec;

    fn healthy(id: i64) -> Node {
        Node {
            id,
            name: format!("worker{}", id),
            status: NodeStatus {
                id: 1,
                key: NodeStatusKey::Healthy,
                name: "Healthy".to_string(),
            },
            ..Default::default()
        }
    }

    async fn test_cloud_provider(nodes: Vec<Node>) -> FlowCloudProvider {
        let mut client = MockNodeGroupClient::new();
        client
            .expect_list_cluster_nodes()
            .withf(|cursor| *cursor == Cursor::all())
            .times(1)
            .return_once(move |_| {
                Ok(NodeList {
                    items: nodes,
                    pagination: None,
                })
            });

        let specs = NodeGroupSpec::parse_all(&["3:10:workers"]).unwrap();
        let provider = FlowCloudProvider::new(Manager::new(123456, specs, Arc::new(client)));
        provider.refresh().await.unwrap();
        provider
    }

    fn kube_node(provider_id: &str) -> KubeNode {
        KubeNode {
            spec: Some(NodeSpec {
                provider_id: Some(provider_id.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn provider_name() {
        let provider = test_cloud_provider(vec![]).await;
        assert_eq!(provider.name(), "flow");
        assert!(provider.cleanup().is_ok());
    }

    #[tokio::test]
    async fn node_groups_after_refresh() {
        let mut creating = healthy(3);
        creating.status.key = NodeStatusKey::Creating;
        let provider = test_cloud_provider(vec![healthy(1), healthy(2), creating]).await;

        let groups = provider.node_groups().await;
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].nodes().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn zero_groups() {
        let provider = test_cloud_provider(vec![healthy(1)]).await;
        provider.manager().set_node_groups(Vec::new()).await;
        assert!(provider.node_groups().await.is_empty());
    }

    #[tokio::test]
    async fn node_group_for_known_node() {
        let provider = test_cloud_provider(vec![healthy(11), healthy(22)]).await;

        let group = provider
            .node_group_for_node(&kube_node("flow://11"))
            .await
            .unwrap()
            .expect("node 11 should belong to the workers group");
        assert_eq!(group.id(), "1");
    }

    #[tokio::test]
    async fn node_group_for_unknown_node() {
        let provider = test_cloud_provider(vec![healthy(11), healthy(22)]).await;

        let group = provider
            .node_group_for_node(&kube_node("flow://33"))
            .await
            .unwrap();
        assert!(group.is_none());
    }

    #[tokio::test]
    async fn node_group_for_malformed_provider_id() {
        let provider = test_cloud_provider(vec![healthy(11)]).await;

        let err = provider
            .node_group_for_node(&kube_node("aws:///eu-west-1a/i-123"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidProviderId { .. }));
    }
}
