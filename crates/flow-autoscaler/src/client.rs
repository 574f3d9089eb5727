//! Remote cluster operations consumed by node groups
//!
//! Provides a trait-based abstraction over the Flow API, allowing tests to
//! mock remote calls while production code uses the real HTTP client.

use async_trait::async_trait;
use tracing::debug;

#[cfg(test)]
use mockall::automock;

use flow_client::{Client, ClientError, Cluster, ClusterUpdateFlavor, Cursor, NodeList};
use flow_common::Config;

/// Trait abstracting the three remote operations a node group needs
///
/// Every call may suspend for a full network round trip. Dropping the future
/// cancels the local wait only: a mutation already sent may still be applied
/// by the API.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait NodeGroupClient: Send + Sync {
    /// List the nodes of the cluster (all roles).
    async fn list_cluster_nodes(&self, cursor: Cursor) -> Result<NodeList, ClientError>;

    /// Update the worker flavor of a cluster and return the acknowledged cluster.
    async fn update_cluster(
        &self,
        cluster_id: i64,
        body: ClusterUpdateFlavor,
    ) -> Result<Cluster, ClientError>;

    /// Delete a single node of the cluster.
    async fn delete_cluster_node(&self, node_id: i64) -> Result<(), ClientError>;
}

/// [`NodeGroupClient`] bound to one Flow cluster
#[derive(Debug, Clone)]
pub struct FlowNodeGroupClient {
    cluster_id: i64,
    client: Client,
}

impl FlowNodeGroupClient {
    /// Wrap an existing API client.
    pub fn new(cluster_id: i64, client: Client) -> Self {
        Self { cluster_id, client }
    }

    /// Build the API client from provider configuration.
    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        let client = Client::new(config.api_url())?.with_token(config.api_token.clone());
        Ok(Self::new(config.cluster_id, client))
    }
}

#[async_trait]
impl NodeGroupClient for FlowNodeGroupClient {
    async fn list_cluster_nodes(&self, cursor: Cursor) -> Result<NodeList, ClientError> {
        debug!(cluster_id = self.cluster_id, ?cursor, "Listing cluster nodes");
        self.client.list_nodes(self.cluster_id, cursor).await
    }

    async fn update_cluster(
        &self,
        cluster_id: i64,
        body: ClusterUpdateFlavor,
    ) -> Result<Cluster, ClientError> {
        debug!(
            cluster_id,
            product_id = body.worker.product_id,
            count = body.worker.count,
            "Updating worker flavor"
        );
        self.client.update_cluster_flavor(cluster_id, &body).await
    }

    async fn delete_cluster_node(&self, node_id: i64) -> Result<(), ClientError> {
        debug!(cluster_id = self.cluster_id, node_id, "Deleting cluster node");
        self.client.delete_node(self.cluster_id, node_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_uses_default_url() {
        let config = Config {
            cluster_id: 123456,
            api_token: "123-123-123".to_string(),
            api_url: String::new(),
        };
        let client = FlowNodeGroupClient::from_config(&config).unwrap();
        assert_eq!(client.cluster_id, 123456);
        assert_eq!(client.client.base_url(), flow_common::DEFAULT_API_URL);
    }

    #[test]
    fn from_config_rejects_bad_url() {
        let config = Config {
            cluster_id: 1,
            api_token: "t".to_string(),
            api_url: "api.flow.ch".to_string(),
        };
        assert!(FlowNodeGroupClient::from_config(&config).is_err());
    }
}
