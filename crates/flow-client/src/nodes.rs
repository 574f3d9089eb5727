//! Node operations.

use tracing::warn;

use crate::client::{decode, Client};
use crate::clusters::cluster_path;
use crate::error::Result;
use crate::types::{Cursor, Node, NodeList, Pagination};

const PAGINATION_HEADER: &str = "x-pagination";

pub(crate) fn nodes_path(cluster_id: i64) -> String {
    format!("{}/nodes", cluster_path(cluster_id))
}

pub(crate) fn node_path(cluster_id: i64, node_id: i64) -> String {
    format!("{}/{}", nodes_path(cluster_id), node_id)
}

impl Client {
    /// List the nodes of a cluster.
    pub async fn list_nodes(&self, cluster_id: i64, cursor: Cursor) -> Result<NodeList> {
        let response = self.get(&nodes_path(cluster_id), &cursor.query()).await?;

        let pagination = response
            .headers()
            .get(PAGINATION_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|raw| match serde_json::from_str::<Pagination>(raw) {
                Ok(p) => Some(p),
                Err(e) => {
                    warn!(header = %raw, error = %e, "Ignoring malformed pagination header");
                    None
                }
            });

        let items: Vec<Node> = decode(response).await?;
        Ok(NodeList { items, pagination })
    }

    /// Delete a node of a cluster.
    pub async fn delete_node(&self, cluster_id: i64, node_id: i64) -> Result<()> {
        self.delete(&node_path(cluster_id, node_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_paths() {
        assert_eq!(nodes_path(7), "/v4/kubernetes/clusters/7/nodes");
        assert_eq!(node_path(7, 42), "/v4/kubernetes/clusters/7/nodes/42");
    }
}
