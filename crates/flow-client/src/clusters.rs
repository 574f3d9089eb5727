//! Cluster operations.

use crate::client::Client;
use crate::error::Result;
use crate::types::{Cluster, ClusterUpdateFlavor};

const CLUSTERS_SEGMENT: &str = "/v4/kubernetes/clusters";

pub(crate) fn cluster_path(cluster_id: i64) -> String {
    format!("{}/{}", CLUSTERS_SEGMENT, cluster_id)
}

pub(crate) fn flavor_path(cluster_id: i64) -> String {
    format!("{}/flavor", cluster_path(cluster_id))
}

impl Client {
    /// Update the worker flavor (count and product) of a cluster.
    ///
    /// Returns the cluster as acknowledged by the API; the requested count is
    /// reflected in `node_count.expected.worker`.
    pub async fn update_cluster_flavor(
        &self,
        cluster_id: i64,
        body: &ClusterUpdateFlavor,
    ) -> Result<Cluster> {
        self.put(&flavor_path(cluster_id), body).await
    }
}
