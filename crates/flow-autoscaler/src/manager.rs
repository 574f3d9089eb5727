//! Node group discovery and caching
//!
//! The manager owns the node group snapshot. Each refresh lists the cluster's
//! nodes, drops control-plane nodes, and swaps in a freshly built worker node
//! group. A failed refresh leaves the previous snapshot in place.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use flow_client::{Cursor, Node};
use flow_common::{Config, NodeGroupSpec, WORKERS_NODE_GROUP};

use crate::client::{FlowNodeGroupClient, NodeGroupClient};
use crate::node_group::NodeGroup;
use crate::{Error, Result, CONTROL_PLANE_ROLE, WORKER_NODE_GROUP_ID};

/// Handles Flow communication and caching of node groups
pub struct Manager {
    client: Arc<dyn NodeGroupClient>,
    cluster_id: i64,
    specs: Vec<NodeGroupSpec>,
    node_groups: RwLock<Vec<Arc<NodeGroup>>>,
}

impl std::fmt::Debug for Manager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Manager")
            .field("cluster_id", &self.cluster_id)
            .field("specs", &self.specs)
            .finish_non_exhaustive()
    }
}

impl Manager {
    /// Create a manager with an injected client.
    ///
    /// The node group collection starts empty; call [`refresh`](Self::refresh)
    /// to populate it.
    pub fn new(
        cluster_id: i64,
        specs: Vec<NodeGroupSpec>,
        client: Arc<dyn NodeGroupClient>,
    ) -> Self {
        Self {
            client,
            cluster_id,
            specs,
            node_groups: RwLock::new(Vec::new()),
        }
    }

    /// Create a manager talking to the Flow API described by `config`.
    ///
    /// `node_group_specs` are the raw `min:max:name` strings from the autoscaler.
    pub fn from_config<S: AsRef<str>>(config: &Config, node_group_specs: &[S]) -> Result<Self> {
        config.validate()?;
        let specs = NodeGroupSpec::parse_all(node_group_specs)?;
        let client = FlowNodeGroupClient::from_config(config)?;

        Ok(Self::new(config.cluster_id, specs, Arc::new(client)))
    }

    /// Flow cluster id this manager scales.
    pub fn cluster_id(&self) -> i64 {
        self.cluster_id
    }

    /// Configured node group specs.
    pub fn specs(&self) -> &[NodeGroupSpec] {
        &self.specs
    }

    /// Current node group snapshot.
    pub async fn node_groups(&self) -> Vec<Arc<NodeGroup>> {
        self.node_groups.read().await.clone()
    }

    /// Replace the node group snapshot.
    pub(crate) async fn set_node_groups(&self, groups: Vec<Arc<NodeGroup>>) {
        *self.node_groups.write().await = groups;
    }

    /// Rebuild the worker node group from the Flow API.
    ///
    /// Requires a spec named `workers`. Without one the refresh fails and the
    /// previous snapshot is kept.
    pub async fn refresh(&self) -> Result<()> {
        debug!(cluster_id = self.cluster_id, "Refreshing workers node group");

        let spec = self.workers_spec()?;
        debug!(
            min = spec.min_size,
            max = spec.max_size,
            "Found configuration for workers node group"
        );

        let node_list = self
            .client
            .list_cluster_nodes(Cursor::all())
            .await
            .map_err(|source| Error::ListNodes {
                cluster_id: self.cluster_id,
                source,
            })?;

        let total = node_list.items.len();
        let workers: Vec<Node> = node_list
            .items
            .into_iter()
            .filter(|node| !is_control_plane_node(node))
            .collect();

        info!(
            cluster_id = self.cluster_id,
            nodes = total,
            workers = workers.len(),
            min = spec.min_size,
            max = spec.max_size,
            "Refreshed workers node group"
        );

        let group = NodeGroup::new(
            WORKER_NODE_GROUP_ID,
            self.cluster_id,
            Arc::clone(&self.client),
            Some(workers),
            spec.min_size,
            spec.max_size,
        );

        self.set_node_groups(vec![Arc::new(group)]).await;
        Ok(())
    }

    fn workers_spec(&self) -> Result<&NodeGroupSpec> {
        self.specs
            .iter()
            .rev()
            .find(|spec| spec.name == WORKERS_NODE_GROUP)
            .ok_or_else(|| {
                warn!(
                    cluster_id = self.cluster_id,
                    "No node group spec for workers, autoscaling is disabled"
                );
                Error::MissingNodeGroupSpec {
                    name: WORKERS_NODE_GROUP.to_string(),
                }
            })
    }
}

/// Whether the node carries the control-plane role.
pub fn is_control_plane_node(node: &Node) -> bool {
    node.has_role(CONTROL_PLANE_ROLE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockNodeGroupClient;
    use flow_client::{ClientError, NodeList, NodeRole, NodeStatus, NodeStatusKey};

    fn specs(raw: &[&str]) -> Vec<NodeGroupSpec> {
        NodeGroupSpec::parse_all(raw).unwrap()
    }

    fn worker(id: i64, name: &str) -> Node {
        Node {
            id,
            name: name.to_string(),
            status: NodeStatus {
                id: 1,
                key: NodeStatusKey::Healthy,
                name: "Healthy".to_string(),
            },
            ..Default::default()
        }
    }

    fn control_plane(id: i64, name: &str) -> Node {
        Node {
            roles: vec![NodeRole {
                id: 1,
                key: "control-plane".to_string(),
                name: "Control Plane".to_string(),
            }],
            ..worker(id, name)
        }
    }

    fn listing(nodes: Vec<Node>) -> MockNodeGroupClient {
        let mut client = MockNodeGroupClient::new();
        client
            .expect_list_cluster_nodes()
            .withf(|cursor| cursor.no_filter == 1)
            .times(1)
            .return_once(move |_| {
                Ok(NodeList {
                    items: nodes,
                    pagination: None,
                })
            });
        client
    }

    #[tokio::test]
    async fn starts_without_node_groups() {
        let manager = Manager::new(
            123456,
            specs(&["1:10:workers"]),
            Arc::new(MockNodeGroupClient::new()),
        );
        assert!(manager.node_groups().await.is_empty());
        assert_eq!(manager.cluster_id(), 123456);
    }

    #[tokio::test]
    async fn refresh_builds_single_worker_group() {
        let client = listing(vec![worker(1, "worker1"), worker(2, "worker2")]);
        let manager = Manager::new(123456, specs(&["3:10:workers"]), Arc::new(client));

        manager.refresh().await.unwrap();

        let groups = manager.node_groups().await;
        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        assert_eq!(group.id(), "1");
        assert_eq!(group.cluster_id(), 123456);
        assert_eq!(group.min_size(), 3);
        assert_eq!(group.max_size(), 10);
        assert_eq!(group.target_size(), 2);
    }

    #[tokio::test]
    async fn refresh_drops_control_plane_nodes_anywhere_in_list() {
        let client = listing(vec![
            control_plane(1, "master1"),
            worker(2, "worker1"),
            control_plane(3, "master2"),
            worker(4, "worker2"),
            control_plane(5, "master3"),
        ]);
        let manager = Manager::new(1, specs(&["1:10:workers"]), Arc::new(client));

        manager.refresh().await.unwrap();

        let group = manager.node_groups().await.remove(0);
        let ids: Vec<String> = group.nodes().unwrap().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["flow://2", "flow://4"]);
    }

    #[tokio::test]
    async fn refresh_with_only_control_plane_yields_empty_existing_group() {
        let client = listing(vec![control_plane(1, "master1")]);
        let manager = Manager::new(1, specs(&["0:10:workers"]), Arc::new(client));

        manager.refresh().await.unwrap();

        let group = manager.node_groups().await.remove(0);
        assert!(group.exist());
        assert!(group.nodes().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_list_keeps_previous_snapshot() {
        let mut client = MockNodeGroupClient::new();
        let mut seq = mockall::Sequence::new();
        client
            .expect_list_cluster_nodes()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Ok(NodeList {
                    items: vec![worker(1, "worker1")],
                    pagination: None,
                })
            });
        client
            .expect_list_cluster_nodes()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Err(ClientError::Api {
                    status: 503,
                    message: "unavailable".to_string(),
                })
            });

        let manager = Manager::new(1, specs(&["1:10:workers"]), Arc::new(client));
        manager.refresh().await.unwrap();
        let before = manager.node_groups().await;

        let err = manager.refresh().await.unwrap_err();
        assert!(matches!(err, Error::ListNodes { cluster_id: 1, .. }));

        let after = manager.node_groups().await;
        assert_eq!(after.len(), 1);
        assert!(Arc::ptr_eq(&before[0], &after[0]));
    }

    #[tokio::test]
    async fn missing_workers_spec_fails_refresh_without_remote_call() {
        let mut client = MockNodeGroupClient::new();
        client.expect_list_cluster_nodes().never();

        let manager = Manager::new(1, specs(&["1:10:gpu"]), Arc::new(client));
        let err = manager.refresh().await.unwrap_err();

        assert!(matches!(err, Error::MissingNodeGroupSpec { ref name } if name == "workers"));
        assert!(manager.node_groups().await.is_empty());
    }

    #[tokio::test]
    async fn refresh_ignores_other_specs() {
        let client = listing(vec![worker(1, "worker1")]);
        let manager = Manager::new(
            1,
            specs(&["0:3:gpu", "2:8:workers"]),
            Arc::new(client),
        );

        manager.refresh().await.unwrap();

        let group = manager.node_groups().await.remove(0);
        assert_eq!(group.min_size(), 2);
        assert_eq!(group.max_size(), 8);
    }

    #[test]
    fn from_config_validates_inputs() {
        let config = Config {
            cluster_id: 123456,
            api_token: "123-123-123".to_string(),
            api_url: "https://api.flow.ch/".to_string(),
        };
        let manager = Manager::from_config(&config, &["1:10:workers"]).unwrap();
        assert_eq!(manager.cluster_id(), 123456);
        assert_eq!(manager.specs(), specs(&["1:10:workers"]).as_slice());

        let err = Manager::from_config(&config, &["nope"]).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let no_token = Config {
            api_token: String::new(),
            ..config
        };
        let err = Manager::from_config(&no_token, &["1:10:workers"]).unwrap_err();
        assert_eq!(err.to_string(), "flow access token is not provided");
    }

    #[test]
    fn control_plane_detection() {
        assert!(is_control_plane_node(&control_plane(1, "m")));
        assert!(!is_control_plane_node(&worker(1, "w")));
    }
}
