//! Wire types for the Flow Kubernetes API.

use serde::{Deserialize, Deserializer, Serialize};

/// A node of a Flow Kubernetes cluster.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Node {
    /// Remote-assigned node id.
    pub id: i64,
    /// Display name.
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Roles of the node (e.g. `control-plane`, `worker`).
    #[serde(deserialize_with = "null_as_default")]
    pub roles: Vec<NodeRole>,
    /// Product (flavor) the node was created from.
    #[serde(deserialize_with = "null_as_default")]
    pub product: Product,
    /// Lifecycle status.
    #[serde(deserialize_with = "null_as_default")]
    pub status: NodeStatus,
}

impl Node {
    /// Whether any of the node's roles has the given key.
    pub fn has_role(&self, key: &str) -> bool {
        self.roles.iter().any(|role| role.key == key)
    }
}

/// Role tag attached to a node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeRole {
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

/// Lifecycle status of a node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeStatus {
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub key: NodeStatusKey,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

/// Status key reported by the API.
///
/// The set of keys is not closed: Flow may introduce new ones at any time, so
/// anything unknown is kept verbatim in [`NodeStatusKey::Other`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeStatusKey {
    Healthy,
    Creating,
    Draining,
    Deleting,
    Other(String),
}

impl NodeStatusKey {
    /// The raw key as sent on the wire.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Healthy => "healthy",
            Self::Creating => "creating",
            Self::Draining => "draining",
            Self::Deleting => "deleting",
            Self::Other(raw) => raw,
        }
    }
}

impl Default for NodeStatusKey {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<&str> for NodeStatusKey {
    fn from(raw: &str) -> Self {
        match raw {
            "healthy" => Self::Healthy,
            "creating" => Self::Creating,
            "draining" => Self::Draining,
            "deleting" => Self::Deleting,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for NodeStatusKey {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "healthy" | "creating" | "draining" | "deleting" => Self::from(raw.as_str()),
            _ => Self::Other(raw),
        }
    }
}

impl From<NodeStatusKey> for String {
    fn from(key: NodeStatusKey) -> Self {
        match key {
            NodeStatusKey::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for NodeStatusKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Product (flavor/SKU) reference. Only the fields the autoscaler needs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    pub id: i64,
    #[serde(rename = "product_name", deserialize_with = "null_as_default")]
    pub name: String,
}

/// A Flow Kubernetes cluster as returned by flavor updates.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cluster {
    pub id: i64,
    pub name: String,
    pub node_count: NodeCount,
}

/// Current and expected node counts of a cluster.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeCount {
    pub current: RoleCount,
    pub expected: RoleCount,
}

/// Node count split by role.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleCount {
    #[serde(rename = "control-plane")]
    pub control_plane: i32,
    pub worker: i32,
}

/// Body of a worker flavor update.
///
/// The API wants the product on every update, even if only the count changes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterUpdateFlavor {
    pub worker: ClusterWorkerUpdate,
}

/// Desired worker pool shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterWorkerUpdate {
    pub product_id: i64,
    pub count: i32,
}

/// Pagination cursor for list endpoints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cursor {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// `1` disables pagination and returns every item.
    pub no_filter: u8,
}

impl Cursor {
    /// A cursor that fetches every item in one request.
    pub fn all() -> Self {
        Self {
            no_filter: 1,
            ..Default::default()
        }
    }

    /// Query parameters for this cursor.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        if let Some(per_page) = self.per_page {
            query.push(("per_page", per_page.to_string()));
        }
        if self.no_filter != 0 {
            query.push(("no_filter", self.no_filter.to_string()));
        }
        query
    }
}

/// Pagination metadata returned in the `X-Pagination` header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub count: u32,
    pub limit: u32,
    pub current_page: u32,
    pub total_pages: u32,
}

/// A page of nodes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeList {
    pub items: Vec<Node>,
    pub pagination: Option<Pagination>,
}

/// Read an explicit `null` the same way as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
