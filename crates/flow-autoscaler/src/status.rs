//! Translation of Flow node states into autoscaler instance states.

use flow_client::{Node, NodeStatus, NodeStatusKey};

use crate::provider_id::to_provider_id;

/// Error code reported for every node state the autoscaler doesn't know.
pub const FLOW_ERROR_CODE: &str = "no-code-flow";

/// Error class of an instance in an unknown state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstanceErrorClass {
    /// Flow reports no error classes, every unknown state lands here
    Other,
}

/// Details of an instance in an error state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstanceErrorInfo {
    /// Error class
    pub class: InstanceErrorClass,
    /// Provider specific error code
    pub code: String,
    /// Human readable message, the raw Flow status key
    pub message: String,
}

/// State of an instance as seen by the autoscaler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InstanceState {
    /// Node is being provisioned
    Creating,
    /// Node is up
    Running,
    /// Node is draining or being removed
    Deleting,
    /// Node is in a state the autoscaler can't interpret
    Errored(InstanceErrorInfo),
}

/// A node group member as reported to the autoscaler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instance {
    /// Provider id, `flow://<id>`
    pub id: String,
    /// Translated state
    pub state: InstanceState,
}

impl From<&Node> for Instance {
    fn from(node: &Node) -> Self {
        Self {
            id: to_provider_id(node.id),
            state: translate(&node.status),
        }
    }
}

/// Map a Flow node status to an instance state.
///
/// Total: unknown keys become [`InstanceState::Errored`] carrying the raw key.
pub fn translate(status: &NodeStatus) -> InstanceState {
    match &status.key {
        NodeStatusKey::Creating => InstanceState::Creating,
        NodeStatusKey::Healthy => InstanceState::Running,
        NodeStatusKey::Draining | NodeStatusKey::Deleting => InstanceState::Deleting,
        NodeStatusKey::Other(raw) => InstanceState::Errored(InstanceErrorInfo {
            class: InstanceErrorClass::Other,
            code: FLOW_ERROR_CODE.to_string(),
            message: raw.clone(),
        }),
    }
}
