//! Provider ids of the form `flow://<node id>`.

use k8s_openapi::api::core::v1::Node as KubeNode;

use crate::{Error, Result};

/// Scheme prefix of every Flow provider id.
pub const PROVIDER_ID_PREFIX: &str = "flow://";

/// Format a Flow node id as a provider id.
pub fn to_provider_id(node_id: i64) -> String {
    format!("{}{}", PROVIDER_ID_PREFIX, node_id)
}

/// Parse a provider id into a Flow node id.
pub fn to_node_id(provider_id: &str) -> Result<i64> {
    let raw = provider_id
        .strip_prefix(PROVIDER_ID_PREFIX)
        .ok_or_else(|| Error::InvalidProviderId {
            provider_id: provider_id.to_string(),
            reason: format!("missing {:?} prefix", PROVIDER_ID_PREFIX),
        })?;

    raw.parse::<i64>().map_err(|e| Error::InvalidProviderId {
        provider_id: provider_id.to_string(),
        reason: format!("node id is not an integer: {}", e),
    })
}

/// `spec.providerID` of a Kubernetes node, empty when unset.
pub fn kube_provider_id(node: &KubeNode) -> &str {
    node.spec
        .as_ref()
        .and_then(|spec| spec.provider_id.as_deref())
        .unwrap_or_default()
}

/// `metadata.name` of a Kubernetes node, empty when unset.
pub fn kube_node_name(node: &KubeNode) -> &str {
    node.metadata.name.as_deref().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::NodeSpec;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    #[test]
    fn round_trips() {
        for id in [0, 1, 42, 9_007_199_254_740_993] {
            assert_eq!(to_node_id(&to_provider_id(id)).unwrap(), id);
        }
        assert_eq!(to_provider_id(42), "flow://42");
    }

    #[test]
    fn missing_scheme_is_rejected() {
        let err = to_node_id("42").unwrap_err();
        assert!(matches!(err, Error::InvalidProviderId { .. }));
        assert!(err.to_string().contains("missing \"flow://\" prefix"));

        assert!(to_node_id("aws://42").is_err());
        assert!(to_node_id("").is_err());
    }

    #[test]
    fn non_numeric_id_is_rejected() {
        let err = to_node_id("flow://abc").unwrap_err();
        assert!(err.to_string().contains("node id is not an integer"));
        assert!(to_node_id("flow://").is_err());
        assert!(to_node_id("flow://1/2").is_err());
    }

    #[test]
    fn reads_kube_node_fields() {
        let node = KubeNode {
            metadata: ObjectMeta {
                name: Some("worker1".to_string()),
                ..Default::default()
            },
            spec: Some(NodeSpec {
                provider_id: Some("flow://1".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(kube_provider_id(&node), "flow://1");
        assert_eq!(kube_node_name(&node), "worker1");

        let empty = KubeNode::default();
        assert_eq!(kube_provider_id(&empty), "");
        assert_eq!(kube_node_name(&empty), "");
    }
}
