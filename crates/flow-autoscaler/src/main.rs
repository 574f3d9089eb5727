//! Flow autoscaler operator tool
//!
//! Hosts the Flow node group provider outside the cluster autoscaler, for
//! inspecting the worker pool and issuing manual resize/delete requests.

use std::fs::File;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use k8s_openapi::api::core::v1::{Node as KubeNode, NodeSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

use flow_autoscaler::status::InstanceState;
use flow_autoscaler::{FlowCloudProvider, Manager, NodeGroup};
use flow_common::telemetry::{init_telemetry, TelemetryConfig};
use flow_common::Config;

/// Inspect and resize the worker pool of a Flow Kubernetes cluster
#[derive(Parser, Debug)]
#[command(name = "flow-autoscaler", version, about, long_about = None)]
struct Cli {
    /// JSON config file with cluster_id, api_token and api_url.
    /// Falls back to FLOW_CLUSTER_ID, FLOW_API_TOKEN and FLOW_API_URL.
    #[arg(long, env = "FLOW_CLOUD_CONFIG")]
    config: Option<PathBuf>,

    /// Node group bounds as <min>:<max>:<name>
    #[arg(long = "nodes", default_value = "1:10:workers")]
    node_group_specs: Vec<String>,

    /// Emit JSON logs
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the worker node group and its instances
    Status,

    /// Add workers
    Increase {
        /// Number of workers to add
        #[arg(long)]
        delta: i32,
    },

    /// Lower the requested worker count without deleting specific nodes
    Decrease {
        /// Number of workers to remove from the target (positive)
        #[arg(long)]
        delta: i32,
    },

    /// Delete specific nodes by provider id (flow://<id>)
    Delete {
        /// Provider ids of the nodes to delete
        #[arg(required = true)]
        provider_ids: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_telemetry(TelemetryConfig {
        service_name: "flow-autoscaler".to_string(),
        json: cli.log_json,
    })?;

    let config = load_config(cli.config.as_ref())?;
    let manager = Manager::from_config(&config, &cli.node_group_specs)?;
    let provider = FlowCloudProvider::new(manager);

    provider
        .refresh()
        .await
        .context("failed to refresh node groups")?;

    let group = workers_group(&provider).await?;

    match cli.command {
        Commands::Status => print_status(&group)?,
        Commands::Increase { delta } => {
            group.increase_size(delta).await?;
            println!(
                "requested {} workers (was {})",
                group.target_size() + delta,
                group.target_size()
            );
        }
        Commands::Decrease { delta } => {
            group.decrease_target_size(delta.saturating_neg()).await?;
            println!(
                "requested {} workers (was {})",
                group.target_size() - delta,
                group.target_size()
            );
        }
        Commands::Delete { provider_ids } => {
            let nodes: Vec<KubeNode> = provider_ids
                .iter()
                .map(String::as_str)
                .map(kube_node)
                .collect();
            group.delete_nodes(&nodes).await?;
            println!("deleted {} node(s)", nodes.len());
        }
    }

    provider.cleanup()?;
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            Ok(Config::from_reader(file)?)
        }
        None => Ok(Config::from_env()?),
    }
}

async fn workers_group(provider: &FlowCloudProvider) -> anyhow::Result<std::sync::Arc<NodeGroup>> {
    provider
        .node_groups()
        .await
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("no node groups configured"))
}

fn print_status(group: &NodeGroup) -> anyhow::Result<()> {
    println!("{}", group.debug());
    println!("target size: {}", group.target_size());

    for instance in group.nodes()? {
        let state = match instance.state {
            InstanceState::Creating => "creating".to_string(),
            InstanceState::Running => "running".to_string(),
            InstanceState::Deleting => "deleting".to_string(),
            InstanceState::Errored(info) => format!("error {} ({})", info.code, info.message),
        };
        println!("{:<16} {}", instance.id, state);
    }
    Ok(())
}

/// Minimal Kubernetes node handle carrying only a provider id.
fn kube_node(provider_id: &str) -> KubeNode {
    KubeNode {
        metadata: ObjectMeta {
            name: Some(provider_id.to_string()),
            ..Default::default()
        },
        spec: Some(NodeSpec {
            provider_id: Some(provider_id.to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}
