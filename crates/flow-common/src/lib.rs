//! Common types for the Flow autoscaler provider: configuration, errors, and telemetry

#![deny(missing_docs)]

pub mod config;
pub mod error;
pub mod node_group_spec;
pub mod telemetry;

pub use config::Config;
pub use error::Error;
pub use node_group_spec::NodeGroupSpec;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Name of the provider as reported to the cluster autoscaler
pub const PROVIDER_NAME: &str = "flow";

/// Default Flow API endpoint used when no URL is configured
pub const DEFAULT_API_URL: &str = "https://api.flow.ch/";

/// Name of the node group spec that configures the worker pool bounds
pub const WORKERS_NODE_GROUP: &str = "workers";
