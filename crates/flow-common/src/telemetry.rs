//! Tracing subscriber setup
//!
//! Logs go to stdout, either human readable or as JSON lines for log
//! collectors. The filter is taken from `RUST_LOG` when set.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::{Error, Result};

const DEFAULT_FILTER: &str = "info,flow_autoscaler=debug,flow_client=info,hyper=warn,reqwest=warn";

/// Configuration for telemetry initialization
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to every log line (e.g., "flow-autoscaler")
    pub service_name: String,

    /// Emit JSON structured logs instead of the pretty format
    pub json: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "flow-autoscaler".to_string(),
            json: false,
        }
    }
}

/// Install the global tracing subscriber.
///
/// Fails if a subscriber was already installed.
pub fn init_telemetry(config: TelemetryConfig) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let (json_layer, pretty_layer) = if config.json {
        let layer = tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_target(true)
            .with_file(false)
            .with_line_number(false);
        (Some(layer), None)
    } else {
        (None, Some(tracing_subscriber::fmt::layer().with_target(false)))
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(pretty_layer)
        .try_init()
        .map_err(|e: tracing_subscriber::util::TryInitError| Error::Telemetry(e.to_string()))?;

    tracing::debug!(service = %config.service_name, json = config.json, "Telemetry initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_pretty() {
        let config = TelemetryConfig::default();
        assert_eq!(config.service_name, "flow-autoscaler");
        assert!(!config.json);
    }

    #[test]
    fn default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }

    #[test]
    fn second_init_fails() {
        // Only one global subscriber per process.
        let _ = init_telemetry(TelemetryConfig::default());
        let second = init_telemetry(TelemetryConfig {
            service_name: "test".to_string(),
            json: true,
        });
        assert!(matches!(second, Err(Error::Telemetry(_))));
    }
}
