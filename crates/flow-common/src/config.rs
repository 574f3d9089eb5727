//! Flow provider configuration.
//!
//! Configuration comes from one of two sources:
//! 1. A JSON document (usually the `--cloud-config` file) with
//!    `cluster_id`, `api_token` and `api_url` keys
//! 2. Environment variables `FLOW_CLUSTER_ID`, `FLOW_API_TOKEN`, `FLOW_API_URL`
//!
//! Both sources go through the same validation.

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::{Error, Result, DEFAULT_API_URL};

const FLOW_API_URL_ENV: &str = "FLOW_API_URL";
const FLOW_API_TOKEN_ENV: &str = "FLOW_API_TOKEN";
const FLOW_CLUSTER_ID_ENV: &str = "FLOW_CLUSTER_ID";

/// Configuration of the Flow cloud provider
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Id of the Flow Kubernetes cluster the autoscaler is running in.
    pub cluster_id: i64,

    /// Access token used to authenticate against the Flow API.
    pub api_token: String,

    /// Flow API endpoint. Empty means [`DEFAULT_API_URL`].
    pub api_url: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("cluster_id", &self.cluster_id)
            .field("api_token", &"<redacted>")
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl Config {
    /// Parse and validate a JSON configuration document.
    pub fn from_reader(mut reader: impl Read) -> Result<Self> {
        let mut body = String::new();
        reader
            .read_to_string(&mut body)
            .map_err(|e| Error::config(format!("failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&body)
            .map_err(|e| Error::config(format!("failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load and validate configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// `from_env` is this function over `std::env::var`; tests pass a map.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let raw_id = lookup(FLOW_CLUSTER_ID_ENV).unwrap_or_default();
        let cluster_id = raw_id.trim().parse::<i64>().map_err(|e| {
            Error::config(format!(
                "{} must be an integer, got {:?}: {}",
                FLOW_CLUSTER_ID_ENV, raw_id, e
            ))
        })?;

        let config = Config {
            cluster_id,
            api_token: lookup(FLOW_API_TOKEN_ENV).unwrap_or_default(),
            api_url: lookup(FLOW_API_URL_ENV).unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check that the mandatory fields are present.
    pub fn validate(&self) -> Result<()> {
        if self.api_token.is_empty() {
            return Err(Error::config("flow access token is not provided"));
        }
        if self.cluster_id == 0 {
            return Err(Error::config("flow cluster ID is not provided"));
        }
        Ok(())
    }

    /// The API endpoint to use, falling back to the public Flow API.
    pub fn api_url(&self) -> &str {
        if self.api_url.is_empty() {
            DEFAULT_API_URL
        } else {
            &self.api_url
        }
    }
}
