//! Node group bounds passed to the autoscaler as `--nodes=<min>:<max>:<name>`.

use std::str::FromStr;

use crate::{Error, Result};

/// Size bounds for a named node group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeGroupSpec {
    /// Minimum number of nodes (inclusive)
    pub min_size: i32,
    /// Maximum number of nodes (inclusive)
    pub max_size: i32,
    /// Node group name, e.g. "workers"
    pub name: String,
}

impl NodeGroupSpec {
    /// Parse a `min:max:name` spec. Scale to zero is supported, so `min` may be 0.
    pub fn parse(spec: &str) -> Result<Self> {
        let tokens: Vec<&str> = spec.split(':').collect();
        let [min, max, name] = tokens.as_slice() else {
            return Err(Error::invalid_spec(
                spec,
                format!("wrong number of fields: expected 3, got {}", tokens.len()),
            ));
        };

        let min_size = min
            .trim()
            .parse::<i32>()
            .map_err(|e| Error::invalid_spec(spec, format!("failed to set min size: {}", e)))?;
        let max_size = max
            .trim()
            .parse::<i32>()
            .map_err(|e| Error::invalid_spec(spec, format!("failed to set max size: {}", e)))?;

        if min_size < 0 {
            return Err(Error::invalid_spec(spec, "min size must be >= 0"));
        }
        if max_size < min_size {
            return Err(Error::invalid_spec(
                spec,
                "max size must be greater or equal to min size",
            ));
        }
        if max_size == 0 {
            return Err(Error::invalid_spec(spec, "max size must be greater than 0"));
        }
        if name.is_empty() {
            return Err(Error::invalid_spec(spec, "node group name must not be empty"));
        }

        Ok(Self {
            min_size,
            max_size,
            name: name.to_string(),
        })
    }

    /// Parse every spec, failing on the first malformed one.
    pub fn parse_all<S: AsRef<str>>(specs: &[S]) -> Result<Vec<Self>> {
        specs.iter().map(|s| Self::parse(s.as_ref())).collect()
    }
}

impl FromStr for NodeGroupSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl std::fmt::Display for NodeGroupSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.min_size, self.max_size, self.name)
    }
}
