//! Configuration for the leaderkv client

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::common::{Error, Result};

/// Environment variable prefix, e.g. `LEADERKV_CALL_TIMEOUT_MS=500`
pub const ENV_PREFIX: &str = "LEADERKV";

/// Upper bound accepted for `max_redirect_depth`
pub const MAX_REDIRECT_DEPTH_LIMIT: usize = 64;

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Timeout for a single remote call, connect included
    pub call_timeout_ms: u64,

    /// How many leader redirects a write may follow
    pub max_redirect_depth: usize,

    /// Logging level
    pub log_level: String,
}

fn default_call_timeout() -> u64 {
    3_000
}
fn default_max_redirect_depth() -> usize {
    5
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            call_timeout_ms: default_call_timeout(),
            max_redirect_depth: default_max_redirect_depth(),
            log_level: default_log_level(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from defaults, an optional TOML file and
    /// `LEADERKV_*` environment variables (highest priority last).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            if !path.exists() {
                return Err(Error::InvalidConfig(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(
                ::config::File::from(path)
                    .format(::config::FileFormat::Toml)
                    .required(true),
            );
        }
        builder =
            builder.add_source(::config::Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        let conf: ClientConfig = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        conf.validate()?;
        Ok(conf)
    }

    /// Reject values that would make a dispatch unbounded or useless
    pub fn validate(&self) -> Result<()> {
        if self.call_timeout_ms == 0 {
            return Err(Error::InvalidConfig(
                "call_timeout_ms must be greater than zero".into(),
            ));
        }
        if self.max_redirect_depth > MAX_REDIRECT_DEPTH_LIMIT {
            return Err(Error::InvalidConfig(format!(
                "max_redirect_depth {} exceeds limit of {}",
                self.max_redirect_depth, MAX_REDIRECT_DEPTH_LIMIT
            )));
        }
        Ok(())
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    /// Wall-clock budget for one dispatch including every redirect hop.
    ///
    /// One call timeout per permitted call: the initial one plus
    /// `max_redirect_depth` redirects.
    pub fn dispatch_deadline(&self) -> Duration {
        self.call_timeout() * (self.max_redirect_depth as u32 + 1)
    }
}
