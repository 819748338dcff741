// src/config/models.rs
use anyhow::{bail, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub server: ServerConfig,
    pub check: CheckConfig,
    pub views: ViewConfig,
    pub metrics: MetricsConfig,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.check.timeout_secs == 0 {
            bail!("check.timeout_secs must be greater than zero");
        }
        if self.views.ttl_secs == 0 {
            bail!("views.ttl_secs must be greater than zero");
        }
        if self.views.ttl_secs < self.check.timeout_secs {
            bail!(
                "views.ttl_secs ({}) must not be shorter than check.timeout_secs ({})",
                self.views.ttl_secs,
                self.check.timeout_secs
            );
        }
        if self.metrics.enabled && self.metrics.port == self.server.listen.port() {
            bail!(
                "metrics.port {} collides with the admin server port",
                self.metrics.port
            );
        }
        if !self.metrics.path.starts_with('/') {
            bail!("metrics.path must start with '/': {}", self.metrics.path);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 8080)),
        }
    }
}

/// Transport settings for the outbound reachability check.
///
/// There is intentionally no endpoint field: the checked URL is fixed.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckConfig {
    pub timeout_secs: u64,
}

impl CheckConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewConfig {
    /// Page views whose result was never fetched are evicted after this long.
    pub ttl_secs: u64,
}

impl ViewConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self { ttl_secs: 300 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub port: u16,
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: 9090,
            path: "/metrics".to_string(),
        }
    }
}
