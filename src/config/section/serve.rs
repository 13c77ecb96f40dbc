//! `[serve]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [serve]
//! interface = "127.0.0.1"     # 0.0.0.0 makes the server reachable from LAN
//! port = 5173
//! ```

use crate::config::ConfigDiagnostics;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};

/// Development server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Network interface to bind.
    pub interface: IpAddr,
    /// HTTP port number.
    pub port: u16,
    /// Worker threads handling requests.
    pub workers: usize,
}

crate::config_fields!(ServeFields for ServeConfig in "serve" {
    interface, port, workers,
});

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 5173,
            workers: 4,
        }
    }
}

impl ServeConfig {
    /// Local URL the server answers on.
    pub fn local_url(&self) -> String {
        match self.interface {
            IpAddr::V6(ip) => format!("http://[{ip}]:{}", self.port),
            IpAddr::V4(ip) => format!("http://{ip}:{}", self.port),
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.workers == 0 {
            diag.error_with_hint(Self::FIELDS.workers, "must be at least 1", "e.g. workers = 4");
        }
    }
}
