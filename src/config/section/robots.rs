//! `[robots]` section configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotsConfig {
    pub enable: bool,
    /// Paths listed as `Disallow:` for all agents.
    pub disallow: Vec<String>,
}

impl Default for RobotsConfig {
    fn default() -> Self {
        Self {
            enable: true,
            disallow: Vec::new(),
        }
    }
}
