//! Engine configuration
//!
//! Correlation thresholds and table sizing, loadable from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RasConfig {
    #[serde(default)]
    pub correlation: CorrelationConfig,

    #[serde(default)]
    pub conversations: ConversationConfig,
}

impl RasConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Correlation engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationConfig {
    /// Gap after which a responded transaction's sequence number is
    /// presumed reused by a new call (seconds)
    pub responded_reuse_secs: u64,

    /// Gap after which an unresponded transaction's sequence number is
    /// presumed reused, rather than retried (seconds)
    pub unresponded_reuse_secs: u64,

    /// Initial record arena capacity
    pub initial_capacity: usize,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            responded_reuse_secs: 300,    // 5 minutes
            unresponded_reuse_secs: 1800, // 30 minutes
            initial_capacity: 1024,
        }
    }
}

/// Conversation registry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationConfig {
    /// Initial registry capacity
    pub initial_capacity: usize,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 4096,
        }
    }
}
