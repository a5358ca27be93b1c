//! Node configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use verity_types::VotingParams;

use crate::logging::LogFormat;
use crate::NodeError;

/// Configuration for a Verity node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Data directory for the LMDB environment.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Address the HTTP API binds to.
    #[serde(default = "default_rpc_host")]
    pub rpc_host: String,

    /// HTTP API port.
    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,

    /// Vote count that represents 100% when measuring a majority.
    #[serde(default = "default_quorum")]
    pub quorum: u64,

    /// Majority threshold in basis points (5100 = 51%).
    #[serde(default = "default_majority_bps")]
    pub majority_bps: u32,

    /// Maximum size of the LMDB memory map, in bytes.
    #[serde(default = "default_lmdb_map_size")]
    pub lmdb_map_size: usize,

    /// Whether to serve Prometheus metrics on `/metrics`.
    #[serde(default)]
    pub enable_metrics: bool,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./verity_data")
}

fn default_rpc_host() -> String {
    "0.0.0.0".to_string()
}

fn default_rpc_port() -> u16 {
    5000
}

fn default_quorum() -> u64 {
    VotingParams::DEFAULT_QUORUM
}

fn default_majority_bps() -> u32 {
    VotingParams::DEFAULT_MAJORITY_BPS
}

fn default_lmdb_map_size() -> usize {
    1 << 30
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Voting parameters described by this configuration.
    pub fn voting_params(&self) -> Result<VotingParams, NodeError> {
        VotingParams::new(self.quorum, self.majority_bps)
            .map_err(|e| NodeError::Config(e.to_string()))
    }

    pub fn log_format(&self) -> Result<LogFormat, NodeError> {
        self.log_format.parse()
    }

    /// Reject settings the node cannot start with.
    pub fn validate(&self) -> Result<(), NodeError> {
        self.voting_params()?;
        self.log_format()?;
        if self.lmdb_map_size == 0 {
            return Err(NodeError::Config("lmdb_map_size must be positive".into()));
        }
        if self.rpc_host.trim().is_empty() {
            return Err(NodeError::Config("rpc_host must not be empty".into()));
        }
        Ok(())
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            rpc_host: default_rpc_host(),
            rpc_port: default_rpc_port(),
            quorum: default_quorum(),
            majority_bps: default_majority_bps(),
            lmdb_map_size: default_lmdb_map_size(),
            enable_metrics: false,
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = NodeConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        let parsed = NodeConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = NodeConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.rpc_port, 5000);
        assert_eq!(config.quorum, 100);
        assert_eq!(config.majority_bps, 5100);
        assert_eq!(config.log_format, "human");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            rpc_port = 9999
            quorum = 10
            enable_metrics = true
        "#;
        let config = NodeConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.rpc_port, 9999);
        assert_eq!(config.voting_params().unwrap().quorum, 10);
        assert!(config.enable_metrics);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn zero_quorum_is_rejected() {
        let config = NodeConfig {
            quorum: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(NodeError::Config(_))));
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        let config = NodeConfig {
            log_format: "xml".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = NodeConfig::from_toml_file("/nonexistent/verity.toml");
        assert!(matches!(result, Err(NodeError::Config(_))));
    }
}
