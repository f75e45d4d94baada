use serde::{Deserialize, Serialize};
use std::path::Path;

use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::server::ServerConfig;
use super::upstream::UpstreamConfig;
use crate::upstream::UpstreamDescriptor;

/// Files probed when no path is given on the command line.
pub const CONFIG_SEARCH_PATHS: [&str; 2] = ["dohgate.toml", "/etc/dohgate/config.toml"];

/// Main configuration structure for dohgate
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. dohgate.toml in current directory
    /// 3. /etc/dohgate/config.toml
    /// 4. Default configuration
    ///
    /// CLI overrides are applied on top; the result is not validated.
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match path.map(str::to_string).or_else(Self::get_config_path) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(port) = overrides.web_port {
            self.server.web_port = port;
        }
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = Some(port);
        }
        if !overrides.upstreams.is_empty() {
            self.upstream.servers = overrides.upstreams;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.web_port == 0 {
            return Err(ConfigError::Validation("Web port cannot be 0".to_string()));
        }
        if self.server.dns_port == Some(0) {
            return Err(ConfigError::Validation("DNS port cannot be 0".to_string()));
        }
        if !self.server.doh_path.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "DoH path '{}' must start with '/'",
                self.server.doh_path
            )));
        }

        if self.upstream.servers.is_empty() {
            return Err(ConfigError::Validation(
                "No upstream servers configured".to_string(),
            ));
        }
        for server in self
            .upstream
            .servers
            .iter()
            .chain(&self.upstream.json_api_endpoints)
        {
            server
                .parse::<UpstreamDescriptor>()
                .map_err(ConfigError::Validation)?;
        }
        if self.upstream.query_timeout == 0 {
            return Err(ConfigError::Validation(
                "Query timeout cannot be 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the path to the configuration file that would be loaded by default
    pub fn get_config_path() -> Option<String> {
        CONFIG_SEARCH_PATHS
            .iter()
            .find(|path| Path::new(path).exists())
            .map(|path| path.to_string())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub bind_address: Option<String>,
    pub web_port: Option<u16>,
    pub dns_port: Option<u16>,
    /// Replaces the configured pool when non-empty.
    pub upstreams: Vec<String>,
    pub log_level: Option<String>,
}
