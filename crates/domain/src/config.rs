use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::region::{Region, RegionMap};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub regions: RegionsConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_upstream_servers")]
    pub servers: Vec<String>,

    /// Bound on each individual upstream attempt, in seconds. The race as a
    /// whole ends when the first attempt succeeds or the last one fails.
    #[serde(default = "default_query_timeout")]
    pub query_timeout: u64,
}

/// Per-region client-subnet addresses. An absent or empty entry leaves the
/// region inactive; requests on its route get a 404.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct RegionsConfig {
    #[serde(default)]
    pub hk: Option<String>,
    #[serde(default)]
    pub jp: Option<String>,
    #[serde(default)]
    pub sg: Option<String>,
    #[serde(default)]
    pub us: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_cache_max_entries")]
    pub max_entries: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}
fn default_http_port() -> u16 {
    8053
}
fn default_upstream_servers() -> Vec<String> {
    vec![
        "https://cloudflare-dns.com/dns-query".to_string(),
        "https://dns.google/dns-query".to_string(),
    ]
}
fn default_query_timeout() -> u64 {
    5
}
fn default_cache_max_entries() -> usize {
    100_000
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            http_port: default_http_port(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            servers: default_upstream_servers(),
            query_timeout: default_query_timeout(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: default_cache_max_entries(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl RegionsConfig {
    fn entry(&self, region: Region) -> Option<&String> {
        let value = match region {
            Region::HongKong => &self.hk,
            Region::Japan => &self.jp,
            Region::Singapore => &self.sg,
            Region::UnitedStates => &self.us,
        };
        value.as_ref().filter(|s| !s.is_empty())
    }
}

impl Config {
    /// Load configuration from file or use defaults.
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. geodoh.toml in the current directory
    /// 3. /etc/geodoh/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new("geodoh.toml").exists() {
            Self::from_file("geodoh.toml")?
        } else if std::path::Path::new("/etc/geodoh/config.toml").exists() {
            Self::from_file("/etc/geodoh/config.toml")?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.http_port {
            self.server.http_port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(servers) = overrides.upstream_servers {
            self.upstream.servers = servers
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.http_port == 0 {
            return Err(ConfigError::Validation("HTTP port cannot be 0".to_string()));
        }

        if self.upstream.servers.is_empty() {
            return Err(ConfigError::Validation(
                "No upstream resolvers configured".to_string(),
            ));
        }

        for server in &self.upstream.servers {
            if !server.starts_with("https://") && !server.starts_with("http://") {
                return Err(ConfigError::Validation(format!(
                    "Upstream '{}' is not an HTTP(S) URL",
                    server
                )));
            }
        }

        if self.upstream.query_timeout == 0 {
            return Err(ConfigError::Validation(
                "Upstream query timeout cannot be 0".to_string(),
            ));
        }

        for region in Region::ALL {
            if let Some(value) = self.regions.entry(region) {
                value.parse::<IpAddr>().map_err(|e| {
                    ConfigError::Validation(format!(
                        "Region '{}' has invalid subnet address '{}': {}",
                        region.tag(),
                        value,
                        e
                    ))
                })?;
            }
        }

        Ok(())
    }

    /// Builds the immutable region table from validated configuration.
    ///
    /// Call `validate` first; an unparsable address here is a validation bug.
    pub fn region_map(&self) -> Result<RegionMap, ConfigError> {
        let mut entries = Vec::new();
        for region in Region::ALL {
            if let Some(value) = self.regions.entry(region) {
                let addr = value.parse::<IpAddr>().map_err(|e| {
                    ConfigError::Validation(format!(
                        "Region '{}' has invalid subnet address '{}': {}",
                        region.tag(),
                        value,
                        e
                    ))
                })?;
                entries.push((region, addr));
            }
        }
        Ok(RegionMap::new(entries))
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub http_port: Option<u16>,
    pub bind_address: Option<String>,
    /// Comma-separated list of upstream DoH URLs.
    pub upstream_servers: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    FileRead(String, String),
    #[error("Failed to parse config: {0}")]
    Parse(String),
    #[error("Configuration validation error: {0}")]
    Validation(String),
}
