//! Configuration management for padlink
//!
//! Handles loading, parsing, validation and hot-reloading of the YAML
//! configuration file.
//!
//! ```yaml
//! server:
//!   bind: "0.0.0.0"
//!   port: 8081
//!   path: "/"
//! device:
//!   hostname: "padlink"
//!   address: "192.168.4.1"   # optional, reported in the handshake greeting
//! auth:                      # optional HTTP Basic credentials
//!   user: "admin"
//!   password: "secret"
//! logging:
//!   file: true
//! ```

pub mod watcher;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use tokio::fs;

pub use watcher::ConfigWatcher;

use crate::transport::ws::{basic_auth_header, WsServerConfig};

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

/// WebSocket listener configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_path")]
    pub path: String,
}

/// Identity of this device on the network
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct DeviceConfig {
    #[serde(default = "default_hostname")]
    pub hostname: String,
    /// Address reported to clients instead of the detected one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Credentials required on the WebSocket upgrade
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct AuthConfig {
    pub user: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingConfig {
    /// Also write a daily rolling log file
    #[serde(default = "default_true")]
    pub file: bool,
    /// Overrides the default logs directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            path: default_path(),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            hostname: default_hostname(),
            address: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub async fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path))?;

        Self::parse(&contents).with_context(|| format!("Invalid config file: {}", path))
    }

    /// Parse and validate YAML text
    pub fn parse(contents: &str) -> Result<Self> {
        let config: AppConfig =
            serde_yaml::from_str(contents).context("Failed to parse YAML config")?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save(&self, path: &str) -> Result<()> {
        let yaml = serde_yaml::to_string(self).context("Failed to serialize config to YAML")?;

        fs::write(path, yaml)
            .await
            .with_context(|| format!("Failed to write config file: {}", path))?;

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("server.port cannot be 0");
        }
        if !self.server.path.starts_with('/') {
            anyhow::bail!(
                "server.path must start with '/' (got '{}')",
                self.server.path
            );
        }

        if self.device.hostname.trim().is_empty() {
            anyhow::bail!("device.hostname cannot be empty");
        }
        if let Some(address) = &self.device.address {
            if address.trim().is_empty() {
                anyhow::bail!("device.address cannot be empty when set");
            }
        }

        if let Some(auth) = &self.auth {
            if auth.user.is_empty() {
                anyhow::bail!("auth.user cannot be empty");
            }
            if auth.user.contains(':') {
                anyhow::bail!("auth.user cannot contain ':'");
            }
        }

        Ok(())
    }

    /// Expected `Authorization` header, if auth is configured
    pub fn authorization_header(&self) -> Option<String> {
        self.auth
            .as_ref()
            .map(|auth| basic_auth_header(&auth.user, &auth.password))
    }

    /// Listener settings for the WebSocket server
    pub fn ws_server_config(&self) -> WsServerConfig {
        WsServerConfig {
            bind: self.server.bind,
            port: self.server.port,
            path: self.server.path.clone(),
            authorization: self.authorization_header(),
        }
    }

    /// True if the listener must be restarted to apply `other`
    pub fn server_changed(&self, other: &AppConfig) -> bool {
        self.server != other.server
    }
}

// Default value functions
fn default_bind() -> IpAddr { IpAddr::V4(Ipv4Addr::UNSPECIFIED) }
fn default_port() -> u16 { 8081 }
fn default_path() -> String { "/".to_string() }
fn default_hostname() -> String { "padlink".to_string() }
fn default_true() -> bool { true }
