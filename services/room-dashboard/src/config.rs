//! Configuration types for the room dashboard

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub supabase: SupabaseConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

impl Config {
    /// Replace `${VAR}` placeholders in secret fields with environment values
    pub fn resolve_secrets(&mut self) -> crate::Result<()> {
        self.supabase.api_key = resolve_env_placeholder(&self.supabase.api_key)?;
        Ok(())
    }
}

/// Backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupabaseConfig {
    #[serde(default = "default_supabase_url")]
    pub url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_schema")]
    pub schema: String,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_channel")]
    pub channel: String,
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_seconds: u64,
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: default_supabase_url(),
            api_key: String::new(),
            schema: default_schema(),
            table: default_table(),
            channel: default_channel(),
            heartbeat_interval_seconds: default_heartbeat_interval(),
        }
    }
}

/// Dashboard configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_dashboard_port")]
    pub port: u16,
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_seconds: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: default_dashboard_port(),
            refresh_interval_seconds: default_refresh_interval(),
        }
    }
}

fn default_supabase_url() -> String {
    "http://localhost:54321".to_string()
}

fn default_schema() -> String {
    "public".to_string()
}

fn default_table() -> String {
    "room_states".to_string()
}

fn default_channel() -> String {
    "room_updates".to_string()
}

fn default_heartbeat_interval() -> u64 {
    25
}

fn default_true() -> bool {
    true
}

fn default_dashboard_port() -> u16 {
    11120
}

fn default_refresh_interval() -> u64 {
    5
}

fn resolve_env_placeholder(value: &str) -> crate::Result<String> {
    match value
        .strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
    {
        Some(var) => std::env::var(var).map_err(|_| {
            crate::DashboardError::Config(format!("Environment variable {} is not set", var))
        }),
        None => Ok(value.to_string()),
    }
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::DashboardError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}
