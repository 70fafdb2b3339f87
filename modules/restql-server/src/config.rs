use std::path::Path;

use anyhow::{Context, Result};
use restql_core::BridgeConfig;
use serde::Deserialize;

/// TOML-backed server configuration. Every table is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub server: ServerConfig,
    pub graphql: GraphqlConfig,
    pub rest: BridgeConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Empty allows any origin.
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8005,
            allowed_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraphqlConfig {
    pub limit_depth: usize,
    pub limit_complexity: usize,
    /// Serve the GraphiQL IDE on `GET /graphql`.
    pub graphiql: bool,
}

impl Default for GraphqlConfig {
    fn default() -> Self {
        Self {
            limit_depth: 10,
            limit_complexity: 1000,
            graphiql: true,
        }
    }
}

impl FileConfig {
    /// Apply `RESTQL_HOST` / `RESTQL_PORT` on top of the file values.
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("RESTQL_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("RESTQL_PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("RESTQL_PORT is not a valid port: {port}"))?;
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Load and parse a TOML config file.
pub fn load_config(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

pub fn parse_config(content: &str) -> Result<FileConfig> {
    Ok(toml::from_str(content)?)
}
