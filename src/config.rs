//! Configuration loader and validator for the product card service.
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Root configuration struct mirroring the YAML schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub server: Server,
    pub tablecrm: TableCrm,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Server {
    pub listen: String,
}

/// Where the access token goes on the outbound nomenclature request.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenPlacement {
    /// `?token=<token>` on the endpoint URL.
    #[default]
    Query,
    /// `Authorization: Bearer <token>`.
    Bearer,
    /// Bearer header first, then a single retry with the query parameter.
    BearerThenQuery,
}

impl TokenPlacement {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenPlacement::Query => "query",
            TokenPlacement::Bearer => "bearer",
            TokenPlacement::BearerThenQuery => "bearer_then_query",
        }
    }
}

/// TableCRM API settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableCrm {
    pub base_url: String,
    #[serde(default)]
    pub token_placement: TokenPlacement,
    pub timeout_seconds: u64,
    /// Used when neither the request body nor the query string carries a token.
    #[serde(default)]
    pub default_token: Option<String>,
}

impl Config {
    /// Parsed `server.listen`.
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server
            .listen
            .parse()
            .map_err(|_| ConfigError::Invalid("server.listen must be a socket address"))
    }

    /// Default token with blanks treated as absent.
    pub fn default_token(&self) -> Option<String> {
        self.tablecrm
            .default_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_owned)
    }

    /// Apply `TABLECRM_TOKEN` and `LISTEN_ADDR` from the environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var("TABLECRM_TOKEN").ok(),
            std::env::var("LISTEN_ADDR").ok(),
        );
    }

    fn apply_overrides(&mut self, token: Option<String>, listen: Option<String>) {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.tablecrm.default_token = Some(token);
        }
        if let Some(listen) = listen.filter(|l| !l.trim().is_empty()) {
            self.server.listen = listen;
        }
    }
}

/// Load configuration from a YAML file, apply environment overrides and validate it.
/// - If `path` is None, uses `config.yaml` in the current working directory.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or_else(|| Path::new("config.yaml"));
    let content = fs::read_to_string(path)?;
    let mut cfg: Config = serde_yaml::from_str(&content)?;
    cfg.apply_env_overrides();
    validate(&cfg)?;
    Ok(cfg)
}

/// Validate a configuration instance.
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    cfg.listen_addr()?;

    let base = cfg.tablecrm.base_url.trim();
    if base.is_empty() {
        return Err(ConfigError::Invalid("tablecrm.base_url must be non-empty"));
    }
    let url = reqwest::Url::parse(base)
        .map_err(|_| ConfigError::Invalid("tablecrm.base_url must be an absolute URL"))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Invalid("tablecrm.base_url must use http or https"));
    }
    // Url::join drops the last path segment unless it ends with a slash.
    if !base.ends_with('/') {
        return Err(ConfigError::Invalid("tablecrm.base_url must end with '/'"));
    }

    if cfg.tablecrm.timeout_seconds == 0 {
        return Err(ConfigError::Invalid("tablecrm.timeout_seconds must be > 0"));
    }

    Ok(())
}

/// Returns the example YAML content.
pub fn example() -> &'static str {
    r#"server:
  listen: "127.0.0.1:3000"

tablecrm:
  base_url: "https://app.tablecrm.com/api/"
  # query | bearer | bearer_then_query
  token_placement: "query"
  timeout_seconds: 30
  # Prefer TABLECRM_TOKEN over committing a token here.
  default_token: ""
"#
}
