//! Configuration loading: a YAML file plus environment variable
//! overrides (spec.md §6). Grounded on
//! `original_source/{producer,core}/config/config.go`'s `cleanenv` +
//! `godotenv` layering, reworked so a missing required field is a
//! typed [`ConfigError`] rather than a panic.

use std::env;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    ParseYaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("required config field is missing: {0}")]
    MissingField(&'static str),
    #[error("config field {field} has invalid value: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct EthNodeConfig {
    pub http_url: Option<String>,
    pub ws_url: Option<String>,
    pub api_key: Option<String>,
    pub trace_enabled: bool,
}

impl EthNodeConfig {
    /// Applies `ETH_HTTP_NODE_RPC` / `ETH_WS_NODE_RPC` / `ETH_RPC_KEY`
    /// environment overrides on top of whatever the YAML file set.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("ETH_HTTP_NODE_RPC") {
            self.http_url = Some(v);
        }
        if let Ok(v) = env::var("ETH_WS_NODE_RPC") {
            self.ws_url = Some(v);
        }
        if let Ok(v) = env::var("ETH_RPC_KEY") {
            self.api_key = Some(v);
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.http_url.is_none() {
            return Err(ConfigError::MissingField("eth_node.http_url"));
        }
        if self.ws_url.is_none() {
            return Err(ConfigError::MissingField("eth_node.ws_url"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Dev,
    Prod,
}

impl Default for Stage {
    fn default() -> Self {
        Self::Dev
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    pub worker_count: u32,
    pub block_start_number: Option<String>,
    pub stage: Stage,
}

impl ServerConfig {
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("APP_WORKER") {
            if let Ok(n) = v.parse() {
                self.worker_count = n;
            }
        }
        if let Ok(v) = env::var("APP_STAGE") {
            self.stage = match v.as_str() {
                "prod" => Stage::Prod,
                _ => Stage::Dev,
            };
        }
        if let Ok(v) = env::var("BLOCK_START_NUMBER") {
            self.block_start_number = Some(v);
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_count == 0 {
            return Err(ConfigError::InvalidField {
                field: "server.worker_count",
                reason: "must be >= 1".to_string(),
            });
        }
        if self.block_start_number.is_none() {
            return Err(ConfigError::MissingField("server.block_start_number"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct UrlConfig {
    pub url: Option<String>,
}

impl UrlConfig {
    fn apply_env_override(&mut self, var: &str) {
        if let Ok(v) = env::var(var) {
            self.url = Some(v);
        }
    }

    fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        if self.url.is_none() {
            return Err(ConfigError::MissingField(field));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ProducerConfig {
    pub server: ServerConfig,
    pub eth_node: EthNodeConfig,
    pub broker: UrlConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CoreConfig {
    pub server: ServerConfig,
    pub broker: UrlConfig,
    pub kv: UrlConfig,
    pub rdbms: UrlConfig,
}

/// Loads a `.env` file at `env_path` (if present), then reads and
/// parses the YAML document at `config_path`.
fn load_yaml<T: for<'de> Deserialize<'de> + Default>(
    config_path: &Path,
    env_path: &Path,
) -> Result<T, ConfigError> {
    if env_path.exists() {
        let _ = dotenvy::from_path(env_path);
    }

    let raw = std::fs::read_to_string(config_path).map_err(|source| ConfigError::ReadFile {
        path: config_path.display().to_string(),
        source,
    })?;

    serde_yaml::from_str(&raw).map_err(|source| ConfigError::ParseYaml {
        path: config_path.display().to_string(),
        source,
    })
}

impl ProducerConfig {
    pub fn load(config_path: &Path, env_path: &Path) -> Result<Self, ConfigError> {
        let mut cfg: Self = load_yaml(config_path, env_path)?;
        cfg.server.apply_env_overrides();
        cfg.eth_node.apply_env_overrides();
        cfg.broker.apply_env_override("RMQ_URL");
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.eth_node.validate()?;
        self.broker.validate("broker.url")?;
        Ok(())
    }
}

impl CoreConfig {
    pub fn load(config_path: &Path, env_path: &Path) -> Result<Self, ConfigError> {
        let mut cfg: Self = load_yaml(config_path, env_path)?;
        cfg.server.apply_env_overrides();
        cfg.broker.apply_env_override("RMQ_URL");
        cfg.kv.apply_env_override("REDIS_URL");
        cfg.rdbms.apply_env_override("PG_URL");
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.broker.validate("broker.url")?;
        self.kv.validate("kv.url")?;
        self.rdbms.validate("rdbms.url")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_producer_config_from_yaml() {
        let yaml = write_temp(
            r#"
server:
  worker_count: 4
  block_start_number: "1000"
  stage: prod
eth_node:
  http_url: "https://rpc.example.com"
  ws_url: "wss://rpc.example.com"
  trace_enabled: true
broker:
  url: "amqp://localhost:5672"
"#,
        );
        let empty_env = tempfile::NamedTempFile::new().unwrap();

        let cfg = ProducerConfig::load(yaml.path(), empty_env.path()).unwrap();
        assert_eq!(cfg.server.worker_count, 4);
        assert_eq!(cfg.server.stage, Stage::Prod);
        assert!(cfg.eth_node.trace_enabled);
        assert_eq!(cfg.broker.url.as_deref(), Some("amqp://localhost:5672"));
    }

    #[test]
    fn missing_required_field_is_a_typed_error_not_a_panic() {
        let yaml = write_temp(
            r#"
server:
  worker_count: 1
  block_start_number: "0"
eth_node:
  http_url: "https://rpc.example.com"
"#,
        );
        let empty_env = tempfile::NamedTempFile::new().unwrap();

        let err = ProducerConfig::load(yaml.path(), empty_env.path()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }

    #[test]
    fn worker_count_of_zero_is_rejected() {
        let yaml = write_temp(
            r#"
server:
  worker_count: 0
  block_start_number: "0"
eth_node:
  http_url: "https://rpc.example.com"
  ws_url: "wss://rpc.example.com"
broker:
  url: "amqp://localhost:5672"
"#,
        );
        let empty_env = tempfile::NamedTempFile::new().unwrap();

        let err = ProducerConfig::load(yaml.path(), empty_env.path()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidField { field: "server.worker_count", .. }
        ));
    }
}
