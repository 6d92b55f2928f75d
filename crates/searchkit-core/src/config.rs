//! Lightweight configuration loader.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! and exposes the typed engine connection settings under the `engine` key.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_SERVER: &str = "127.0.0.1:9200";

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.validate()?;
        Ok(config)
    }

    /// Loads a single TOML file, skipping the environment layers.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            anyhow::bail!("config file {} does not exist", path.display());
        }
        let config = Self { figment: Figment::new().merge(Toml::file(path)) };
        config.validate()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Like `get`, but an absent key yields `default`. A key that is present
    /// and fails to deserialize is still an error.
    pub fn get_or<T>(&self, key: &str, default: T) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        if self.figment.find_value(key).is_err() {
            return Ok(default);
        }
        self.get(key)
    }

    /// Engine settings; a missing `engine` table yields the defaults.
    pub fn engine(&self) -> anyhow::Result<EngineConfig> {
        self.get_or("engine", EngineConfig::default())
    }

    fn validate(&self) -> anyhow::Result<()> {
        let engine = self.engine()?;
        if engine.servers.is_empty() {
            anyhow::bail!("engine.servers must name at least one server");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    #[default]
    Http,
    Https,
}

impl Transport {
    pub fn scheme(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

/// Either `servers = "host:9200"` or `servers = ["a:9200", "b:9200"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Servers {
    One(String),
    Many(Vec<String>),
}

impl Servers {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            Self::One(s) => vec![s.clone()],
            Self::Many(v) => v.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::One(s) => s.trim().is_empty(),
            Self::Many(v) => v.iter().all(|s| s.trim().is_empty()),
        }
    }
}

impl Default for Servers {
    fn default() -> Self {
        Self::One(DEFAULT_SERVER.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub servers: Servers,
    #[serde(default)]
    pub transport: Transport,
    /// Logs full request and response bodies at DEBUG level.
    #[serde(default)]
    pub trace: bool,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl EngineConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Base URLs with the transport scheme applied to bare `host:port` entries.
    pub fn base_urls(&self) -> Vec<String> {
        self.servers
            .to_vec()
            .into_iter()
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .map(|s| if s.contains("://") { s } else { format!("{}://{}", self.transport.scheme(), s) })
            .collect()
    }
}
