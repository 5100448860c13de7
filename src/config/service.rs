// src/config/service.rs
use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_CONFIG_PATH: &str = "CONFIG_PATH";
const FALLBACK_FILES: [&str; 2] = ["config.toml", "config.json"];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ElasticConfig {
    pub cluster: String,
    pub user: String,
    pub password: String,
    pub index: String,
}

impl Default for ElasticConfig {
    fn default() -> Self {
        Self {
            cluster: "http://localhost:9200".to_string(),
            user: "elastic".to_string(),
            password: "changeme".to_string(),
            index: "content-search-default".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ContentApiConfig {
    /// Endpoint prefix; the content id is appended verbatim.
    pub host: String,
    pub user: String,
    pub pass: String,
}

impl Default for ContentApiConfig {
    fn default() -> Self {
        Self {
            host: "https://frank-ecs-production.up.welt.de/content/".to_string(),
            user: "user".to_string(),
            pass: "thisisnotapassword".to_string(),
        }
    }
}

/// Process-wide settings, built once in `main` and handed to each component.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub elastic: ElasticConfig,
    pub api: ContentApiConfig,
    /// Request deadline in milliseconds, shared by lookup and search.
    pub timeout: u64,
    pub port: u16,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            elastic: ElasticConfig::default(),
            api: ContentApiConfig::default(),
            timeout: 500,
            port: 5000,
        }
    }
}

impl ServiceConfig {
    /// Defaults, then the optional config file, then env overrides:
    /// 1) $CONFIG_PATH (must exist when set)
    /// 2) ./config.toml
    /// 3) ./config.json
    pub fn load() -> Result<Self> {
        let mut cfg = match config_file_path()? {
            Some(path) => {
                tracing::info!(path = %path.display(), "using config file");
                Self::from_file(&path)?
            }
            None => Self::default(),
        };
        cfg.apply_env(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    /// Load from an explicit path. Supports TOML or JSON; keys missing from the
    /// file keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        parse_config(&content, &ext)
            .with_context(|| format!("parsing config {}", path.display()))
    }

    /// Overlay `ELASTIC_*`, `API_*`, `TIMEOUT` and `PORT` from `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let set = |target: &mut String, key: &str| {
            if let Some(v) = lookup(key) {
                *target = v;
            }
        };
        set(&mut self.elastic.cluster, "ELASTIC_CLUSTER");
        set(&mut self.elastic.user, "ELASTIC_USER");
        set(&mut self.elastic.password, "ELASTIC_PASSWORD");
        set(&mut self.elastic.index, "ELASTIC_INDEX");
        set(&mut self.api.host, "API_HOST");
        set(&mut self.api.user, "API_USER");
        set(&mut self.api.pass, "API_PASS");

        if let Some(raw) = lookup("TIMEOUT") {
            self.timeout = raw
                .trim()
                .parse()
                .map_err(|_| anyhow!("TIMEOUT must be milliseconds, got {raw:?}"))?;
        }
        if let Some(raw) = lookup("PORT") {
            self.port = raw
                .trim()
                .parse()
                .map_err(|_| anyhow!("PORT must be a port number, got {raw:?}"))?;
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }
}

fn config_file_path() -> Result<Option<PathBuf>> {
    if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if !pb.exists() {
            bail!("{ENV_CONFIG_PATH} points to non-existent path {}", pb.display());
        }
        return Ok(Some(pb));
    }
    Ok(FALLBACK_FILES
        .into_iter()
        .map(PathBuf::from)
        .find(|p| p.exists()))
}

fn parse_config(s: &str, hint_ext: &str) -> Result<ServiceConfig> {
    match hint_ext {
        "toml" => Ok(toml::from_str(s)?),
        "json" => Ok(serde_json::from_str(s)?),
        _ => {
            // No usable extension: JSON documents start with '{', anything else is TOML.
            if s.trim_start().starts_with('{') {
                Ok(serde_json::from_str(s)?)
            } else {
                Ok(toml::from_str(s)?)
            }
        }
    }
}
