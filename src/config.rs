//! Configuration parsing and validation.
//!
//! MediFind reads an optional TOML file. Every section and key has a
//! default, so an empty file (or no file at all) yields a working server on
//! `127.0.0.1:4000` backed by the bundled mock data.
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1:4000"
//! cors_origin = "*"
//!
//! [data]
//! dir = "./data"
//! ```
//!
//! # Environment overrides
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `PORT` | Replaces the port of `server.bind`, keeping the host |
//! | `CORS_ORIGIN` | Replaces `server.cors_origin` |

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub data: DataConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// `"*"` allows any origin; anything else is a single exact origin.
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            cors_origin: default_cors_origin(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:4000".to_string()
}

fn default_cors_origin() -> String {
    "*".to_string()
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DataConfig {
    /// Directory holding `pharmacies.json`, `medicines.json` and
    /// `inventory.json`. The embedded mock data is used when unset.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind
            .parse()
            .with_context(|| format!("server.bind is not a socket address: {}", self.bind))
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origin.trim() == "*"
    }
}

/// Read, parse, override from the environment, and validate a config file.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config = parse_config(&content)?;
    finish(config, |key| std::env::var(key).ok())
}

/// Like [`load_config`], but a missing file yields the defaults.
pub fn load_config_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        finish(Config::default(), |key| std::env::var(key).ok())
    }
}

pub fn parse_config(content: &str) -> Result<Config> {
    toml::from_str(content).with_context(|| "Failed to parse config file")
}

fn finish(mut config: Config, env: impl Fn(&str) -> Option<String>) -> Result<Config> {
    apply_env_overrides(&mut config, env)?;
    validate(&config)?;
    Ok(config)
}

/// Apply `PORT` and `CORS_ORIGIN` from `env` onto `config`.
pub fn apply_env_overrides(
    config: &mut Config,
    env: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(port) = env("PORT").filter(|p| !p.trim().is_empty()) {
        let port: u16 = port
            .trim()
            .parse()
            .with_context(|| format!("PORT is not a valid port number: {}", port))?;
        let mut addr = config.server.socket_addr()?;
        addr.set_port(port);
        config.server.bind = addr.to_string();
    }
    if let Some(origin) = env("CORS_ORIGIN").filter(|o| !o.trim().is_empty()) {
        config.server.cors_origin = origin.trim().to_string();
    }
    Ok(())
}

pub fn validate(config: &Config) -> Result<()> {
    config.server.socket_addr()?;

    if config.server.cors_origin.trim().is_empty() {
        bail!("server.cors_origin must not be empty");
    }

    if let Some(dir) = &config.data.dir {
        if !dir.is_dir() {
            bail!("data.dir is not a directory: {}", dir.display());
        }
    }

    Ok(())
}
