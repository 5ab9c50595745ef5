//! Server list configuration.
//!
//! The server list lives in `~/.config/aghctl/config.json`. Earlier versions
//! of the tool described a single server through the `AGHCTL_HOST`,
//! `AGHCTL_USERNAME` and `AGHCTL_PASSWORD` environment variables; those still
//! work as a fallback when the config lists no servers.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Selector meaning "every configured server". Never a valid server name.
pub const RESERVED_SERVER_NAME: &str = "all";

const ENV_HOST: &str = "AGHCTL_HOST";
const ENV_USERNAME: &str = "AGHCTL_USERNAME";
const ENV_PASSWORD: &str = "AGHCTL_PASSWORD";

/// Get the config directory path
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("aghctl"))
}

/// One AdGuard Home instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub name: String,
    /// Host and optional port, without scheme (e.g. "10.0.0.2:3000").
    pub host: String,
    pub username: String,
    pub password: String,
}

/// The servers one command invocation will contact.
///
/// `Single` is also produced when the reserved selector matches exactly one
/// configured server; only a real fan-out gets the aggregated report shape.
#[derive(Debug)]
pub enum TargetSet {
    Single(ServerConfig),
    Many(Vec<ServerConfig>),
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub servers: Vec<ServerConfig>,
}

impl Config {
    /// Load config.json, falling back to the legacy environment variables
    pub fn load() -> Result<Self> {
        let path = config_dir()?.join("config.json");
        let mut config = Self::load_from(&path)?;

        if config.servers.is_empty()
            && let Some(legacy) = legacy_server_from_env()
        {
            log::debug!("no servers configured, using {} from environment", ENV_HOST);
            config.servers.push(legacy);
        }

        Ok(config)
    }

    fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            fs::read_to_string(path).with_context(|| format!("Could not read {}", path.display()))?;
        serde_json::from_str(&content).context("Invalid config.json format")
    }

    /// Save config.json
    pub fn save(&self) -> Result<()> {
        let path = config_dir()?.join("config.json");
        self.save_to(&path)
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Find a server by name
    pub fn find_server(&self, name: &str) -> Option<&ServerConfig> {
        self.servers.iter().find(|s| s.name == name)
    }

    /// Add a new server
    pub fn add_server(&mut self, server: ServerConfig) -> Result<()> {
        if server.name.is_empty()
            || server.host.is_empty()
            || server.username.is_empty()
            || server.password.is_empty()
        {
            bail!("All server fields are required");
        }
        if server.name == RESERVED_SERVER_NAME {
            bail!("'{}' is a reserved server name", RESERVED_SERVER_NAME);
        }
        if self.find_server(&server.name).is_some() {
            bail!("Server '{}' already exists", server.name);
        }

        self.servers.push(server);
        self.servers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(())
    }

    /// Remove a server by name
    pub fn remove_server(&mut self, name: &str) -> bool {
        let len_before = self.servers.len();
        self.servers.retain(|s| s.name != name);
        self.servers.len() < len_before
    }

    /// Resolve a `--server` selector into the servers to contact.
    ///
    /// The reserved name selects every configured server, degrading to a
    /// single target when only one is configured. Any other selector must
    /// match a configured server name exactly.
    pub fn resolve(&self, selector: &str) -> Result<TargetSet> {
        if selector == RESERVED_SERVER_NAME {
            return match self.servers.as_slice() {
                [] => bail!("No servers configured. Run 'aghctl server add' first."),
                [only] => Ok(TargetSet::Single(only.clone())),
                _ => Ok(TargetSet::Many(self.servers.clone())),
            };
        }

        match self.find_server(selector) {
            Some(server) => Ok(TargetSet::Single(server.clone())),
            None => bail!("Server '{}' not found in config", selector),
        }
    }
}

fn legacy_server_from_env() -> Option<ServerConfig> {
    let host = std::env::var(ENV_HOST).ok().filter(|v| !v.is_empty())?;
    Some(ServerConfig {
        name: "default".to_string(),
        host,
        username: std::env::var(ENV_USERNAME).unwrap_or_default(),
        password: std::env::var(ENV_PASSWORD).unwrap_or_default(),
    })
}

// ============================================================================
// Tests
// ============================================================================
