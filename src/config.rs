//! Configuration loading for searchd-client.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;

use crate::index::IndexMap;

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    9312
}

/// Top-level configuration loaded from config.toml.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub searchd: SearchdConfig,

    /// Logical index labels mapped to the physical index names defined in
    /// the daemon's own configuration.
    #[serde(default)]
    pub indexes: BTreeMap<String, String>,

    /// Fail instead of returning empty results when no label resolves.
    #[serde(default)]
    pub strict_indexes: bool,
}

/// Where the search daemon listens.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchdConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// UNIX socket path; takes precedence over host/port when set.
    #[serde(default)]
    pub socket: Option<PathBuf>,
}

/// Resolved daemon address for backend constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchdAddr {
    Tcp { host: String, port: u16 },
    Unix(PathBuf),
}

impl Default for SearchdConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            socket: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            searchd: SearchdConfig::default(),
            indexes: BTreeMap::new(),
            strict_indexes: false,
        }
    }
}

impl SearchdConfig {
    /// The address a backend should connect to.
    #[must_use]
    pub fn addr(&self) -> SearchdAddr {
        match &self.socket {
            Some(socket) => SearchdAddr::Unix(socket.clone()),
            None => SearchdAddr::Tcp {
                host: self.host.clone(),
                port: self.port,
            },
        }
    }
}

impl Config {
    /// Load config from ~/.config/searchd-client/config.toml, or return
    /// defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> anyhow::Result<Self> {
        if let Some(path) = Self::config_path()
            && path.exists()
        {
            return Self::from_path(&path);
        }
        Ok(Config::default())
    }

    /// Load config from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "searchd-client")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// The label resolution map for a [`crate::client::SearchClient`].
    #[must_use]
    pub fn index_map(&self) -> IndexMap {
        IndexMap::new(self.indexes.clone())
    }
}
