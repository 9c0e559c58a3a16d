use crate::adb::connection::{DEFAULT_HOST, DEFAULT_PORT};
use log::{debug, warn};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE_NAME: &str = ".adbhost.toml";
const PORT_ENV_VAR: &str = "ANDROID_ADB_SERVER_PORT";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Socket read timeout in milliseconds, 0 for none
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// Friendly names for device serials
    #[serde(default)]
    pub alias: HashMap<String, String>,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_ms: None,
            alias: HashMap::new(),
        }
    }
}

impl Config {
    /// Load `~/.adbhost.toml`, then apply the environment
    pub fn load() -> Self {
        let config = match Config::config_path() {
            Some(path) => Config::load_from_path(&path),
            None => {
                debug!("No home directory, using default config");
                Config::default()
            }
        };
        config.with_port_override(std::env::var(PORT_ENV_VAR).ok().as_deref())
    }

    /// Missing or unparsable files give the defaults
    pub fn load_from_path(path: &Path) -> Self {
        debug!("Loading config from: {:?}", path);

        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => {
                    debug!("Parsed config: {:?}", config);
                    config
                }
                Err(e) => {
                    warn!("Error parsing config file {}: {}", path.display(), e);
                    Config::default()
                }
            },
            Err(_) => {
                debug!("No config file found or unable to read it");
                Config::default()
            }
        }
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
    }

    /// Replace the port with a numeric `ANDROID_ADB_SERVER_PORT` value
    pub fn with_port_override(mut self, value: Option<&str>) -> Self {
        if let Some(value) = value {
            match value.trim().parse::<u16>() {
                Ok(port) => {
                    debug!("Using port {} from {}", port, PORT_ENV_VAR);
                    self.port = port;
                }
                Err(_) => warn!("Ignoring non-numeric {}={:?}", PORT_ENV_VAR, value),
            }
        }
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }

    /// Serial for an alias, or the name itself
    pub fn resolve_alias(&self, name: &str) -> String {
        self.alias
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }
}
