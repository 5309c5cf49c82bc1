//! Bootstrap configuration loading
//!
//! The console has no database; everything it needs at startup comes from
//! four tiers, highest priority first:
//! 1. Command-line arguments
//! 2. Environment variables (`D2I_BACKEND_URL`, `D2I_LISTEN_ADDR`, `D2I_LOCALE`)
//! 3. TOML config file
//! 4. Compiled defaults
//!
//! A missing or unreadable TOML file never aborts startup: it is logged and
//! the lower tiers take over.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

pub const ENV_BACKEND_URL: &str = "D2I_BACKEND_URL";
pub const ENV_LISTEN_ADDR: &str = "D2I_LISTEN_ADDR";
pub const ENV_LOCALE: &str = "D2I_LOCALE";

const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8090";
const DEFAULT_LOCALE: &str = "de";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Configuration file contents
///
/// Every field is optional so a partial file only overrides what it names.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct TomlConfig {
    /// Base URL of the disk2iso backend API
    #[serde(default)]
    pub backend_url: Option<String>,

    /// Socket address the console listens on
    #[serde(default)]
    pub listen_addr: Option<String>,

    /// UI locale ("de" or "en")
    #[serde(default)]
    pub locale: Option<String>,

    /// Disambiguation poll interval in seconds
    #[serde(default)]
    pub poll_interval_secs: Option<u64>,

    /// Backend request timeout in seconds
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Fully resolved console configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleConfig {
    pub backend_url: String,
    pub listen_addr: String,
    pub locale: String,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub log_level: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            log_level: default_log_level(),
        }
    }
}

/// Values supplied on the command line (tier 1)
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub backend_url: Option<String>,
    pub listen_addr: Option<String>,
    pub locale: Option<String>,
    /// Explicit config file; skips the platform search when set
    pub config_file: Option<PathBuf>,
}

/// Resolves [`ConsoleConfig`] from the four configuration tiers
pub struct ConfigResolver {
    overrides: ConfigOverrides,
}

impl ConfigResolver {
    pub fn new(overrides: ConfigOverrides) -> Self {
        Self { overrides }
    }

    /// Resolve the configuration. Never fails; bad inputs fall back to defaults.
    pub fn resolve(&self) -> ConsoleConfig {
        let toml_config = self.load_toml().unwrap_or_default();
        let defaults = ConsoleConfig::default();

        let backend_url = first_valid(
            [
                self.overrides.backend_url.clone(),
                std::env::var(ENV_BACKEND_URL).ok(),
                toml_config.backend_url.clone(),
            ],
            |url| {
                let ok = is_valid_backend_url(url);
                if !ok {
                    warn!("Ignoring invalid backend URL {:?}", url);
                }
                ok
            },
        )
        .map(|url| url.trim_end_matches('/').to_string())
        .unwrap_or(defaults.backend_url);

        let listen_addr = pick(
            self.overrides.listen_addr.clone(),
            ENV_LISTEN_ADDR,
            toml_config.listen_addr.clone(),
        )
        .unwrap_or(defaults.listen_addr);

        let locale = pick(
            self.overrides.locale.clone(),
            ENV_LOCALE,
            toml_config.locale.clone(),
        )
        .unwrap_or(defaults.locale);

        let poll_interval = match toml_config.poll_interval_secs {
            Some(0) => {
                warn!("poll_interval_secs = 0 is not allowed, using default");
                defaults.poll_interval
            }
            Some(secs) => Duration::from_secs(secs),
            None => defaults.poll_interval,
        };

        let request_timeout = toml_config
            .request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        ConsoleConfig {
            backend_url,
            listen_addr,
            locale,
            poll_interval,
            request_timeout,
            log_level: toml_config.logging.level,
        }
    }

    fn load_toml(&self) -> Option<TomlConfig> {
        let path = match &self.overrides.config_file {
            Some(path) => path.clone(),
            None => locate_config_file()?,
        };

        match load_toml_config(&path) {
            Ok(config) => {
                info!("Loaded console config from {}", path.display());
                Some(config)
            }
            Err(e) => {
                warn!("{} - continuing with defaults", e);
                None
            }
        }
    }
}

/// CLI value first, then the environment variable, then the TOML value
fn pick(cli: Option<String>, env_var: &str, toml: Option<String>) -> Option<String> {
    first_valid([cli, std::env::var(env_var).ok(), toml], |_| true)
}

/// First tier whose trimmed, non-empty value passes `valid`
fn first_valid<const N: usize>(
    tiers: [Option<String>; N],
    mut valid: impl FnMut(&str) -> bool,
) -> Option<String> {
    tiers
        .into_iter()
        .flatten()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .find(|v| valid(v))
}

fn is_valid_backend_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| Error::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Find the config file: `~/.config/disk2iso/console.toml`, then `/etc/disk2iso/console.toml`
pub fn locate_config_file() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("disk2iso").join("console.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    let system_config = PathBuf::from("/etc/disk2iso/console.toml");
    if cfg!(unix) && system_config.exists() {
        return Some(system_config);
    }

    None
}
