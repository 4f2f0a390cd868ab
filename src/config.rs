//! Client configuration
//!
//! Server location, endpoint paths and logging settings for the page clients.
//! The browser build uses the defaults (same-origin, stock paths); native
//! drivers load TOML files with environment variable overrides.

use serde::Deserialize;
#[cfg(feature = "native")]
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub endpoints: EndpointsConfig,

    #[serde(default)]
    pub reports: ReportsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the expense server lives
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfig {
    /// Empty means same origin (relative URLs)
    #[serde(default)]
    pub base_url: String,

    /// Unset leaves timeouts to the network stack
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

/// Endpoint paths on the server
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointsConfig {
    #[serde(default = "default_login")]
    pub login: String,

    #[serde(default = "default_logout")]
    pub logout: String,

    #[serde(default = "default_reset_password")]
    pub reset_password: String,

    #[serde(default = "default_delete_expense")]
    pub delete_expense: String,

    #[serde(default = "default_export")]
    pub export: String,

    #[serde(default = "default_reports")]
    pub reports: String,
}

fn default_login() -> String {
    "/login".to_string()
}

fn default_logout() -> String {
    "/logout".to_string()
}

fn default_reset_password() -> String {
    "/reset-password".to_string()
}

fn default_delete_expense() -> String {
    "/delete-expense".to_string()
}

fn default_export() -> String {
    "/export".to_string()
}

fn default_reports() -> String {
    "/reports".to_string()
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            login: default_login(),
            logout: default_logout(),
            reset_password: default_reset_password(),
            delete_expense: default_delete_expense(),
            export: default_export(),
            reports: default_reports(),
        }
    }
}

/// Reports page settings
#[derive(Debug, Clone, Deserialize)]
pub struct ReportsConfig {
    #[serde(default = "default_period")]
    pub default_period: String,
}

fn default_period() -> String {
    crate::protocol::Period::DEFAULT.to_string()
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            default_period: default_period(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

#[cfg(feature = "native")]
impl ClientConfig {
    /// Parse a TOML file; missing sections take their defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Defaults plus `TALLY_*` overrides, no file
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        Ok(Self::load(path)?.with_env_overrides())
    }

    /// Candidate files in lookup order
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::with_capacity(3);
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("tally").join("config.toml"));
        }
        paths.push(PathBuf::from("/etc/tally/config.toml"));
        paths.push(PathBuf::from("./tally.toml"));
        paths
    }

    /// First readable file from [`search_paths`](Self::search_paths), else
    /// environment only. A file that fails to parse is skipped with a warning.
    pub fn load_default() -> Self {
        let found = Self::search_paths()
            .into_iter()
            .filter(|path| path.is_file())
            .find_map(|path| match Self::load_with_env(&path) {
                Ok(config) => {
                    tracing::info!(path = %path.display(), "Config loaded");
                    Some(config)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping config file");
                    None
                }
            });

        found.unwrap_or_else(|| {
            tracing::debug!("No config file found, using defaults");
            Self::from_env()
        })
    }

    fn with_env_overrides(mut self) -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

        if let Some(base_url) = var("TALLY_BASE_URL") {
            self.server.base_url = base_url;
        }
        if let Some(secs) = var("TALLY_REQUEST_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.server.request_timeout_secs = Some(secs);
        }
        if let Some(level) = var("TALLY_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("TALLY_LOG_FORMAT") {
            self.logging.format = format;
        }
        self
    }
}

#[cfg(feature = "native")]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {}: {error}", path.display())]
    Io { path: PathBuf, error: String },

    #[error("invalid config in {}: {error}", path.display())]
    Parse { path: PathBuf, error: String },
}

/// Commented TOML with every setting at its default
pub fn generate_default_config() -> String {
    r#"# Tally Configuration
#
# Environment variables override these settings:
# - TALLY_BASE_URL
# - TALLY_REQUEST_TIMEOUT_SECS
# - TALLY_LOG_LEVEL
# - TALLY_LOG_FORMAT

[server]
# Expense server URL (empty = same origin, used by the browser build)
base_url = "http://localhost:5000"

# Request timeout in seconds (omit to leave it to the network stack)
# request_timeout_secs = 30

[endpoints]
login = "/login"
logout = "/logout"
reset_password = "/reset-password"
delete_expense = "/delete-expense"
export = "/export"
reports = "/reports"

[reports]
# Period used when the page URL carries none
default_period = "month"

[logging]
# trace | debug | info | warn | error (RUST_LOG takes precedence)
level = "info"

# pretty | json
format = "pretty"
"#
    .to_string()
}
