//! Daemon settings: an optional `minermon.toml` plus `MINERMON_*` variables.
//!
//! Precedence, lowest first: built-in defaults, the TOML file, the
//! environment. `MINERMON_CONFIG` picks another file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// File read when `MINERMON_CONFIG` is unset.
pub const DEFAULT_PATH: &str = "minermon.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub dashboard: DashboardConfig,
    pub device: DeviceConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to listen on.
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives.
    pub filter: String,
}

/// Where the compiled dashboard lives.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Directory served at `/`. Only the API is served when unset.
    pub assets: Option<PathBuf>,
}

/// Simulated device settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Registry capacity reported to the dashboard.
    pub max_sensors: usize,
}

impl Config {
    /// Read the file named by `MINERMON_CONFIG` (or [`DEFAULT_PATH`]), then
    /// apply the process environment.
    ///
    /// # Errors
    ///
    /// Fails when the file exists but cannot be read or parsed, or when the
    /// merged settings are invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os("MINERMON_CONFIG")
            .map_or_else(|| PathBuf::from(DEFAULT_PATH), PathBuf::from);
        let mut config = Self::read(&path)?;
        config.override_with(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse `path`. A missing file yields the defaults.
    fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    ///
    /// `RUST_LOG` wins over `MINERMON_LOG`; `MINERMON_BIND` (`host:port`)
    /// wins over `MINERMON_HOST` and `MINERMON_PORT`. Unparsable ports are
    /// ignored.
    fn override_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup("MINERMON_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("MINERMON_PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        if let Some(bind) = lookup("MINERMON_BIND")
            && let Some((host, port)) = bind.rsplit_once(':')
            && let Ok(port) = port.parse()
        {
            self.server.host = host.to_string();
            self.server.port = port;
        }
        if let Some(dir) = lookup("MINERMON_ASSETS") {
            self.dashboard.assets = Some(PathBuf::from(dir));
        }
        if let Some(filter) = lookup("RUST_LOG").or_else(|| lookup("MINERMON_LOG")) {
            self.logging.filter = filter;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let problem = if self.server.port == 0 {
            Some("server.port must be non-zero".to_string())
        } else if self.device.max_sensors == 0 {
            Some("device.max_sensors must be non-zero".to_string())
        } else {
            self.dashboard
                .assets
                .as_ref()
                .filter(|dir| !dir.is_dir())
                .map(|dir| format!("dashboard.assets is not a directory: {}", dir.display()))
        };
        problem.map_or(Ok(()), |msg| Err(ConfigError::Validation(msg)))
    }

    /// Address handed to the TCP listener.
    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "minermond=info,minermon=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self { max_sensors: 10 }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid configuration: {0}")]
    Validation(String),
}
