//! Server configuration read from the environment.

use std::env;
use std::net::SocketAddr;

use axum::http::HeaderValue;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5299;
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:4200";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// The one origin allowed to make cross-origin requests.
    pub allowed_origin: HeaderValue,
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            allowed_origin: HeaderValue::from_static(DEFAULT_ALLOWED_ORIGIN),
            log_json: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from an arbitrary variable source. Unset variables
    /// fall back to the defaults; set but unparsable ones are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(host) = lookup("LISTITEMS_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("PORT") {
            config.port = port.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: port.clone(),
            })?;
        }
        if let Some(origin) = lookup("LISTITEMS_ALLOWED_ORIGIN") {
            config.allowed_origin =
                HeaderValue::from_str(origin.trim()).map_err(|_| ConfigError::Invalid {
                    name: "LISTITEMS_ALLOWED_ORIGIN",
                    value: origin.clone(),
                })?;
        }
        if let Some(flag) = lookup("LISTITEMS_LOG_JSON") {
            config.log_json = parse_bool(&flag).ok_or(ConfigError::Invalid {
                name: "LISTITEMS_LOG_JSON",
                value: flag.clone(),
            })?;
        }

        Ok(config)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ConfigError::Invalid {
            name: "LISTITEMS_HOST",
            value: self.host.clone(),
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
        "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
        _ => None,
    }
}
