//! Deployment configuration loaded from the process environment.
//!
//! Every variable is optional. A value that is missing, empty, or does not
//! parse for its type falls back to the default; nothing here returns an
//! error.

use std::env;
use std::str::FromStr;

pub const ENV_PORT: &str = "PORT";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
pub const ENV_MAX_FILE_SIZE: &str = "MAX_FILE_SIZE";
pub const ENV_WORKERS: &str = "WORKERS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: String,
    pub log_level: String,
    /// Largest accepted upload, in bytes.
    pub max_file_size: u64,
    /// Concurrent document-processing permits.
    pub workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            log_level: default_log_level(),
            max_file_size: default_max_file_size(),
            workers: default_workers(),
        }
    }
}

impl Config {
    /// Read configuration from the process environment.
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same rules as [`Config::load`] over an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        Self {
            port: get(ENV_PORT).unwrap_or_else(default_port),
            log_level: get(ENV_LOG_LEVEL).unwrap_or_else(default_log_level),
            max_file_size: parse_or(get(ENV_MAX_FILE_SIZE), default_max_file_size),
            workers: parse_or(get(ENV_WORKERS), default_workers),
        }
    }

    /// Socket address the server binds to.
    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, default: fn() -> T) -> T {
    raw.and_then(|v| v.parse().ok()).unwrap_or_else(default)
}

fn default_port() -> String {
    "8080".into()
}
fn default_log_level() -> String {
    "info".into()
}
fn default_max_file_size() -> u64 {
    50 * 1024 * 1024
}
fn default_workers() -> usize {
    10
}
