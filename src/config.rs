// ⚙️ Configuration - environment variables with defaults

use anyhow::{anyhow, Context as _, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://brasilapi.com.br/api/cnpj/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:3000";

pub const ENV_API_BASE_URL: &str = "CNPJ_API_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "CNPJ_HTTP_TIMEOUT_SECS";
pub const ENV_SERVER_ADDR: &str = "CNPJ_SERVER_ADDR";
pub const ENV_LOG_FILE: &str = "CNPJ_LOOKUP_LOG_FILE";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Registry endpoint, without trailing slash. The CNPJ is appended as a path segment.
    pub api_base_url: String,
    pub timeout: Duration,
    pub server_addr: SocketAddr,
    /// TUI only: where to append logs, since the terminal is taken
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key → value source (used by tests)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_base_url = get(ENV_API_BASE_URL)
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();

        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(anyhow!("{} must be an http(s) URL, got {:?}", ENV_API_BASE_URL, api_base_url));
        }

        let timeout_secs = match get(ENV_TIMEOUT_SECS) {
            Some(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("{} must be a whole number of seconds, got {:?}", ENV_TIMEOUT_SECS, raw))?;
                if secs == 0 {
                    return Err(anyhow!("{} must be greater than zero", ENV_TIMEOUT_SECS));
                }
                secs
            }
            None => DEFAULT_TIMEOUT_SECS,
        };

        let server_addr = get(ENV_SERVER_ADDR)
            .unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string());
        let server_addr: SocketAddr = server_addr
            .trim()
            .parse()
            .with_context(|| format!("{} must be host:port, got {:?}", ENV_SERVER_ADDR, server_addr))?;

        Ok(Config {
            api_base_url,
            timeout: Duration::from_secs(timeout_secs),
            server_addr,
            log_file: get(ENV_LOG_FILE).map(PathBuf::from),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            server_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            log_file: None,
        }
    }
}
