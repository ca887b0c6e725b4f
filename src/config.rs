use std::time::Duration;

use anyhow::{Error, Result, anyhow};
use dotenvy::dotenv;
use serde::Deserialize;

pub const DEFAULT_UAZAPI_URL: &str = "https://niochat.uazapi.com";

#[derive(Clone, Deserialize, Debug)]
pub struct Config {
    #[serde(default = "default_server_host")]
    pub server_host: String,
    #[serde(default = "default_server_port")]
    pub server_port: u16,

    #[serde(default = "default_uazapi_url")]
    pub uazapi_default_url: String,
    #[serde(default = "default_uazapi_timeout_seconds")]
    pub uazapi_timeout_seconds: u64,

    #[serde(default)]
    pub log_format: LogFormat,
}

#[derive(Clone, Copy, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl Config {
    pub fn load() -> Result<Self, Error> {
        dotenv().ok();

        let config = envy::from_env::<Self>()
            .map_err(|e| anyhow!("Invalid environmental variable: {}", e))?;
        Ok(config)
    }

    pub fn uazapi_timeout(&self) -> Duration {
        Duration::from_secs(self.uazapi_timeout_seconds)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: default_server_host(),
            server_port: default_server_port(),
            uazapi_default_url: default_uazapi_url(),
            uazapi_timeout_seconds: default_uazapi_timeout_seconds(),
            log_format: LogFormat::default(),
        }
    }
}

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    5000
}

fn default_uazapi_url() -> String {
    DEFAULT_UAZAPI_URL.to_string()
}

fn default_uazapi_timeout_seconds() -> u64 {
    30
}
