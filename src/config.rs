use anyhow::{Context, Result};
use std::time::Duration;

pub const DEFAULT_CLOUD_PIPELINE_URL: &str =
    "https://meity-auth.ulcacontrib.org/ulca/apis/v0/model/getModelsPipeline";
pub const DEFAULT_CLOUD_PIPELINE_ID: &str = "64392f96daac500b55c543cd";

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub host: String,
    pub port: u16,
    pub api_key: Option<String>,

    // Cloud pipeline
    pub cloud_pipeline_url: String,
    pub cloud_pipeline_id: String,
    pub cloud_user_id: String,
    pub cloud_api_key: String,

    // Offline engine
    pub argos_translate_bin: String,
    pub argospm_bin: String,

    // Limits
    pub request_timeout_secs: u64,
    pub install_timeout_secs: u64,
    pub translation_cache_capacity: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Server
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_or("PORT", 8080),
            api_key: std::env::var("API_KEY").ok().filter(|k| !k.is_empty()),

            // Cloud pipeline
            cloud_pipeline_url: std::env::var("CLOUD_PIPELINE_URL")
                .unwrap_or_else(|_| DEFAULT_CLOUD_PIPELINE_URL.to_string()),
            cloud_pipeline_id: std::env::var("CLOUD_PIPELINE_ID")
                .unwrap_or_else(|_| DEFAULT_CLOUD_PIPELINE_ID.to_string()),
            cloud_user_id: std::env::var("CLOUD_USER_ID").context("CLOUD_USER_ID not set")?,
            cloud_api_key: std::env::var("CLOUD_API_KEY").context("CLOUD_API_KEY not set")?,

            // Offline engine
            argos_translate_bin: std::env::var("ARGOS_TRANSLATE_BIN")
                .unwrap_or_else(|_| "argos-translate".to_string()),
            argospm_bin: std::env::var("ARGOSPM_BIN").unwrap_or_else(|_| "argospm".to_string()),

            // Limits
            request_timeout_secs: parse_or("REQUEST_TIMEOUT_SECS", 30),
            install_timeout_secs: parse_or("INSTALL_TIMEOUT_SECS", 600),
            translation_cache_capacity: parse_or("TRANSLATION_CACHE_CAPACITY", 128),
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn install_timeout(&self) -> Duration {
        Duration::from_secs(self.install_timeout_secs)
    }
}

fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
