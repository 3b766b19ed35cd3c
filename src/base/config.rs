//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, sync::Arc};

use serde::Deserialize;

use super::types::{GenerationOptions, Res};

/// Default Gemini model to use
fn default_gemini_model() -> String {
    "gemini-1.5-flash".to_string()
}

/// Default Gemini REST endpoint
fn default_gemini_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

/// Default sampling temperature (deterministic)
fn default_gemini_temperature() -> f32 {
    0.0
}

/// Default max output tokens for the Gemini model
fn default_gemini_max_output_tokens() -> u32 {
    768
}

fn default_gemini_timeout_secs() -> u64 {
    60
}

fn default_bind_address() -> String {
    "127.0.0.1:5000".to_string()
}

fn default_pg_host() -> String {
    "localhost".to_string()
}

fn default_pg_port() -> u16 {
    5432
}

fn default_pg_database() -> String {
    "ticketdb".to_string()
}

fn default_pg_user() -> String {
    "postgres".to_string()
}

fn default_pg_connect_timeout_secs() -> u64 {
    10
}

/// Configuration for the ticket-classifier application.
#[derive(Debug, Clone)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ConfigInner {
    /// Gemini API key (`GEMINI_API_KEY`).
    #[serde(default)]
    pub gemini_api_key: Option<String>,
    /// Fallback Gemini API key (`GOOGLE_API_KEY`), used when `GEMINI_API_KEY` is unset.
    #[serde(default)]
    pub google_api_key: Option<String>,
    /// Gemini model to use (`GEMINI_MODEL`).
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,
    /// Base URL of the Gemini REST API (`GEMINI_ENDPOINT`).
    #[serde(default = "default_gemini_endpoint")]
    pub gemini_endpoint: String,
    /// Sampling temperature (`GEMINI_TEMPERATURE`).
    /// Value between 0 and 2. Zero keeps classifications deterministic.
    #[serde(default = "default_gemini_temperature")]
    pub gemini_temperature: f32,
    /// Max output tokens for the Gemini model (`GEMINI_MAX_OUTPUT_TOKENS`).
    #[serde(default = "default_gemini_max_output_tokens")]
    pub gemini_max_output_tokens: u32,
    /// Client-side timeout for one generation call, in seconds (`GEMINI_TIMEOUT_SECS`).
    #[serde(default = "default_gemini_timeout_secs")]
    pub gemini_timeout_secs: u64,
    /// Address the HTTP server listens on (`BIND_ADDRESS`).
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Database host (`PG_HOST`).
    #[serde(default = "default_pg_host")]
    pub pg_host: String,
    /// Database port (`PG_PORT`).
    #[serde(default = "default_pg_port")]
    pub pg_port: u16,
    /// Database name (`PG_DATABASE`).
    #[serde(default = "default_pg_database")]
    pub pg_database: String,
    /// Database user (`PG_USER`).
    #[serde(default = "default_pg_user")]
    pub pg_user: String,
    /// Database password (`PG_PASSWORD`).
    pub pg_password: String,
    /// Timeout for opening a database connection, in seconds (`PG_CONNECT_TIMEOUT_SECS`).
    #[serde(default = "default_pg_connect_timeout_secs")]
    pub pg_connect_timeout_secs: u64,
}

impl ConfigInner {
    /// The Gemini credential, preferring `GEMINI_API_KEY` over `GOOGLE_API_KEY`.
    pub fn api_key(&self) -> Option<&str> {
        [&self.gemini_api_key, &self.google_api_key]
            .into_iter()
            .filter_map(|key| key.as_deref())
            .map(str::trim)
            .find(|key| !key.is_empty())
    }

    /// The fixed options sent with every generation request.
    pub fn generation_options(&self) -> GenerationOptions {
        GenerationOptions {
            temperature: self.gemini_temperature,
            max_output_tokens: self.gemini_max_output_tokens,
        }
    }
}

impl Config {
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder();

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        // The environment always wins over the file.
        cfg = cfg.add_source(config::Environment::default());

        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        result.validate()?;

        Ok(result)
    }

    /// Check the loaded values, so that bad settings fail at startup rather than per request.
    pub fn validate(&self) -> Res<()> {
        if self.api_key().is_none() {
            return Err(anyhow::anyhow!("Gemini API key not found. Set `GEMINI_API_KEY` or `GOOGLE_API_KEY`."));
        }

        if self.gemini_temperature < 0.0 || self.gemini_temperature > 2.0 {
            return Err(anyhow::anyhow!("Gemini temperature must be between 0 and 2."));
        }

        if self.gemini_max_output_tokens < 1 || self.gemini_max_output_tokens > 65536 {
            return Err(anyhow::anyhow!("Gemini max output tokens must be between 1 and 65536."));
        }

        if self.gemini_timeout_secs == 0 {
            return Err(anyhow::anyhow!("Gemini timeout must be at least one second."));
        }

        if self.pg_host.trim().is_empty() || self.pg_database.trim().is_empty() || self.pg_user.trim().is_empty() {
            return Err(anyhow::anyhow!("Database host, name, and user must not be empty."));
        }

        Ok(())
    }
}
