use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

const DEFAULT_PORT: u16 = 4000;
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Which `BlobStore` implementation backs the context store.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageBackend {
    Fs,
    Memory,
    S3(S3Config),
    Redis { url: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct S3Config {
    pub bucket: String,
    pub endpoint: String,
    pub region: String,
    pub prefix: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    Anthropic,
    Gemini,
}

impl LlmProvider {
    fn credential_var(self) -> &'static str {
        match self {
            LlmProvider::Anthropic => "ANTHROPIC_API_KEY",
            LlmProvider::Gemini => "GEMINI_API_KEY",
        }
    }
}

/// Application configuration loaded from environment variables.
/// Fails at startup if a variable is present but invalid, or if the selected
/// storage backend is missing one of its required variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub data_dir: PathBuf,
    pub storage: StorageBackend,
    pub llm_provider: LlmProvider,
    /// Live-model credential. `None` selects the offline stub client.
    pub llm_api_key: Option<String>,
    pub llm_timeout: Duration,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let storage = match var("STORAGE_BACKEND")
            .unwrap_or_else(|| "fs".to_string())
            .to_lowercase()
            .as_str()
        {
            "fs" => StorageBackend::Fs,
            "memory" => StorageBackend::Memory,
            "s3" => StorageBackend::S3(S3Config {
                bucket: require(&var, "S3_BUCKET")?,
                endpoint: require(&var, "S3_ENDPOINT")?,
                region: var("S3_REGION").unwrap_or_else(|| "us-east-1".to_string()),
                prefix: var("S3_PREFIX").unwrap_or_default(),
                access_key_id: require(&var, "AWS_ACCESS_KEY_ID")?,
                secret_access_key: require(&var, "AWS_SECRET_ACCESS_KEY")?,
            }),
            "redis" => StorageBackend::Redis {
                url: require(&var, "REDIS_URL")?,
            },
            other => bail!("STORAGE_BACKEND must be one of fs, memory, s3, redis (got '{other}')"),
        };

        let llm_provider = match var("LLM_PROVIDER")
            .unwrap_or_else(|| "anthropic".to_string())
            .to_lowercase()
            .as_str()
        {
            "anthropic" => LlmProvider::Anthropic,
            "gemini" => LlmProvider::Gemini,
            other => bail!("LLM_PROVIDER must be 'anthropic' or 'gemini' (got '{other}')"),
        };

        let llm_timeout_secs: u64 =
            parse_or(&var, "LLM_TIMEOUT_SECS", DEFAULT_LLM_TIMEOUT_SECS)?;
        if llm_timeout_secs == 0 {
            bail!("LLM_TIMEOUT_SECS must be at least 1 (got 0)");
        }

        Ok(Config {
            port: parse_or(&var, "PORT", DEFAULT_PORT)?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            data_dir: var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data")),
            storage,
            llm_provider,
            llm_api_key: var(llm_provider.credential_var()),
            llm_timeout: Duration::from_secs(llm_timeout_secs),
            max_upload_bytes: parse_or(&var, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
        })
    }
}

fn require<F>(var: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_or<F, T>(var: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
