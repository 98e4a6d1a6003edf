use std::time::Duration;

const STORAGE_ENV: &str = "EVERAFTER_STORAGE";
const API_KEY_ENV: &str = "AI_INTEGRATIONS_OPENAI_API_KEY";
const BASE_URL_ENV: &str = "AI_INTEGRATIONS_OPENAI_BASE_URL";
const MODEL_ENV: &str = "EVERAFTER_GENERATION_MODEL";
const TIMEOUT_ENV: &str = "EVERAFTER_GENERATION_TIMEOUT_SECS";

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_MODEL: &str = "gpt-5.1";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    Database,
    Memory,
}

#[derive(Clone, Debug)]
pub struct GenerationConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub storage: StorageBackend,
    pub generation: GenerationConfig,
}

impl Config {
    pub fn from_env() -> Self {
        let storage = match resolve_env(STORAGE_ENV).as_deref() {
            Some("memory") => StorageBackend::Memory,
            Some("database") | None => StorageBackend::Database,
            Some(other) => {
                tracing::warn!(value = other, "Unknown {STORAGE_ENV}; using database");
                StorageBackend::Database
            }
        };

        let api_key = resolve_env(API_KEY_ENV).unwrap_or_else(|| {
            tracing::warn!("{API_KEY_ENV} is not set; content generation will fail upstream");
            String::new()
        });

        Self {
            storage,
            generation: GenerationConfig {
                base_url: resolve_env(BASE_URL_ENV)
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                api_key,
                model: resolve_env(MODEL_ENV).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                timeout: Duration::from_secs(read_timeout_secs()),
            },
        }
    }
}

fn resolve_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn read_timeout_secs() -> u64 {
    let Some(raw) = resolve_env(TIMEOUT_ENV) else {
        return DEFAULT_TIMEOUT_SECS;
    };
    match raw.parse::<u64>() {
        Ok(value) if value > 0 => value,
        Ok(_) => {
            tracing::warn!("{TIMEOUT_ENV} must be positive; using default");
            DEFAULT_TIMEOUT_SECS
        }
        Err(err) => {
            tracing::warn!(value = raw.as_str(), error = %err, "Invalid {TIMEOUT_ENV}; using default");
            DEFAULT_TIMEOUT_SECS
        }
    }
}
