// src/config/mod.rs
// All tunables load from the environment, with defaults that work out of
// the box for everything except the API credentials.

use once_cell::sync::Lazy;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct TriadConfig {
    // ── Server Configuration
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,

    // ── Completion Backend (OpenAI-compatible)
    pub openai_base_url: String,
    pub openai_api_key: String,
    pub completion_model: String,
    pub openai_timeout_secs: u64,

    // ── Moderation Backend
    pub guard_model: String,
    pub restricted_topic: String,

    // ── Search Backend (Google Custom Search)
    pub google_api_key: String,
    pub google_cx: String,
    pub search_max_results: usize,
    pub search_timeout_secs: u64,

    // ── Orchestration
    pub max_steps: usize,
    pub warmup_retry_secs: u64,

    // ── Logging
    pub log_level: String,
}

/// Read an env var, trimming whitespace and trailing comments before
/// parsing. Missing or unparseable values fall back to the default.
fn env_var_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(val) => {
            let clean_val = val.split('#').next().unwrap_or("").trim();
            match clean_val.parse::<T>() {
                Ok(parsed) => parsed,
                Err(_) => {
                    eprintln!("Config: {} = '{}' (parse failed, using default)", key, val);
                    default
                }
            }
        }
        Err(_) => default,
    }
}

impl TriadConfig {
    pub fn from_env() -> Self {
        // Load from .env file first if it exists
        dotenv::dotenv().ok();

        Self {
            host: env_var_or("TRIAD_HOST", "0.0.0.0".to_string()),
            port: env_var_or("TRIAD_PORT", 5000),
            request_timeout_secs: env_var_or("TRIAD_REQUEST_TIMEOUT", 120),

            openai_base_url: env_var_or(
                "OPENAI_BASE_URL",
                "https://api.openai.com/v1".to_string(),
            ),
            openai_api_key: env_var_or("OPENAI_API_KEY", String::new()),
            completion_model: env_var_or("TRIAD_MODEL", "gpt-4.1-mini".to_string()),
            openai_timeout_secs: env_var_or("TRIAD_OPENAI_TIMEOUT", 60),

            guard_model: env_var_or("TRIAD_GUARD_MODEL", "gpt-4.1-mini".to_string()),
            restricted_topic: env_var_or(
                "TRIAD_RESTRICTED_TOPIC",
                "civil engineering".to_string(),
            ),

            google_api_key: env_var_or("GOOGLE_API_KEY", String::new()),
            google_cx: env_var_or("GOOGLE_CX", String::new()),
            search_max_results: env_var_or("TRIAD_SEARCH_MAX_RESULTS", 10),
            search_timeout_secs: env_var_or("TRIAD_SEARCH_TIMEOUT", 20),

            max_steps: env_var_or("TRIAD_MAX_STEPS", 8),
            warmup_retry_secs: env_var_or("TRIAD_WARMUP_RETRY", 5),

            log_level: env_var_or("TRIAD_LOG_LEVEL", "info".to_string()),
        }
    }
}

pub static CONFIG: Lazy<TriadConfig> = Lazy::new(TriadConfig::from_env);
