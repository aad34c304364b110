// src/config/mod.rs
// All tunables load from the environment (.env supported), with defaults
// that work against the hosted provider.

use once_cell::sync::Lazy;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct TabulaConfig {
    // ── Governance data provider
    pub provider_base_url: String,
    pub tally_api_key: Option<String>,

    // ── HTTP client
    pub http_timeout_secs: u64,

    // ── Aggregation defaults
    pub recommended_dao_limit: usize,

    // ── Logging
    pub log_level: String,
}

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

impl TabulaConfig {
    pub fn from_env() -> Self {
        if dotenvy::dotenv().is_err() {
            eprintln!("Warning: .env file not found. Using environment variables and defaults.");
        }

        Self {
            provider_base_url: env_var_or(
                "TABULA_PROVIDER_URL",
                "https://api.tabula.wtf".to_string(),
            ),
            tally_api_key: std::env::var("TALLY_API_KEY").ok().filter(|k| !k.is_empty()),
            http_timeout_secs: env_var_or("TABULA_HTTP_TIMEOUT_SECS", 30),
            recommended_dao_limit: env_var_or("TABULA_RECOMMENDED_DAO_LIMIT", 6),
            log_level: env_var_or("TABULA_LOG_LEVEL", "info".to_string()),
        }
    }
}

pub static CONFIG: Lazy<TabulaConfig> = Lazy::new(TabulaConfig::from_env);
