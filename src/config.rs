use std::env;
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_LLM_TIMEOUT_SECS, DEFAULT_MODEL, DEFAULT_RATE_LIMIT_REQUESTS,
    DEFAULT_RATE_LIMIT_WINDOW_SECS, PLACEHOLDER_API_KEY, REFERENCE_DATABASE,
};
use crate::prompt::PromptStrategy;

/// Translator configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Model API key; `None` disables translation for the whole process
    pub api_key: Option<String>,
    pub model: String,
    pub target_database: String,
    pub prompt_strategy: PromptStrategy,
    pub rate_limit_requests: u32,
    pub rate_limit_window_secs: u64,
    pub llm_timeout_secs: u64,
    pub schema_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            target_database: REFERENCE_DATABASE.to_string(),
            prompt_strategy: PromptStrategy::Reference,
            rate_limit_requests: DEFAULT_RATE_LIMIT_REQUESTS,
            rate_limit_window_secs: DEFAULT_RATE_LIMIT_WINDOW_SECS,
            llm_timeout_secs: DEFAULT_LLM_TIMEOUT_SECS,
            schema_path: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists (development)
        dotenvy::dotenv().ok();

        let api_key = normalize_api_key(env::var("GEMINI_API_KEY").ok());

        let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let target_database =
            env::var("TARGET_DATABASE").unwrap_or_else(|_| REFERENCE_DATABASE.to_string());

        let prompt_strategy = match env::var("PROMPT_STRATEGY") {
            Ok(value) => value.parse()?,
            Err(_) => PromptStrategy::for_database(&target_database),
        };

        let rate_limit_requests = env::var("RATE_LIMIT_REQUESTS")
            .unwrap_or_else(|_| DEFAULT_RATE_LIMIT_REQUESTS.to_string())
            .parse()
            .map_err(|_| "Invalid RATE_LIMIT_REQUESTS")?;

        let rate_limit_window_secs = env::var("RATE_LIMIT_WINDOW_SECS")
            .unwrap_or_else(|_| DEFAULT_RATE_LIMIT_WINDOW_SECS.to_string())
            .parse()
            .map_err(|_| "Invalid RATE_LIMIT_WINDOW_SECS")?;

        let llm_timeout_secs = env::var("LLM_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_LLM_TIMEOUT_SECS.to_string())
            .parse()
            .map_err(|_| "Invalid LLM_TIMEOUT_SECS")?;

        let schema_path = env::var("SCHEMA_PATH").ok().map(PathBuf::from);

        Ok(Config {
            api_key,
            model,
            target_database,
            prompt_strategy,
            rate_limit_requests,
            rate_limit_window_secs,
            llm_timeout_secs,
            schema_path,
        })
    }

    /// Whether a usable API key was supplied
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Drop blank and placeholder keys so they count as "not configured"
pub fn normalize_api_key(raw: Option<String>) -> Option<String> {
    raw.map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty() && key != PLACEHOLDER_API_KEY)
}
