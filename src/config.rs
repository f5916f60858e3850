//! Command-line and environment settings

use clap::Args;
use ragkit_llm::config::{DEFAULT_BASE_URL, DEFAULT_CHAT_MODEL, DEFAULT_EMBEDDING_MODEL};
use ragkit_llm::{ClientConfig, Error, Result};
use std::path::Path;
use std::time::Duration;

/// Shown when the API key is missing or rejected locally
pub const API_KEY_HINT: &str = "Make sure you have OPENAI_API_KEY in your environment or .env file";

/// Connection settings shared by every lesson
#[derive(Args, Debug, Clone)]
pub struct Settings {
    /// API key for the model provider
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Base URL of an OpenAI-compatible API
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub base_url: String,

    /// Model used for completions
    #[arg(long, env = "RAGKIT_CHAT_MODEL", default_value = DEFAULT_CHAT_MODEL, global = true)]
    pub chat_model: String,

    /// Model used for embeddings
    #[arg(long, env = "RAGKIT_EMBEDDING_MODEL", default_value = DEFAULT_EMBEDDING_MODEL, global = true)]
    pub embedding_model: String,

    /// Request timeout in seconds
    #[arg(long, env = "RAGKIT_TIMEOUT_SECS", default_value_t = 60, global = true)]
    pub timeout_secs: u64,
}

impl Settings {
    /// Validated client configuration
    pub fn client_config(&self) -> Result<ClientConfig> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::Configuration("OPENAI_API_KEY is not set".to_string()))?;

        let config = ClientConfig::new(api_key)
            .with_base_url(&self.base_url)
            .with_chat_model(&self.chat_model)
            .with_embedding_model(&self.embedding_model)
            .with_timeout(Duration::from_secs(self.timeout_secs));
        config.validate()?;
        Ok(config)
    }
}

/// Load a `.env` file into the process environment.
///
/// Reads `path`, or searches the current directory and its parents when
/// `None`. A missing file is `Ok(false)`; unreadable or malformed files are
/// errors. Variables already set in the environment win.
pub fn load_env_file(path: Option<&Path>) -> std::result::Result<bool, dotenvy::Error> {
    let loaded = match path {
        Some(path) => dotenvy::from_path(path),
        None => dotenvy::dotenv().map(|_| ()),
    };
    match loaded {
        Ok(()) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(e) => Err(e),
    }
}
