use std::env;

use log::{debug, error, info};

use crate::error::Result;

/// Default base URL for the navy API.
const DEFAULT_API_BASE: &str = "https://api.navy";

/// System persona sent with every chat completion unless overridden.
const DEFAULT_SYSTEM_PROMPT: &str = "You're a Chatbot on discord";

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub navy_api_key: String,
    pub navy_api_base: String,
    pub system_prompt: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        debug!("Loading configuration from environment");
        dotenvy::dotenv().ok();

        let discord_token = env::var("DISCORD_TOKEN").map_err(|e| {
            error!("Failed to load DISCORD_TOKEN from environment: {}", e);
            e
        })?;

        let navy_api_key = env::var("NAVY_API_KEY").map_err(|e| {
            error!("Failed to load NAVY_API_KEY from environment: {}", e);
            e
        })?;

        let navy_api_base =
            env::var("NAVY_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());

        let system_prompt =
            env::var("SYSTEM_PROMPT").unwrap_or_else(|_| DEFAULT_SYSTEM_PROMPT.to_string());

        info!("Configuration loaded successfully");
        debug!("Discord token length: {} characters", discord_token.len());
        debug!("Navy API key length: {} characters", navy_api_key.len());
        debug!("Navy API base: {}", navy_api_base);
        debug!("System prompt length: {} characters", system_prompt.len());

        Ok(Self {
            discord_token,
            navy_api_key,
            navy_api_base,
            system_prompt,
        })
    }
}
