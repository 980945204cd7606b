use std::env;

use thiserror::Error;

use crate::player::AcquireMode;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("DISCORD_BOT_TOKEN is not set; the bot cannot log in without it")]
    MissingToken,

    #[error("invalid PLAYBACK_ACQUIRE_MODE: {0}")]
    InvalidAcquireMode(String),
}

pub struct Config {
    pub token: String,
    pub acquire_mode: AcquireMode,
}

impl Config {
    /// Reads configuration from the environment (after dotenv has run).
    /// A missing token is a startup error, never a silent failed login.
    pub fn from_env() -> Result<Self, ConfigError> {
        let token = env::var("DISCORD_BOT_TOKEN").map_err(|_| ConfigError::MissingToken)?;

        let acquire_mode = match env::var("PLAYBACK_ACQUIRE_MODE") {
            Ok(raw) => raw.parse().map_err(ConfigError::InvalidAcquireMode)?,
            Err(_) => AcquireMode::default(),
        };

        Ok(Self {
            token,
            acquire_mode,
        })
    }
}
