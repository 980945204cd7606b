use std::sync::{Arc, LazyLock};

pub mod commands;
pub mod config;
pub mod events;
pub mod player;

use player::{PlayerRegistry, TrackResolver};

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
pub type CommandResult = Result<(), Error>;

/// Shared HTTP client handed to songbird inputs.
pub static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(reqwest::Client::new);

/// State shared by all command invocations.
pub struct Data {
    pub registry: Arc<PlayerRegistry>,
    pub resolver: Arc<dyn TrackResolver>,
}
