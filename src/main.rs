use std::sync::Arc;

use dotenv::dotenv;
use poise::serenity_prelude as serenity;
use songbird::SerenityInit;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use surfbot::commands::music::{pause, ping, play, queue, resume, show_commands, skip, stop};
use surfbot::config::Config;
use surfbot::player::{PlayerRegistry, YtDlpResolver};
use surfbot::{Data, Error, events};

#[tokio::main]
async fn main() -> Result<(), Error> {
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("surfbot=debug,warn")),
        )
        .init();

    dotenv().ok();
    let config = Config::from_env()?;

    let intents = serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::MESSAGE_CONTENT
        | serenity::GatewayIntents::GUILD_VOICE_STATES;

    let acquire_mode = config.acquire_mode;
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                ping(),
                play(),
                skip(),
                pause(),
                resume(),
                queue(),
                stop(),
                show_commands(),
            ],
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some("!".into()),
                ..Default::default()
            },
            event_handler: |ctx, event, framework, data| {
                Box::pin(events::event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |_ctx, _ready, _framework| {
            Box::pin(async move {
                Ok(Data {
                    registry: Arc::new(PlayerRegistry::new()),
                    resolver: Arc::new(YtDlpResolver::new(acquire_mode)),
                })
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(&config.token, intents)
        .framework(framework)
        .register_songbird()
        .await?;

    client.start().await.map_err(Into::into)
}
