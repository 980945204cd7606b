use poise::serenity_prelude as serenity;
use tracing::info;

use crate::{Data, Error};

/// Gateway events outside the command surface. The one that matters: if the
/// bot itself is disconnected from voice, the guild's engine is torn down
/// exactly as `!stop` would tear it down, so it is never left in limbo.
pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            info!("Logged in as {}", data_about_bot.user.name);
        }
        serenity::FullEvent::VoiceStateUpdate { new, .. } => {
            let bot_id = ctx.cache.current_user().id;
            if new.channel_id.is_none() && new.user_id == bot_id {
                if let Some(guild_id) = new.guild_id {
                    if data.registry.remove(guild_id).await {
                        info!("voice disconnect, tore down engine for guild {guild_id}");
                    }
                }
            }
        }
        _ => {}
    }
    Ok(())
}
