use tracing::info;

use crate::commands::music::utils;
use crate::{CommandResult, Context};

/// Join (or move to) your voice channel
#[poise::command(prefix_command, category = "Music")]
pub async fn ping(ctx: Context<'_>) -> CommandResult {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };

    let channel_id =
        match utils::user_voice_channel(ctx.serenity_context(), guild_id, ctx.author().id) {
            Ok(channel_id) => channel_id,
            Err(_) => {
                ctx.say("You must be in a voice channel.").await?;
                return Ok(());
            }
        };

    if let Err(err) = utils::join_channel(ctx.serenity_context(), guild_id, channel_id).await {
        ctx.say(format!("Failed to join voice channel: {err}"))
            .await?;
        return Ok(());
    }

    info!("joined voice channel {channel_id} in guild {guild_id}");
    let name = channel_id
        .name(ctx.serenity_context())
        .await
        .unwrap_or_else(|_| channel_id.to_string());
    ctx.say(format!("Pong! Joined {name}! Use `!commands` for help!"))
        .await?;

    Ok(())
}
