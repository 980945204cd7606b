use tracing::warn;

use crate::commands::music::utils;
use crate::{CommandResult, Context};

/// Stop the music and leave the voice channel
#[poise::command(prefix_command, category = "Music")]
pub async fn stop(ctx: Context<'_>) -> CommandResult {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };

    if utils::get_call(ctx.serenity_context(), guild_id)
        .await
        .is_err()
    {
        ctx.say("Not connected to a voice channel.").await?;
        return Ok(());
    }

    // Tearing the engine down also disconnects its sink; a ping-only
    // connection has no engine, so leave explicitly either way.
    ctx.data().registry.remove(guild_id).await;
    if let Err(err) = utils::leave_channel(ctx.serenity_context(), guild_id).await {
        warn!("failed to leave voice channel during stop: {err}");
    }

    ctx.say("Stopped and left the voice channel.").await?;

    Ok(())
}
