use crate::{CommandResult, Context};

/// Pause the current song
#[poise::command(prefix_command, category = "Music")]
pub async fn pause(ctx: Context<'_>) -> CommandResult {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };

    let paused = match ctx.data().registry.get(guild_id) {
        Some(engine) => engine.pause().await,
        None => false,
    };

    if paused {
        ctx.say("⏸️ Paused.").await?;
    } else {
        ctx.say("Nothing is playing.").await?;
    }

    Ok(())
}
