use crate::{CommandResult, Context};

/// Skip the currently playing song
#[poise::command(prefix_command, category = "Music")]
pub async fn skip(ctx: Context<'_>) -> CommandResult {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };

    let skipped = match ctx.data().registry.get(guild_id) {
        Some(engine) => engine.skip().await,
        None => false,
    };

    if skipped {
        ctx.say("Skipped current track.").await?;
    } else {
        ctx.say("There's no song playing.").await?;
    }

    Ok(())
}
