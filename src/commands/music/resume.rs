use crate::{CommandResult, Context};

/// Resume a paused song
#[poise::command(prefix_command, category = "Music")]
pub async fn resume(ctx: Context<'_>) -> CommandResult {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };

    let resumed = match ctx.data().registry.get(guild_id) {
        Some(engine) => engine.resume().await,
        None => false,
    };

    if resumed {
        ctx.say("▶️ Resumed.").await?;
    } else {
        ctx.say("Nothing is paused.").await?;
    }

    Ok(())
}
