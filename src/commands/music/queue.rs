use crate::{CommandResult, Context};

/// Show the list of queued songs
#[poise::command(prefix_command, category = "Music")]
pub async fn queue(ctx: Context<'_>) -> CommandResult {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };

    // A read-only lookup: asking for the queue never creates an engine.
    let Some(engine) = ctx.data().registry.get(guild_id) else {
        ctx.say("Nothing is in the queue").await?;
        return Ok(());
    };

    let lines = engine.queue_lines().await;
    if lines.is_empty() {
        ctx.say("Queue is empty ").await?;
    } else {
        let body = lines
            .iter()
            .enumerate()
            .map(|(idx, title)| format!("{}. {title}", idx + 1))
            .collect::<Vec<_>>()
            .join("\n");
        ctx.say(format!("**Current Queue:**\n{body}")).await?;
    }

    Ok(())
}
