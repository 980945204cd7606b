use crate::{CommandResult, Context};

const HELP_TEXT: &str = "
 ****Music Bot Commands****

`!ping` — Join your voice channel.
`!play <SoundCloud URL>` — Play a song or playlist from SoundCloud.
`!skip` — Skip the currently playing song.
`!pause` — Pause the current song.
`!resume` — Resume a paused song.
`!queue` — Show the list of queued songs.
`!stop` — Stop the music and leave the voice channel.
`!commands` — Show this help message.
";

/// Show this help message
#[poise::command(prefix_command, rename = "commands", category = "Music")]
pub async fn show_commands(ctx: Context<'_>) -> CommandResult {
    ctx.say(HELP_TEXT).await?;
    Ok(())
}
