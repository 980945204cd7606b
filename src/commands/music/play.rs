use std::sync::Arc;

use tracing::info;

use crate::commands::music::{songs_added_line, utils};
use crate::player::{PlayerEngine, SongbirdSink, is_supported_url};
use crate::{CommandResult, Context};

/// Play a song or playlist from a SoundCloud URL
#[poise::command(prefix_command, category = "Music")]
pub async fn play(
    ctx: Context<'_>,
    #[description = "SoundCloud URL"] url: String,
) -> CommandResult {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };

    let channel_id =
        match utils::user_voice_channel(ctx.serenity_context(), guild_id, ctx.author().id) {
            Ok(channel_id) => channel_id,
            Err(_) => {
                ctx.say("Enter a voice channel to play music.").await?;
                return Ok(());
            }
        };

    // Rejected before the resolver runs and before any engine exists.
    if !is_supported_url(&url) {
        ctx.say("Only SoundCloud links are supported").await?;
        return Ok(());
    }

    let call = match utils::join_channel(ctx.serenity_context(), guild_id, channel_id).await {
        Ok(call) => call,
        Err(err) => {
            ctx.say(format!("Failed to join voice channel: {err}"))
                .await?;
            return Ok(());
        }
    };

    let data = ctx.data();
    let http = ctx.serenity_context().http.clone();
    let reply_channel = ctx.channel_id();
    let engine = data.registry.get_or_create(guild_id, || {
        let sink = Arc::new(SongbirdSink::new(call));
        let notifier = Arc::new(utils::ChannelNotifier::new(http, reply_channel));
        PlayerEngine::new(sink, notifier)
    });

    info!("resolving {url} for guild {guild_id}");
    match engine.enqueue_from(data.resolver.as_ref(), &url).await {
        Ok(added) => {
            ctx.say(songs_added_line(added)).await?;
        }
        Err(err) => {
            ctx.say(format!("Error loading audio: {err}")).await?;
        }
    }

    Ok(())
}
