//! Serenity/songbird glue shared by the music commands, plus the notifier
//! that carries playback-loop messages back to chat.

use std::sync::Arc;

use serenity::async_trait;
use serenity::client::Context as SerenityContext;
use serenity::http::Http;
use serenity::model::id::{ChannelId, GuildId, UserId};
use serenity::prelude::Mutex as SerenityMutex;
use songbird::{Call, Songbird};
use tracing::warn;

use crate::player::{Notifier, PlayerError, PlayerResult};

/// Get the Songbird voice client from the context
pub async fn get_songbird(ctx: &SerenityContext) -> PlayerResult<Arc<Songbird>> {
    songbird::get(ctx).await.ok_or(PlayerError::NoVoiceManager)
}

/// Get the current voice call handle, if connected
pub async fn get_call(
    ctx: &SerenityContext,
    guild_id: GuildId,
) -> PlayerResult<Arc<SerenityMutex<Call>>> {
    let songbird = get_songbird(ctx).await?;
    songbird.get(guild_id).ok_or(PlayerError::NotConnected)
}

/// Join the given voice channel, moving there if already connected elsewhere
pub async fn join_channel(
    ctx: &SerenityContext,
    guild_id: GuildId,
    channel_id: ChannelId,
) -> PlayerResult<Arc<SerenityMutex<Call>>> {
    let songbird = get_songbird(ctx).await?;
    songbird
        .join(guild_id, channel_id)
        .await
        .map_err(|err| PlayerError::Join(err.to_string()))
}

/// Drop the voice connection for this guild
pub async fn leave_channel(ctx: &SerenityContext, guild_id: GuildId) -> PlayerResult<()> {
    let songbird = get_songbird(ctx).await?;
    if songbird.get(guild_id).is_none() {
        return Err(PlayerError::NotConnected);
    }
    songbird
        .remove(guild_id)
        .await
        .map_err(|_| PlayerError::Join("Failed to leave voice channel".to_string()))
}

/// Voice channel the user currently occupies
pub fn user_voice_channel(
    ctx: &SerenityContext,
    guild_id: GuildId,
    user_id: UserId,
) -> PlayerResult<ChannelId> {
    let guild = ctx
        .cache
        .guild(guild_id)
        .ok_or(PlayerError::UserNotInVoiceChannel)?;

    let voice_state = guild
        .voice_states
        .get(&user_id)
        .ok_or(PlayerError::UserNotInVoiceChannel)?;

    voice_state
        .channel_id
        .ok_or(PlayerError::UserNotInVoiceChannel)
}

/// Posts playback-loop messages to the channel the play command came from.
pub struct ChannelNotifier {
    http: Arc<Http>,
    channel_id: ChannelId,
}

impl ChannelNotifier {
    pub fn new(http: Arc<Http>, channel_id: ChannelId) -> Self {
        Self { http, channel_id }
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn notify(&self, text: &str) {
        if let Err(err) = self.channel_id.say(&self.http, text).await {
            warn!("failed to send player message: {err}");
        }
    }
}
