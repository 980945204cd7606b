use std::sync::Arc;

use dashmap::DashMap;
use serenity::model::id::GuildId;
use tracing::info;

use super::engine::PlayerEngine;

/// Guild-scoped playback engines, created lazily on the first play command
/// and removed on stop. No entry means "no active playback state".
pub struct PlayerRegistry {
    engines: DashMap<GuildId, Arc<PlayerEngine>>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self {
            engines: DashMap::new(),
        }
    }

    /// Returns the guild's engine, creating and starting one if absent. The
    /// map's entry API makes check-and-create atomic: two racing play
    /// commands end up sharing one engine.
    pub fn get_or_create(
        &self,
        guild_id: GuildId,
        factory: impl FnOnce() -> Arc<PlayerEngine>,
    ) -> Arc<PlayerEngine> {
        self.engines
            .entry(guild_id)
            .or_insert_with(|| {
                info!("creating player engine for guild {guild_id}");
                factory()
            })
            .value()
            .clone()
    }

    /// Read-only lookup; never creates an engine.
    pub fn get(&self, guild_id: GuildId) -> Option<Arc<PlayerEngine>> {
        self.engines.get(&guild_id).map(|entry| entry.value().clone())
    }

    /// Removes and tears down the guild's engine. Returns whether one
    /// existed.
    pub async fn remove(&self, guild_id: GuildId) -> bool {
        match self.engines.remove(&guild_id) {
            Some((_, engine)) => {
                engine.shutdown().await;
                info!("removed player engine for guild {guild_id}");
                true
            }
            None => false,
        }
    }
}

impl Default for PlayerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
