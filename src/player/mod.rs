//! Per-guild playback: queue, loop, registry, and the boundaries to the
//! media resolver and the voice transport.

pub mod engine;
pub mod notifier;
pub mod queue;
pub mod registry;
pub mod resolver;
pub mod sink;
pub mod track;

pub use engine::{PlaybackState, PlayerEngine};
pub use notifier::Notifier;
pub use queue::TrackQueue;
pub use registry::PlayerRegistry;
pub use resolver::{AcquireMode, TrackResolver, YtDlpResolver, is_supported_url};
pub use sink::{SongbirdSink, TrackEndSignal, VoiceSink};
pub use track::{AudioHandle, TempAudioFile, Track};

use thiserror::Error;

/// Errors that can occur during playback operations
#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("User is not in a voice channel")]
    UserNotInVoiceChannel,

    #[error("Not connected to a voice channel")]
    NotConnected,

    #[error("Failed to get voice manager")]
    NoVoiceManager,

    #[error("Failed to join voice channel: {0}")]
    Join(String),

    #[error("{0}")]
    Resolve(String),

    #[error("Track unavailable: {0}")]
    Unplayable(String),

    #[error("Playback failed: {0}")]
    Playback(String),
}

/// Result type for playback operations
pub type PlayerResult<T> = Result<T, PlayerError>;
