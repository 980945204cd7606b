use std::sync::{Arc, Mutex as StdMutex};

use serenity::async_trait;
use serenity::prelude::Mutex as SerenityMutex;
use songbird::input::{File, HttpRequest, Input};
use songbird::tracks::{PlayMode, TrackHandle};
use songbird::{Call, Event, EventContext, EventHandler as VoiceEventHandler, TrackEvent};
use tokio::sync::{Mutex, oneshot};
use tracing::warn;

use super::PlayerError;
use super::track::AudioHandle;

/// Raised exactly once per track: on natural end, on transport error, and on
/// forced stop alike. Dropping it unfired reads as "finished" to the loop.
pub type TrackEndSignal = oneshot::Sender<()>;

/// The audio transport for one guild's voice connection.
#[async_trait]
pub trait VoiceSink: Send + Sync {
    /// Hands a track to the transport. The transport takes ownership of
    /// `on_end` and must fire it exactly once when the track finishes or is
    /// stopped.
    async fn play(&self, handle: &AudioHandle, on_end: TrackEndSignal) -> Result<(), PlayerError>;

    async fn pause(&self) -> Result<(), PlayerError>;

    async fn resume(&self) -> Result<(), PlayerError>;

    /// Stops the current track, forcing its completion signal through the
    /// same path as a natural end. Returns whether there was one to stop.
    async fn stop_current(&self) -> bool;

    async fn disconnect(&self) -> Result<(), PlayerError>;

    async fn is_playing(&self) -> bool;

    async fn is_paused(&self) -> bool;
}

/// Fires the playback loop's completion signal from songbird's driver
/// context. Registered for both End and Error track events; the take-once
/// cell keeps a double event from firing twice.
struct TrackEndNotifier {
    signal: Arc<StdMutex<Option<TrackEndSignal>>>,
}

#[async_trait]
impl VoiceEventHandler for TrackEndNotifier {
    async fn act(&self, ctx: &EventContext<'_>) -> Option<Event> {
        if let EventContext::Track(_) = ctx {
            let taken = self.signal.lock().ok().and_then(|mut cell| cell.take());
            if let Some(signal) = taken {
                let _ = signal.send(());
            }
        }
        None
    }
}

/// `VoiceSink` over a songbird call.
pub struct SongbirdSink {
    call: Arc<SerenityMutex<Call>>,
    current: Mutex<Option<TrackHandle>>,
}

impl SongbirdSink {
    pub fn new(call: Arc<SerenityMutex<Call>>) -> Self {
        Self {
            call,
            current: Mutex::new(None),
        }
    }

    async fn current_mode(&self) -> Option<PlayMode> {
        let guard = self.current.lock().await;
        let track = guard.as_ref()?;
        track.get_info().await.ok().map(|info| info.playing)
    }
}

#[async_trait]
impl VoiceSink for SongbirdSink {
    async fn play(&self, handle: &AudioHandle, on_end: TrackEndSignal) -> Result<(), PlayerError> {
        let input: Input = match handle {
            AudioHandle::Stream(url) => {
                HttpRequest::new(crate::HTTP_CLIENT.clone(), url.clone()).into()
            }
            AudioHandle::File(path) => File::new(path.clone()).into(),
        };

        let track = self.call.lock().await.play_input(input);

        // Songbird raises End for natural finish and forced stop alike; Error
        // covers a stream that dies before it ends. One shared cell, one shot.
        let signal = Arc::new(StdMutex::new(Some(on_end)));
        for event in [TrackEvent::End, TrackEvent::Error] {
            track
                .add_event(
                    Event::Track(event),
                    TrackEndNotifier {
                        signal: Arc::clone(&signal),
                    },
                )
                .map_err(|err| PlayerError::Playback(err.to_string()))?;
        }

        *self.current.lock().await = Some(track);
        Ok(())
    }

    async fn pause(&self) -> Result<(), PlayerError> {
        let guard = self.current.lock().await;
        let track = guard.as_ref().ok_or(PlayerError::NotConnected)?;
        track
            .pause()
            .map_err(|err| PlayerError::Playback(err.to_string()))
    }

    async fn resume(&self) -> Result<(), PlayerError> {
        let guard = self.current.lock().await;
        let track = guard.as_ref().ok_or(PlayerError::NotConnected)?;
        track
            .play()
            .map_err(|err| PlayerError::Playback(err.to_string()))
    }

    async fn stop_current(&self) -> bool {
        let guard = self.current.lock().await;
        match guard.as_ref() {
            Some(track) => {
                if let Err(err) = track.stop() {
                    warn!("failed to stop current track: {err}");
                    return false;
                }
                true
            }
            None => false,
        }
    }

    async fn disconnect(&self) -> Result<(), PlayerError> {
        self.call
            .lock()
            .await
            .leave()
            .await
            .map_err(|err| PlayerError::Join(err.to_string()))
    }

    async fn is_playing(&self) -> bool {
        self.current_mode().await == Some(PlayMode::Play)
    }

    async fn is_paused(&self) -> bool {
        self.current_mode().await == Some(PlayMode::Pause)
    }
}
