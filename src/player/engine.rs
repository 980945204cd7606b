use std::sync::Arc;

use tokio::sync::{Mutex, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::PlayerError;
use super::notifier::Notifier;
use super::queue::TrackQueue;
use super::resolver::TrackResolver;
use super::sink::VoiceSink;

/// Where the playback loop currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackState {
    /// Nothing current; waiting on the queue.
    Idle,
    /// Track handed to the voice sink, waiting for it to accept.
    Playing { title: String },
    /// Track accepted; playing (or paused) until its completion signal fires.
    WaitingForCompletion { title: String },
    /// Engine torn down. Terminal.
    Stopped,
}

impl PlaybackState {
    /// Title of the track currently handed to the sink, if any.
    pub fn current_title(&self) -> Option<&str> {
        match self {
            PlaybackState::Playing { title } | PlaybackState::WaitingForCompletion { title } => {
                Some(title)
            }
            PlaybackState::Idle | PlaybackState::Stopped => None,
        }
    }
}

/// One guild's playback state: the queue, the loop task that drains it, and
/// the voice sink the loop feeds. At most one track is ever handed to the
/// sink at a time; only the loop calls `sink.play`.
pub struct PlayerEngine {
    queue: Arc<TrackQueue>,
    state: Arc<Mutex<PlaybackState>>,
    sink: Arc<dyn VoiceSink>,
    loop_handle: Mutex<Option<JoinHandle<()>>>,
}

impl PlayerEngine {
    /// Creates the engine and starts its playback loop.
    pub fn new(sink: Arc<dyn VoiceSink>, notifier: Arc<dyn Notifier>) -> Arc<Self> {
        let queue = Arc::new(TrackQueue::new());
        let state = Arc::new(Mutex::new(PlaybackState::Idle));
        let handle = tokio::spawn(playback_loop(
            Arc::clone(&queue),
            Arc::clone(&state),
            Arc::clone(&sink),
            notifier,
        ));

        Arc::new(Self {
            queue,
            state,
            sink,
            loop_handle: Mutex::new(Some(handle)),
        })
    }

    /// Resolves `url` and enqueues every playable entry. Unplayable entries
    /// are skipped without aborting their siblings; returns how many were
    /// added. A whole-URL failure aborts the request.
    pub async fn enqueue_from(
        &self,
        resolver: &dyn TrackResolver,
        url: &str,
    ) -> Result<usize, PlayerError> {
        let entries = resolver.resolve(url).await?;

        let mut added = 0;
        for entry in entries {
            match entry {
                Ok(track) => {
                    self.queue.push(track).await;
                    added += 1;
                }
                Err(err) => debug!("skipping unplayable entry: {err}"),
            }
        }
        Ok(added)
    }

    pub async fn state(&self) -> PlaybackState {
        self.state.lock().await.clone()
    }

    /// Titles for display: the current track first, then everything pending.
    pub async fn queue_lines(&self) -> Vec<String> {
        let current = self
            .state
            .lock()
            .await
            .current_title()
            .map(str::to_string);

        let mut lines = Vec::new();
        lines.extend(current);
        lines.extend(self.queue.snapshot().await);
        lines
    }

    /// Skips the current track by forcing its completion signal, which
    /// resolves the loop's wait exactly like a natural end. Only applies
    /// while actively playing; a paused track is not skipped.
    pub async fn skip(&self) -> bool {
        if !self.sink.is_playing().await {
            return false;
        }
        self.sink.stop_current().await
    }

    /// Pauses the sink. Not a loop state: the loop keeps waiting on the same
    /// completion signal.
    pub async fn pause(&self) -> bool {
        if !self.sink.is_playing().await {
            return false;
        }
        match self.sink.pause().await {
            Ok(()) => true,
            Err(err) => {
                warn!("pause failed: {err}");
                false
            }
        }
    }

    pub async fn resume(&self) -> bool {
        if !self.sink.is_paused().await {
            return false;
        }
        match self.sink.resume().await {
            Ok(()) => true,
            Err(err) => {
                warn!("resume failed: {err}");
                false
            }
        }
    }

    /// Tears the engine down deterministically: the queue stops accepting
    /// tracks, the loop is cancelled, the current track is stopped, the
    /// transport disconnects, and pending temp resources are released.
    pub async fn shutdown(&self) {
        let pending = self.queue.close().await;

        if let Some(handle) = self.loop_handle.lock().await.take() {
            handle.abort();
        }

        self.sink.stop_current().await;
        if let Err(err) = self.sink.disconnect().await {
            debug!("voice disconnect during shutdown: {err}");
        }

        *self.state.lock().await = PlaybackState::Stopped;
        info!(
            "player engine stopped, {} pending track(s) discarded",
            pending.len()
        );
        // Dropping the drained tracks releases their temp files.
    }
}

async fn playback_loop(
    queue: Arc<TrackQueue>,
    state: Arc<Mutex<PlaybackState>>,
    sink: Arc<dyn VoiceSink>,
    notifier: Arc<dyn Notifier>,
) {
    loop {
        *state.lock().await = PlaybackState::Idle;
        let track = queue.next().await;

        // A fresh channel per track, created after dequeue and before play:
        // a completion left over from a previous track can never satisfy
        // this wait.
        let (on_end, finished) = oneshot::channel();

        *state.lock().await = PlaybackState::Playing {
            title: track.title.clone(),
        };

        match sink.play(&track.handle, on_end).await {
            Ok(()) => {
                *state.lock().await = PlaybackState::WaitingForCompletion {
                    title: track.title.clone(),
                };
                notifier
                    .notify(&format!("Now playing: {}", track.title))
                    .await;

                // Err here means the sink dropped the sender without firing;
                // either way the track is over and the loop moves on.
                let _ = finished.await;
                debug!("track '{}' finished", track.title);
            }
            Err(err) => {
                warn!("failed to start '{}': {err}", track.title);
                notifier
                    .notify(&format!("Skipping {}: {err}", track.title))
                    .await;
            }
        }

        // Dropping the track releases its temp resource.
        drop(track);
    }
}
