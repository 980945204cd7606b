use std::collections::VecDeque;

use tokio::sync::{Mutex, Notify};
use tracing::debug;

use super::track::Track;

struct Inner {
    tracks: VecDeque<Track>,
    closed: bool,
}

/// Unbounded FIFO of resolved tracks awaiting playback, scoped to one guild
/// and owned by its engine. Insertion order is playback order.
pub struct TrackQueue {
    inner: Mutex<Inner>,
    available: Notify,
}

impl TrackQueue {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                tracks: VecDeque::new(),
                closed: false,
            }),
            available: Notify::new(),
        }
    }

    /// Appends a track. Never blocks. Tracks pushed after `close` are
    /// dropped instead of enqueued.
    pub async fn push(&self, track: Track) {
        let mut inner = self.inner.lock().await;
        if inner.closed {
            debug!("queue closed, dropping track '{}'", track.title);
            return;
        }
        inner.tracks.push_back(track);
        self.available.notify_one();
    }

    /// Removes and returns the oldest track, suspending until one exists.
    pub async fn next(&self) -> Track {
        loop {
            if let Some(track) = self.inner.lock().await.tracks.pop_front() {
                return track;
            }
            self.available.notified().await;
        }
    }

    /// Pending titles in playback order, without removing anything.
    pub async fn snapshot(&self) -> Vec<String> {
        self.inner
            .lock()
            .await
            .tracks
            .iter()
            .map(|track| track.title.clone())
            .collect()
    }

    /// Closes the queue and returns everything still pending. Later pushes
    /// are dropped.
    pub async fn close(&self) -> Vec<Track> {
        let mut inner = self.inner.lock().await;
        inner.closed = true;
        inner.tracks.drain(..).collect()
    }
}

impl Default for TrackQueue {
    fn default() -> Self {
        Self::new()
    }
}
