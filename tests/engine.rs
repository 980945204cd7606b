//! Exercises the playback engine against fake collaborators: a fake voice
//! sink that asserts no overlapping play calls, a canned resolver, and a
//! recording notifier.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use pretty_assertions::assert_eq;
use serenity::async_trait;
use serenity::model::id::GuildId;
use tokio::sync::{Mutex, Notify};
use tokio::time::timeout;

use surfbot::player::{
    AudioHandle, Notifier, PlaybackState, PlayerEngine, PlayerError, PlayerRegistry, PlayerResult,
    Track, TrackEndSignal, TrackResolver, VoiceSink,
};

const WAIT: Duration = Duration::from_secs(2);

/// Voice sink that records play calls and lets the test end tracks at will.
/// It flags any overlapping play call, which would break the one-current-
/// track-per-guild invariant.
#[derive(Default)]
struct FakeSink {
    playing: AtomicBool,
    paused: AtomicBool,
    overlap: AtomicBool,
    fail_next_play: AtomicBool,
    drop_end_signal: AtomicBool,
    play_count: AtomicUsize,
    played: Mutex<Vec<String>>,
    current_end: Mutex<Option<TrackEndSignal>>,
    started: Notify,
}

impl FakeSink {
    /// Ends the current track, as the transport would at end-of-stream.
    async fn finish(&self) -> bool {
        match self.current_end.lock().await.take() {
            Some(signal) => {
                self.playing.store(false, Ordering::SeqCst);
                self.paused.store(false, Ordering::SeqCst);
                let _ = signal.send(());
                true
            }
            None => false,
        }
    }

    async fn wait_for_play(&self) {
        timeout(WAIT, self.started.notified())
            .await
            .expect("sink never received a play call");
    }

    async fn played(&self) -> Vec<String> {
        self.played.lock().await.clone()
    }
}

#[async_trait]
impl VoiceSink for FakeSink {
    async fn play(&self, handle: &AudioHandle, on_end: TrackEndSignal) -> Result<(), PlayerError> {
        if self.fail_next_play.swap(false, Ordering::SeqCst) {
            return Err(PlayerError::Playback("bad stream".into()));
        }

        if self.playing.swap(true, Ordering::SeqCst) {
            self.overlap.store(true, Ordering::SeqCst);
        }

        let label = match handle {
            AudioHandle::Stream(url) => url.clone(),
            AudioHandle::File(path) => path.display().to_string(),
        };
        self.played.lock().await.push(label);

        if self.drop_end_signal.load(Ordering::SeqCst) {
            self.playing.store(false, Ordering::SeqCst);
            drop(on_end);
        } else {
            *self.current_end.lock().await = Some(on_end);
        }

        self.play_count.fetch_add(1, Ordering::SeqCst);
        self.started.notify_one();
        Ok(())
    }

    async fn pause(&self) -> Result<(), PlayerError> {
        self.paused.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn resume(&self) -> Result<(), PlayerError> {
        self.paused.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn stop_current(&self) -> bool {
        self.finish().await
    }

    async fn disconnect(&self) -> Result<(), PlayerError> {
        Ok(())
    }

    async fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst) && !self.paused.load(Ordering::SeqCst)
    }

    async fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }
}

/// Resolver returning a canned per-entry outcome list, or failing outright.
struct FakeResolver {
    entries: Vec<Result<(String, String), String>>,
    fail_whole_url: bool,
}

impl FakeResolver {
    fn with_tracks(titles: &[&str]) -> Self {
        Self {
            entries: titles
                .iter()
                .map(|title| Ok((title.to_string(), format!("https://cdn.example/{title}"))))
                .collect(),
            fail_whole_url: false,
        }
    }

    fn failing() -> Self {
        Self {
            entries: Vec::new(),
            fail_whole_url: true,
        }
    }
}

#[async_trait]
impl TrackResolver for FakeResolver {
    async fn resolve(&self, _url: &str) -> PlayerResult<Vec<PlayerResult<Track>>> {
        if self.fail_whole_url {
            return Err(PlayerError::Resolve("unsupported URL".into()));
        }
        Ok(self
            .entries
            .iter()
            .map(|entry| match entry {
                Ok((title, url)) => Ok(Track::stream(title.clone(), url.clone())),
                Err(msg) => Err(PlayerError::Unplayable(msg.clone())),
            })
            .collect())
    }
}

#[derive(Default)]
struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, text: &str) {
        self.messages.lock().await.push(text.to_string());
    }
}

fn new_engine() -> (Arc<PlayerEngine>, Arc<FakeSink>, Arc<RecordingNotifier>) {
    let sink = Arc::new(FakeSink::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let engine = PlayerEngine::new(sink.clone(), notifier.clone());
    (engine, sink, notifier)
}

async fn wait_for_state(engine: &PlayerEngine, wanted: impl Fn(&PlaybackState) -> bool) {
    timeout(WAIT, async {
        loop {
            if wanted(&engine.state().await) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("engine never reached the expected state");
}

#[tokio::test]
async fn tracks_play_in_enqueue_order_without_overlap() {
    let (engine, sink, notifier) = new_engine();
    let resolver = FakeResolver::with_tracks(&["one", "two", "three"]);

    let added = engine.enqueue_from(&resolver, "https://soundcloud.com/x").await.unwrap();
    assert_eq!(added, 3);

    for _ in 0..3 {
        sink.wait_for_play().await;
        wait_for_state(&engine, |state| {
            matches!(state, PlaybackState::WaitingForCompletion { .. })
        })
        .await;
        sink.finish().await;
    }
    wait_for_state(&engine, |state| *state == PlaybackState::Idle).await;

    assert_eq!(
        sink.played().await,
        vec![
            "https://cdn.example/one",
            "https://cdn.example/two",
            "https://cdn.example/three",
        ]
    );
    assert!(!sink.overlap.load(Ordering::SeqCst));

    let messages = notifier.messages.lock().await.clone();
    assert_eq!(
        messages,
        vec![
            "Now playing: one",
            "Now playing: two",
            "Now playing: three",
        ]
    );
}

#[tokio::test]
async fn skip_advances_to_the_next_track() {
    let (engine, sink, _) = new_engine();
    let resolver = FakeResolver::with_tracks(&["first", "second"]);
    engine.enqueue_from(&resolver, "url").await.unwrap();

    sink.wait_for_play().await;
    wait_for_state(&engine, |state| {
        state.current_title() == Some("first")
            && matches!(state, PlaybackState::WaitingForCompletion { .. })
    })
    .await;

    assert!(engine.skip().await);

    // The forced completion resolves the loop's wait; the next track starts
    // without hanging.
    sink.wait_for_play().await;
    wait_for_state(&engine, |state| state.current_title() == Some("second")).await;
    assert_eq!(sink.played().await.len(), 2);
}

#[tokio::test]
async fn skip_with_nothing_playing_reports_false() {
    let (engine, sink, _) = new_engine();
    assert!(!engine.skip().await);
    assert_eq!(sink.play_count.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn pause_and_resume_do_not_disturb_the_wait() {
    let (engine, sink, _) = new_engine();
    let resolver = FakeResolver::with_tracks(&["song"]);
    engine.enqueue_from(&resolver, "url").await.unwrap();
    sink.wait_for_play().await;
    wait_for_state(&engine, |state| {
        matches!(state, PlaybackState::WaitingForCompletion { .. })
    })
    .await;

    assert!(engine.pause().await);
    assert!(sink.is_paused().await);
    // Paused is not a loop state; the loop is still waiting on completion.
    assert!(matches!(
        engine.state().await,
        PlaybackState::WaitingForCompletion { .. }
    ));

    // Skipping a paused track is refused, matching the command contract.
    assert!(!engine.skip().await);

    assert!(engine.resume().await);
    assert!(!sink.is_paused().await);

    sink.finish().await;
    wait_for_state(&engine, |state| *state == PlaybackState::Idle).await;
}

#[tokio::test]
async fn partial_resolution_counts_only_successes() {
    let (engine, _, _) = new_engine();
    let resolver = FakeResolver {
        entries: vec![
            Ok(("good one".into(), "https://cdn.example/1".into())),
            Err("region locked".into()),
            Ok(("good two".into(), "https://cdn.example/2".into())),
        ],
        fail_whole_url: false,
    };

    let added = engine.enqueue_from(&resolver, "url").await.unwrap();
    assert_eq!(added, 2);
}

#[tokio::test]
async fn all_entries_failing_counts_zero() {
    let (engine, _, _) = new_engine();
    let resolver = FakeResolver {
        entries: vec![Err("private".into()), Err("gone".into())],
        fail_whole_url: false,
    };

    let added = engine.enqueue_from(&resolver, "url").await.unwrap();
    assert_eq!(added, 0);
}

#[tokio::test]
async fn whole_url_failure_aborts_the_request() {
    let (engine, sink, _) = new_engine();
    let resolver = FakeResolver::failing();

    let result = engine.enqueue_from(&resolver, "url").await;
    assert!(result.is_err());
    assert_eq!(sink.play_count.load(Ordering::SeqCst), 0);
    assert_eq!(engine.state().await, PlaybackState::Idle);
}

#[tokio::test]
async fn failed_play_skips_the_track_and_continues() {
    let (engine, sink, notifier) = new_engine();
    sink.fail_next_play.store(true, Ordering::SeqCst);

    let resolver = FakeResolver::with_tracks(&["broken", "fine"]);
    engine.enqueue_from(&resolver, "url").await.unwrap();

    // The first play call fails before recording; only the second lands.
    sink.wait_for_play().await;
    assert_eq!(sink.played().await, vec!["https://cdn.example/fine"]);

    let messages = notifier.messages.lock().await.clone();
    assert!(messages.iter().any(|m| m.starts_with("Skipping broken")));
}

#[tokio::test]
async fn dropped_end_signal_does_not_deadlock_the_loop() {
    let (engine, sink, _) = new_engine();
    sink.drop_end_signal.store(true, Ordering::SeqCst);

    let resolver = FakeResolver::with_tracks(&["a", "b"]);
    engine.enqueue_from(&resolver, "url").await.unwrap();

    timeout(WAIT, async {
        while sink.play_count.load(Ordering::SeqCst) < 2 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("loop hung after the sink dropped a completion signal");
}

#[tokio::test]
async fn queue_lines_list_current_then_pending() {
    let (engine, sink, _) = new_engine();
    let resolver = FakeResolver::with_tracks(&["now", "next", "later"]);
    engine.enqueue_from(&resolver, "url").await.unwrap();

    sink.wait_for_play().await;
    wait_for_state(&engine, |state| state.current_title() == Some("now")).await;

    assert_eq!(engine.queue_lines().await, vec!["now", "next", "later"]);
}

#[tokio::test]
async fn racing_creates_exactly_one_engine_with_one_queue() {
    let registry = Arc::new(PlayerRegistry::new());
    let guild = GuildId::new(7);
    let sink = Arc::new(FakeSink::default());
    let creations = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::new();
    for _ in 0..2 {
        let registry = Arc::clone(&registry);
        let sink = Arc::clone(&sink);
        let creations = Arc::clone(&creations);
        handles.push(tokio::spawn(async move {
            let engine = registry.get_or_create(guild, || {
                creations.fetch_add(1, Ordering::SeqCst);
                PlayerEngine::new(sink, Arc::new(RecordingNotifier::default()))
            });
            let resolver = FakeResolver::with_tracks(&["track"]);
            engine.enqueue_from(&resolver, "url").await.unwrap();
            engine
        }));
    }

    let first = handles.pop().unwrap().await.unwrap();
    let second = handles.pop().unwrap().await.unwrap();

    assert_eq!(creations.load(Ordering::SeqCst), 1);
    assert!(Arc::ptr_eq(&first, &second));

    // Both requests' tracks landed in the single queue: one is current, one
    // is pending.
    sink.wait_for_play().await;
    wait_for_state(&first, |state| state.current_title().is_some()).await;
    assert_eq!(first.queue_lines().await.len(), 2);
}

#[tokio::test]
async fn lookup_never_creates_an_engine() {
    let registry = PlayerRegistry::new();
    let guild = GuildId::new(9);

    assert!(registry.get(guild).is_none());
    assert!(registry.get(guild).is_none());
    assert!(!registry.remove(guild).await);
}

#[tokio::test]
async fn remove_tears_the_engine_down() {
    let registry = PlayerRegistry::new();
    let guild = GuildId::new(11);
    let sink = Arc::new(FakeSink::default());

    let engine = registry.get_or_create(guild, || {
        PlayerEngine::new(sink.clone(), Arc::new(RecordingNotifier::default()))
    });
    let resolver = FakeResolver::with_tracks(&["doomed"]);
    engine.enqueue_from(&resolver, "url").await.unwrap();

    assert!(registry.remove(guild).await);
    assert!(registry.get(guild).is_none());
    assert_eq!(engine.state().await, PlaybackState::Stopped);

    // Enqueueing after teardown lands nowhere.
    let late = FakeResolver::with_tracks(&["late"]);
    engine.enqueue_from(&late, "url").await.unwrap();
    assert_eq!(engine.queue_lines().await, Vec::<String>::new());
}
