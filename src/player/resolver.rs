use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Deserialize;
use serenity::async_trait;
use tokio::process::Command;
use tracing::{debug, info};
use url::Url;

use super::track::{TempAudioFile, Track};
use super::{PlayerError, PlayerResult};

/// How resolved entries are turned into playable handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AcquireMode {
    /// Stream straight from the extracted audio URL.
    #[default]
    Stream,
    /// Download each entry to a temp file before playback.
    Download,
}

impl FromStr for AcquireMode {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "stream" => Ok(AcquireMode::Stream),
            "download" => Ok(AcquireMode::Download),
            other => Err(format!("expected 'stream' or 'download', got '{other}'")),
        }
    }
}

/// Boundary to the external media resolver. The outer error means the URL
/// could not be enumerated at all and the whole request is aborted; inner
/// errors are individual entries that could not be made playable, which the
/// caller skips and counts around.
#[async_trait]
pub trait TrackResolver: Send + Sync {
    async fn resolve(&self, url: &str) -> PlayerResult<Vec<PlayerResult<Track>>>;
}

/// Returns whether the link points at the supported provider. Checked before
/// the resolver runs and before any engine is created.
pub fn is_supported_url(input: &str) -> bool {
    Url::parse(input)
        .ok()
        .and_then(|url| url.host_str().map(str::to_ascii_lowercase))
        .is_some_and(|host| host == "soundcloud.com" || host.ends_with(".soundcloud.com"))
}

#[derive(Debug, Deserialize)]
struct YtDlpFormat {
    url: Option<String>,
    acodec: Option<String>,
    vcodec: Option<String>,
}

#[derive(Debug, Deserialize)]
struct YtDlpEntry {
    title: Option<String>,
    url: Option<String>,
    #[serde(default)]
    formats: Vec<YtDlpFormat>,
    is_private: Option<bool>,
    availability: Option<String>,
}

impl YtDlpEntry {
    fn is_unavailable(&self) -> bool {
        self.is_private.unwrap_or(false) || self.availability.as_deref() == Some("private")
    }

    /// Best audio-only format: audio codec present, no video codec, scanning
    /// from the end where yt-dlp lists the higher-quality formats. Falls
    /// back to the entry-level URL.
    fn best_audio_url(&self) -> Option<String> {
        self.formats
            .iter()
            .rev()
            .find(|format| {
                format.acodec.as_deref() != Some("none")
                    && format.vcodec.as_deref() == Some("none")
                    && format.url.is_some()
            })
            .and_then(|format| format.url.clone())
            .or_else(|| self.url.clone())
    }
}

/// Either a single track or a playlist with (possibly null) entries.
#[derive(Debug, Deserialize)]
struct YtDlpDocument {
    entries: Option<Vec<Option<YtDlpEntry>>>,
    #[serde(flatten)]
    single: YtDlpEntry,
}

impl YtDlpDocument {
    fn into_entries(self) -> Vec<YtDlpEntry> {
        match self.entries {
            Some(entries) => entries.into_iter().flatten().collect(),
            None => vec![self.single],
        }
    }
}

/// Resolves URLs by shelling out to yt-dlp, the same extractor the bot's
/// SoundCloud support has always relied on.
pub struct YtDlpResolver {
    mode: AcquireMode,
    temp_dir: PathBuf,
    counter: AtomicU64,
}

impl YtDlpResolver {
    pub fn new(mode: AcquireMode) -> Self {
        Self {
            mode,
            temp_dir: std::env::temp_dir(),
            counter: AtomicU64::new(0),
        }
    }

    async fn extract(&self, url: &str) -> PlayerResult<YtDlpDocument> {
        let output = Command::new("yt-dlp")
            .args([
                "--dump-single-json",
                "--no-warnings",
                "--ignore-errors",
                "--format",
                "bestaudio/best",
                url,
            ])
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|err| PlayerError::Resolve(format!("failed to run yt-dlp: {err}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PlayerError::Resolve(stderr.trim().to_string()));
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|err| PlayerError::Resolve(format!("unexpected yt-dlp output: {err}")))
    }

    async fn acquire(&self, entry: &YtDlpEntry) -> PlayerResult<Track> {
        if entry.is_unavailable() {
            return Err(PlayerError::Unplayable("entry is private".into()));
        }

        let title = entry.title.clone().unwrap_or_else(|| "Unknown".to_string());
        let audio_url = entry
            .best_audio_url()
            .ok_or_else(|| PlayerError::Unplayable(format!("no audio stream for '{title}'")))?;

        match self.mode {
            AcquireMode::Stream => Ok(Track::stream(title, audio_url)),
            AcquireMode::Download => {
                let path = self.temp_path();
                self.download(&audio_url, &path).await?;
                info!("downloaded '{title}' to {}", path.display());
                Ok(Track::file(title, TempAudioFile::new(path)))
            }
        }
    }

    fn temp_path(&self) -> PathBuf {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        self.temp_dir
            .join(format!("surfbot-{}-{n}.audio", std::process::id()))
    }

    async fn download(&self, audio_url: &str, path: &Path) -> PlayerResult<()> {
        let status = Command::new("yt-dlp")
            .args(["--no-warnings", "--quiet", "--output"])
            .arg(path)
            .arg(audio_url)
            .stdin(Stdio::null())
            .status()
            .await
            .map_err(|err| PlayerError::Resolve(format!("failed to run yt-dlp: {err}")))?;

        if !status.success() {
            return Err(PlayerError::Unplayable(format!(
                "download failed for {audio_url}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl TrackResolver for YtDlpResolver {
    async fn resolve(&self, url: &str) -> PlayerResult<Vec<PlayerResult<Track>>> {
        let entries = self.extract(url).await?.into_entries();
        debug!("resolved {url} to {} entr(ies)", entries.len());

        // Entries are acquired serially, so enqueue order is playlist order.
        let mut tracks = Vec::with_capacity(entries.len());
        for entry in &entries {
            tracks.push(self.acquire(entry).await);
        }
        Ok(tracks)
    }
}
