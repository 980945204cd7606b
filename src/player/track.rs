use std::path::{Path, PathBuf};

use tracing::warn;

/// Where a track's audio bytes come from.
#[derive(Debug)]
pub enum AudioHandle {
    /// Direct audio URL, streamed at playback time.
    Stream(String),
    /// Audio downloaded ahead of playback.
    File(PathBuf),
}

/// A file on disk owned by exactly one track, removed when the track is
/// dropped. Removal failures are logged and never fatal.
#[derive(Debug)]
pub struct TempAudioFile {
    path: PathBuf,
}

impl TempAudioFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempAudioFile {
    fn drop(&mut self) {
        if let Err(err) = std::fs::remove_file(&self.path) {
            warn!(
                "failed to remove temp audio file {}: {err}",
                self.path.display()
            );
        }
    }
}

/// One playable audio unit. Immutable once created.
#[derive(Debug)]
pub struct Track {
    pub title: String,
    pub handle: AudioHandle,
    temp: Option<TempAudioFile>,
}

impl Track {
    /// A track streamed straight from an extracted audio URL.
    pub fn stream(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            handle: AudioHandle::Stream(url.into()),
            temp: None,
        }
    }

    /// A track backed by a downloaded temp file; the file lives exactly as
    /// long as the track does.
    pub fn file(title: impl Into<String>, temp: TempAudioFile) -> Self {
        Self {
            title: title.into(),
            handle: AudioHandle::File(temp.path().to_path_buf()),
            temp: Some(temp),
        }
    }

    pub fn has_temp_file(&self) -> bool {
        self.temp.is_some()
    }
}
