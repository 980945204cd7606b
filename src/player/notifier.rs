use serenity::async_trait;

/// Outbound chat messages that originate from the playback loop rather than
/// from a command, e.g. "Now playing: ...".
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivery failures are the implementation's problem to log; the
    /// playback loop never fails on them.
    async fn notify(&self, text: &str);
}
