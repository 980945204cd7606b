//! The chat command surface. Thin glue: each command translates into calls
//! on the player registry and replies with a plain message. The reply
//! strings are a user-facing contract and are kept verbatim.

pub mod help;
pub mod pause;
pub mod ping;
pub mod play;
pub mod queue;
pub mod resume;
pub mod skip;
pub mod stop;
pub mod utils;

pub use help::show_commands;
pub use pause::pause;
pub use ping::ping;
pub use play::play;
pub use queue::queue;
pub use resume::resume;
pub use skip::skip;
pub use stop::stop;

/// Reply for a completed play request.
pub fn songs_added_line(added: usize) -> String {
    if added == 0 {
        "No playable songs found.".to_string()
    } else {
        format!("{added} song(s) added to queue.")
    }
}
