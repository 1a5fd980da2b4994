//! Core types for playback control

use serde::{Deserialize, Serialize};

/// Transport state of the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    /// No track loaded
    Stopped,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,
}

/// Origin for playlist cursor seeks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekMode {
    /// Absolute position from the start of the playback order
    Begin,

    /// Offset relative to the cursor
    Current,
}

/// Initial settings for the player
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Replay the current track instead of advancing (default: false)
    pub repeat_track: bool,

    /// Wrap to the first track after the last (default: false)
    pub repeat_playlist: bool,

    /// Randomized playback order (default: false)
    pub random: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlayerConfig::default();
        assert!(!config.repeat_track);
        assert!(!config.repeat_playlist);
        assert!(!config.random);
    }
}
