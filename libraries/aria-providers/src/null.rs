//! Fallback provider for schemeless locations

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use aria_core::{Result, TrackInfo, TrackLocation, TrackProvider};
use rand::{thread_rng, Rng};

/// Provider of last resort, registered as the resolver's default
///
/// Treats any location as a single playable track with stubbed metadata.
/// Useful for schemeless locations (`hello.music`) and for exercising the
/// player without touching the filesystem.
pub struct NullTrackProvider {
    /// Instance-scoped title counter, seeded at construction
    next_title_id: AtomicU32,
}

impl NullTrackProvider {
    /// Create a provider with a fresh title counter
    pub fn new() -> Self {
        Self {
            next_title_id: AtomicU32::new(0),
        }
    }
}

impl Default for NullTrackProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackProvider for NullTrackProvider {
    fn list(&self, uri: &str) -> Result<Vec<TrackLocation>> {
        Ok(vec![TrackLocation::new(uri)])
    }

    fn track_info(&self, location: &TrackLocation) -> Result<TrackInfo> {
        let id = self.next_title_id.fetch_add(1, Ordering::Relaxed);
        Ok(TrackInfo::new(
            location.clone(),
            format!("track_{id}"),
            id,
            Duration::from_secs(thread_rng().gen_range(5..25)),
            "null",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_echoes_the_location() {
        let provider = NullTrackProvider::new();
        let listed = provider.list("hello.music").unwrap();
        assert_eq!(listed, vec![TrackLocation::new("hello.music")]);
    }

    #[test]
    fn metadata_is_stubbed_per_instance() {
        let provider = NullTrackProvider::new();
        let location = TrackLocation::new("hello.music");
        let first = provider.track_info(&location).unwrap();
        let second = provider.track_info(&location).unwrap();
        assert_eq!(first.title, "track_0");
        assert_eq!(second.title, "track_1");
        assert_eq!(first.codec, "null");
    }
}
