//! Core value types for track identity and metadata

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Opaque identifier for a track (e.g. `file:///music/song.mp3`)
///
/// Locations compare and hash by exact string value; they are the identity
/// of a track everywhere in the player (playlist membership, removal,
/// metadata updates). No normalization is applied: `file:///a.mp3` and
/// `file:///A.mp3` are two different tracks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrackLocation(String);

impl TrackLocation {
    /// Create a location from a URI string
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// The raw URI string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// URI scheme: the text before `://`, `None` for schemeless locations
    pub fn scheme(&self) -> Option<&str> {
        self.0.split_once("://").map(|(scheme, _)| scheme)
    }

    /// The part after the scheme separator, or the whole URI when no
    /// scheme is present
    pub fn path(&self) -> &str {
        self.0
            .split_once("://")
            .map_or(self.0.as_str(), |(_, path)| path)
    }
}

impl fmt::Display for TrackLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrackLocation {
    fn from(uri: &str) -> Self {
        Self::new(uri)
    }
}

impl From<String> for TrackLocation {
    fn from(uri: String) -> Self {
        Self::new(uri)
    }
}

/// Track metadata attached to a playlist entry
///
/// Tracks enter the playlist as unresolved stubs (location only); metadata
/// is filled in later by a provider, possibly asynchronously. `codec` stays
/// empty until resolution happens.
///
/// Equality compares **locations only**: two `TrackInfo` values describing
/// the same location are the same track regardless of metadata state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackInfo {
    /// Where the track lives; the track's identity
    pub location: TrackLocation,

    /// Track title, empty until resolved
    pub title: String,

    /// Track number in its collection
    pub track_number: u32,

    /// Declared playing time, second granularity
    pub duration: Duration,

    /// Codec name (e.g. `mp3`), empty until resolved
    pub codec: String,
}

impl TrackInfo {
    /// Create a fully resolved track description
    pub fn new(
        location: TrackLocation,
        title: impl Into<String>,
        track_number: u32,
        duration: Duration,
        codec: impl Into<String>,
    ) -> Self {
        Self {
            location,
            title: title.into(),
            track_number,
            duration,
            codec: codec.into(),
        }
    }

    /// Create a metadata-less stub for a freshly added location
    pub fn unresolved(location: TrackLocation) -> Self {
        Self {
            location,
            title: String::new(),
            track_number: 0,
            duration: Duration::ZERO,
            codec: String::new(),
        }
    }
}

impl PartialEq for TrackInfo {
    fn eq(&self, other: &Self) -> bool {
        self.location == other.location
    }
}

impl Eq for TrackInfo {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_scheme_parsing() {
        let location = TrackLocation::new("file:///music/song.mp3");
        assert_eq!(location.scheme(), Some("file"));
        assert_eq!(location.path(), "/music/song.mp3");

        let schemeless = TrackLocation::new("hello.music");
        assert_eq!(schemeless.scheme(), None);
        assert_eq!(schemeless.path(), "hello.music");
    }

    #[test]
    fn location_equality_is_exact() {
        assert_eq!(
            TrackLocation::new("file:///a.mp3"),
            TrackLocation::new("file:///a.mp3")
        );
        assert_ne!(
            TrackLocation::new("file:///a.mp3"),
            TrackLocation::new("file:///A.mp3")
        );
    }

    #[test]
    fn track_equality_ignores_metadata() {
        let location = TrackLocation::new("file:///a.mp3");
        let stub = TrackInfo::unresolved(location.clone());
        let resolved = TrackInfo::new(location, "Title", 3, Duration::from_secs(42), "mp3");
        assert_eq!(stub, resolved);

        let other = TrackInfo::unresolved(TrackLocation::new("file:///b.mp3"));
        assert_ne!(stub, other);
    }

    #[test]
    fn unresolved_stub_is_empty() {
        let track = TrackInfo::unresolved(TrackLocation::new("x"));
        assert!(track.title.is_empty());
        assert!(track.codec.is_empty());
        assert_eq!(track.track_number, 0);
        assert_eq!(track.duration, Duration::ZERO);
    }
}
