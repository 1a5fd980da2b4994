//! Local filesystem track provider

use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use aria_core::{AriaError, Result, TrackInfo, TrackLocation, TrackProvider};
use rand::{thread_rng, Rng};
use tracing::debug;
use walkdir::WalkDir;

/// Codec tags the stub metadata generator rotates through
const STUB_CODECS: &[&str] = &["mp3", "aac", "m4a", "flac", "wav"];

/// Provider for `file://` locations
///
/// Listing walks one directory level and keeps `.mp3` entries. Metadata
/// is stubbed (the decode layer is simulated): titles come from a counter
/// owned by this instance, durations and codec tags are pseudo-random.
pub struct FsTrackProvider {
    /// Instance-scoped title counter, seeded at construction
    next_title_id: AtomicU32,
}

impl FsTrackProvider {
    /// Create a provider with a fresh title counter
    pub fn new() -> Self {
        Self {
            next_title_id: AtomicU32::new(0),
        }
    }
}

impl Default for FsTrackProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackProvider for FsTrackProvider {
    /// Enumerate `.mp3` files directly under the directory at `uri`
    ///
    /// A `uri` that points at a single file is returned as-is. Results are
    /// sorted so repeated listings are deterministic.
    fn list(&self, uri: &str) -> Result<Vec<TrackLocation>> {
        let location = TrackLocation::new(uri);
        let root = Path::new(location.path());
        if root.is_file() {
            return Ok(vec![location]);
        }

        let mut locations = Vec::new();
        for entry in WalkDir::new(root).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|err| AriaError::Io(err.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let is_mp3 = entry
                .path()
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("mp3"));
            if !is_mp3 {
                continue;
            }
            locations.push(TrackLocation::new(format!(
                "file://{}",
                entry.path().display()
            )));
        }
        locations.sort();
        debug!(uri, count = locations.len(), "listed directory");
        Ok(locations)
    }

    fn track_info(&self, location: &TrackLocation) -> Result<TrackInfo> {
        let id = self.next_title_id.fetch_add(1, Ordering::Relaxed);
        let mut rng = thread_rng();
        Ok(TrackInfo::new(
            location.clone(),
            format!("track_{id}"),
            id,
            Duration::from_secs(rng.gen_range(5..25)),
            STUB_CODECS[rng.gen_range(0..STUB_CODECS.len())],
        ))
    }
}
