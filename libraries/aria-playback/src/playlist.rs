//! Playlist sequencing engine
//!
//! Keeps tracks in their insertion ("real") order and traverses them either
//! in that order or through a random permutation. The cursor is always a
//! *playback-order* position: a real index while random mode is off, a slot
//! into the permutation while it is on.

use std::collections::{HashMap, HashSet};

use aria_core::{AriaError, Result, TrackInfo, TrackLocation};
use rand::seq::SliceRandom;
use rand::{thread_rng, Rng};
use tracing::debug;

use crate::types::SeekMode;

/// Ordered track collection with cursor, repeat flags, and an optional
/// random permutation layer
///
/// Invariants:
/// - the cursor stays in `[0, len)` once the playlist is non-empty, `0`
///   when it is empty;
/// - while random mode is on, `permutation` is a valid permutation of
///   `[0, len)`.
#[derive(Debug, Default)]
pub struct Playlist {
    /// Tracks in insertion order; this order is never rearranged
    tracks: Vec<TrackInfo>,

    /// Cursor into the playback order
    current: usize,

    /// Replay the current track instead of advancing
    repeat_track: bool,

    /// Wrap to the first track after the last
    repeat_playlist: bool,

    /// Whether the permutation layer is consulted
    random: bool,

    /// Playback position -> real index; empty while random mode is off
    permutation: Vec<usize>,
}

impl Playlist {
    /// Create an empty playlist
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the playlist holds no tracks
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Append metadata-unresolved stubs for `locations`, in the given order
    ///
    /// In random mode each new track is inserted at a uniformly random
    /// playback position; the relative order of the already-permuted
    /// entries is left untouched. A full reshuffle never happens on
    /// insert.
    pub fn add_tracks(&mut self, locations: &[TrackLocation]) {
        for location in locations {
            let real_index = self.tracks.len();
            self.tracks.push(TrackInfo::unresolved(location.clone()));
            if self.random {
                let slot = thread_rng().gen_range(0..=self.permutation.len());
                self.permutation.insert(slot, real_index);
            }
        }
    }

    /// Replace metadata in place for every track whose location is a key
    /// in `updates`
    ///
    /// Ordering, cursor, and permutation are unaffected.
    pub fn set_track_info(&mut self, updates: &HashMap<TrackLocation, TrackInfo>) {
        for track in &mut self.tracks {
            if let Some(info) = updates.get(&track.location) {
                track.title = info.title.clone();
                track.track_number = info.track_number;
                track.duration = info.duration;
                track.codec = info.codec.clone();
            }
        }
    }

    /// Remove every track whose location is in `locations`
    pub fn remove_tracks(&mut self, locations: &HashSet<TrackLocation>) {
        self.remove_if(|track| locations.contains(&track.location));
    }

    /// Remove repeated locations, keeping the first occurrence (in real
    /// order) of each
    pub fn remove_duplicates(&mut self) {
        let mut seen = HashSet::new();
        self.remove_if(move |track| !seen.insert(track.location.clone()));
    }

    /// Remove every track matching `predicate`, in one pass
    ///
    /// Survivors keep their relative real order. If the cursor's track
    /// survives, the cursor follows it to its new playback position;
    /// otherwise the cursor resets to `0`.
    ///
    /// Known limitation: in random mode the permutation is fully
    /// reshuffled, losing the existing playback order. Slots shift under
    /// the survivors, and maintaining permutation continuity across
    /// removal is an open problem (insertion preserves it, removal does
    /// not).
    fn remove_if(&mut self, mut predicate: impl FnMut(&TrackInfo) -> bool) {
        let previous_location = self.current_track().map(|track| track.location);

        self.tracks.retain(|track| !predicate(track));
        if self.random {
            self.reshuffle();
        }

        self.current = previous_location
            .and_then(|location| self.playback_position_of(&location))
            .unwrap_or(0);
        debug!(
            remaining = self.tracks.len(),
            cursor = self.current,
            "playlist pruned"
        );
    }

    /// Tracks in playback order: real order, or permutation order while
    /// random mode is on
    pub fn tracks(&self) -> Vec<TrackInfo> {
        if self.random {
            self.permutation
                .iter()
                .map(|&real| self.tracks[real].clone())
                .collect()
        } else {
            self.tracks.clone()
        }
    }

    /// Move the cursor and return the newly selected track
    ///
    /// `SeekMode::Begin` jumps to absolute position `delta` (`delta` must
    /// be a valid position; the cursor does not move on failure).
    /// `SeekMode::Current` advances the cursor by `delta`:
    /// - repeat-track re-selects the current track without moving the
    ///   cursor and always succeeds (it wins over every other seek rule);
    /// - seeking before the start clamps the cursor to `0` and fails;
    /// - seeking past the end wraps to `0` and succeeds when
    ///   repeat-playlist is on, otherwise clamps to `0` and fails.
    ///
    /// All failures are `NotFound`; an empty playlist always fails.
    pub fn seek_track(&mut self, delta: i64, mode: SeekMode) -> Result<TrackInfo> {
        if self.tracks.is_empty() {
            return Err(AriaError::not_found("playlist is empty"));
        }

        match mode {
            SeekMode::Begin => {
                if delta < 0 || delta as usize >= self.tracks.len() {
                    return Err(AriaError::not_found(format!("no track at position {delta}")));
                }
                self.current = delta as usize;
                Ok(self.track_at_cursor())
            }
            SeekMode::Current => {
                if self.repeat_track {
                    return Ok(self.track_at_cursor());
                }

                let target = self.current as i64 + delta;
                if target < 0 {
                    self.current = 0;
                    Err(AriaError::not_found("seek before start of playlist"))
                } else if target as usize >= self.tracks.len() {
                    self.current = 0;
                    if self.repeat_playlist {
                        Ok(self.track_at_cursor())
                    } else {
                        Err(AriaError::not_found("end of playlist"))
                    }
                } else {
                    self.current = target as usize;
                    Ok(self.track_at_cursor())
                }
            }
        }
    }

    /// The track under the cursor, `None` when the playlist is empty
    pub fn current_track(&self) -> Option<TrackInfo> {
        if self.tracks.is_empty() {
            None
        } else {
            Some(self.track_at_cursor())
        }
    }

    /// Tracks left after the cursor, by the same notion of "end" that
    /// [`seek_track`](Self::seek_track) uses (repeat flags not applied)
    pub fn remaining(&self) -> usize {
        if self.tracks.is_empty() {
            0
        } else {
            self.tracks.len() - 1 - self.current
        }
    }

    /// Enable or disable randomized playback order
    ///
    /// Enabling performs a full shuffle into a fresh permutation;
    /// disabling simply stops consulting it. The cursor's numeric value is
    /// preserved in both directions, so the *selected track* may change
    /// across a toggle: the same position maps through a different order.
    pub fn set_mode_random(&mut self, enabled: bool) {
        if enabled == self.random {
            return;
        }
        self.random = enabled;
        if enabled {
            self.reshuffle();
        } else {
            self.permutation.clear();
        }
    }

    /// Whether randomized playback order is active
    pub fn is_mode_random(&self) -> bool {
        self.random
    }

    /// Replay the current track instead of advancing
    pub fn set_repeat_track_enabled(&mut self, enabled: bool) {
        self.repeat_track = enabled;
    }

    /// Wrap to the first track after the last instead of stopping
    pub fn set_repeat_playlist_enabled(&mut self, enabled: bool) {
        self.repeat_playlist = enabled;
    }

    /// Rebuild the permutation from scratch (Fisher-Yates over all real
    /// indices)
    fn reshuffle(&mut self) {
        self.permutation = (0..self.tracks.len()).collect();
        self.permutation.shuffle(&mut thread_rng());
    }

    /// Real index the cursor maps to
    fn cursor_real_index(&self) -> usize {
        if self.random {
            self.permutation[self.current]
        } else {
            self.current
        }
    }

    /// The track under the cursor; the playlist must be non-empty
    fn track_at_cursor(&self) -> TrackInfo {
        self.tracks[self.cursor_real_index()].clone()
    }

    /// Playback position of the first track with `location`, if present
    fn playback_position_of(&self, location: &TrackLocation) -> Option<usize> {
        let real = self
            .tracks
            .iter()
            .position(|track| &track.location == location)?;
        if self.random {
            self.permutation.iter().position(|&index| index == real)
        } else {
            Some(real)
        }
    }
}
