//! Transport control - core orchestration
//!
//! `PlayerControl` serializes transport commands against a single "now
//! playing" slot: one mutex guards the playlist, the transport state, and
//! the live decoder reference. The decode thread never calls back into the
//! controller directly; its completion event travels through the
//! single-writer [`ExecQueue`], so completions can never race a command
//! that is mid-flight on another thread.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use aria_core::{
    AriaError, ExecQueue, ProviderResolver, Result, TrackInfo, TrackLocation, TrackProvider,
};
use tracing::{debug, info, warn};

use crate::decoder::Decoder;
use crate::playlist::Playlist;
use crate::types::{PlayerConfig, PlayerState, SeekMode};

/// State owned by the controller lock
struct PlayerInner {
    state: PlayerState,
    playlist: Playlist,
    /// At most one decode task lives at a time; replacing it drops (and
    /// joins) the previous one first
    decoder: Option<Decoder>,
}

/// Playback controller: transport state machine over playlist + decoder
///
/// All public operations take the controller lock for their full duration.
/// The lock is never held while running user-supplied code, and the decode
/// thread never takes it, so joining a decoder under the lock cannot
/// deadlock.
///
/// When a track ends on its own, the decoder's completion callback pushes
/// an "advance" event onto the execution queue; the owner context drains
/// it and calls [`next`](Self::next), which with repeat-track enabled
/// re-selects and restarts the same track.
pub struct PlayerControl {
    inner: Mutex<PlayerInner>,
    exec: Arc<ExecQueue>,
    resolver: Arc<ProviderResolver>,
    self_ref: Weak<PlayerControl>,
}

impl PlayerControl {
    /// Create a controller with an empty playlist
    pub fn new(
        config: PlayerConfig,
        exec: Arc<ExecQueue>,
        resolver: Arc<ProviderResolver>,
    ) -> Arc<Self> {
        let mut playlist = Playlist::new();
        playlist.set_repeat_track_enabled(config.repeat_track);
        playlist.set_repeat_playlist_enabled(config.repeat_playlist);
        playlist.set_mode_random(config.random);

        Arc::new_cyclic(|self_ref| Self {
            inner: Mutex::new(PlayerInner {
                state: PlayerState::Stopped,
                playlist,
                decoder: None,
            }),
            exec,
            resolver,
            self_ref: self_ref.clone(),
        })
    }

    /// Start playback, or resume from pause
    ///
    /// No-op while already playing. From stopped, selects the playlist's
    /// current track and starts a decode task for it; an empty playlist
    /// leaves the player stopped.
    pub fn play(&self) {
        let mut inner = self.inner.lock().unwrap();
        match inner.state {
            PlayerState::Paused => {
                if let Some(decoder) = inner.decoder.as_mut() {
                    decoder.unpause();
                }
                inner.state = PlayerState::Playing;
            }
            PlayerState::Playing => {}
            PlayerState::Stopped => match inner.playlist.seek_track(0, SeekMode::Current) {
                Ok(track) => self.start_track(&mut inner, track.location),
                Err(err) => {
                    debug!("nothing to play: {err}");
                    Self::stop_and_rewind(&mut inner);
                }
            },
        }
    }

    /// Pause the live decode task; only effective while playing
    pub fn pause(&self) {
        let mut inner = self.inner.lock().unwrap();
        if inner.state != PlayerState::Playing {
            return;
        }
        if let Some(decoder) = inner.decoder.as_mut() {
            decoder.pause();
            inner.state = PlayerState::Paused;
        }
    }

    /// Stop playback and rewind the playlist cursor to the beginning
    pub fn stop(&self) {
        let mut inner = self.inner.lock().unwrap();
        Self::stop_and_rewind(&mut inner);
    }

    /// Advance to the next track in playback order
    ///
    /// Seek failure (end of playlist without repeat) stops the player.
    pub fn next(&self) {
        self.advance(1);
    }

    /// Go back to the previous track in playback order
    pub fn previous(&self) {
        self.advance(-1);
    }

    /// Restart the current track from the top
    pub fn restart_current_track(&self) {
        let mut inner = self.inner.lock().unwrap();
        match inner.playlist.current_track() {
            Some(track) => self.start_track(&mut inner, track.location),
            None => Self::stop_and_rewind(&mut inner),
        }
    }

    /// Append locations to the playlist
    ///
    /// Returns immediately; metadata resolution runs later on the owner
    /// context so the command never blocks on provider I/O. Tracks whose
    /// provider cannot be resolved keep their stub metadata.
    pub fn add_tracks(&self, locations: Vec<TrackLocation>) {
        if locations.is_empty() {
            return;
        }
        {
            let mut inner = self.inner.lock().unwrap();
            inner.playlist.add_tracks(&locations);
        }
        info!(count = locations.len(), "tracks added");

        let resolver = Arc::clone(&self.resolver);
        let player = self.self_ref.clone();
        self.exec.push(move || {
            let mut providers: HashMap<String, Box<dyn TrackProvider>> = HashMap::new();
            let mut updates = HashMap::new();
            for location in locations {
                let scheme = location.scheme().unwrap_or_default().to_string();
                let provider = match providers.entry(scheme) {
                    Entry::Occupied(entry) => entry.into_mut(),
                    Entry::Vacant(entry) => match resolver.resolve(&location) {
                        Ok(provider) => entry.insert(provider),
                        Err(err) => {
                            warn!(%location, "metadata resolution skipped: {err}");
                            continue;
                        }
                    },
                };
                match provider.track_info(&location) {
                    Ok(info) => {
                        updates.insert(location, info);
                    }
                    Err(err) => warn!(%location, "metadata resolution failed: {err}"),
                }
            }

            if updates.is_empty() {
                return;
            }
            if let Some(player) = player.upgrade() {
                let mut inner = player.inner.lock().unwrap();
                inner.playlist.set_track_info(&updates);
            }
        });
    }

    /// Remove every playlist entry at `location`
    pub fn remove_track(&self, location: TrackLocation) {
        let mut inner = self.inner.lock().unwrap();
        inner.playlist.remove_tracks(&HashSet::from([location]));
    }

    /// Remove repeated locations, keeping each first occurrence
    pub fn remove_duplicate_tracks(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.playlist.remove_duplicates();
    }

    /// The current track plus elapsed play time (zero when no decode task
    /// is live); `NotFound` when the playlist is empty
    pub fn current_track_info(&self) -> Result<(TrackInfo, Duration)> {
        let inner = self.inner.lock().unwrap();
        let track = inner
            .playlist
            .current_track()
            .ok_or_else(|| AriaError::not_found("playlist is empty"))?;
        let elapsed = inner
            .decoder
            .as_ref()
            .map_or(Duration::ZERO, |decoder| decoder.played_time());
        Ok((track, elapsed))
    }

    /// Snapshot of the playlist in playback order
    pub fn playlist_tracks(&self) -> Vec<TrackInfo> {
        self.inner.lock().unwrap().playlist.tracks()
    }

    /// Current transport state
    pub fn state(&self) -> PlayerState {
        self.inner.lock().unwrap().state
    }

    /// Replay the current track instead of advancing
    pub fn set_repeat_track_enabled(&self, enabled: bool) {
        let mut inner = self.inner.lock().unwrap();
        inner.playlist.set_repeat_track_enabled(enabled);
    }

    /// Wrap to the first track after the last instead of stopping
    pub fn set_repeat_playlist_enabled(&self, enabled: bool) {
        let mut inner = self.inner.lock().unwrap();
        inner.playlist.set_repeat_playlist_enabled(enabled);
    }

    /// Enable or disable randomized playback order
    pub fn set_random_enabled(&self, enabled: bool) {
        let mut inner = self.inner.lock().unwrap();
        inner.playlist.set_mode_random(enabled);
    }

    /// Stop playback and shut down the execution queue
    ///
    /// Pending queued work still drains before the owner loop returns.
    pub fn exit(&self) {
        {
            let mut inner = self.inner.lock().unwrap();
            Self::stop_and_rewind(&mut inner);
        }
        self.exec.exit();
    }

    /// Seek by `delta` and play the selected track, stopping at the end
    /// of the playlist
    fn advance(&self, delta: i64) {
        let mut inner = self.inner.lock().unwrap();
        match inner.playlist.seek_track(delta, SeekMode::Current) {
            Ok(track) => self.start_track(&mut inner, track.location),
            Err(err) => {
                debug!("end of playlist: {err}");
                Self::stop_and_rewind(&mut inner);
            }
        }
    }

    /// Replace the live decode task with one for `location`
    ///
    /// An unresolvable provider skips the track: the advance goes through
    /// the execution queue rather than recursing into the playlist here.
    fn start_track(&self, inner: &mut PlayerInner, location: TrackLocation) {
        // only one decode task may live at a time: cancel and join the
        // old one before spawning its replacement
        inner.decoder = None;

        let provider = match self.resolver.resolve(&location) {
            Ok(provider) => provider,
            Err(err) => {
                warn!(%location, "skipping unplayable track: {err}");
                inner.state = PlayerState::Stopped;
                self.queue_advance();
                return;
            }
        };

        info!(%location, "playing");
        let on_completion = self.completion_handler(location.clone());
        inner.decoder = Some(Decoder::new(provider, location, on_completion));
        inner.state = PlayerState::Playing;
    }

    /// Completion callback for a decode task
    ///
    /// Runs on the decode thread just before it exits; it must not touch
    /// the controller directly, only hand the event to the owner context.
    fn completion_handler(
        &self,
        location: TrackLocation,
    ) -> impl FnOnce(Result<()>) + Send + 'static {
        let exec = Arc::clone(&self.exec);
        let player = self.self_ref.clone();
        move |outcome| {
            match outcome {
                Err(err) if err.is_cancelled() => {
                    // the command that cancelled us already decided the
                    // next state; nothing to schedule
                    debug!(%location, "decode task cancelled");
                    return;
                }
                Err(err) => warn!(%location, "decode failed, skipping track: {err}"),
                Ok(()) => debug!(%location, "track finished"),
            }
            exec.push(move || {
                if let Some(player) = player.upgrade() {
                    player.next();
                }
            });
        }
    }

    /// Schedule an advance on the owner context
    fn queue_advance(&self) {
        let player = self.self_ref.clone();
        self.exec.push(move || {
            if let Some(player) = player.upgrade() {
                player.next();
            }
        });
    }

    /// Tear down the live decode task, rewind, and mark the player stopped
    fn stop_and_rewind(inner: &mut PlayerInner) {
        // dropping the decoder cancels and joins its thread; the
        // completion it fires is a cancellation and is only logged
        inner.decoder = None;
        let _ = inner.playlist.seek_track(0, SeekMode::Begin);
        inner.state = PlayerState::Stopped;
    }
}

impl Drop for PlayerControl {
    fn drop(&mut self) {
        // a dropped controller must not leak a live decode thread
        if let Ok(mut inner) = self.inner.lock() {
            inner.decoder = None;
        }
    }
}
