//! Player control integration tests
//!
//! Exercises the transport state machine against real decode threads and a
//! real execution queue: the owner context runs on its own thread, exactly
//! as the CLI front end drives it.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use aria_core::{
    AriaError, ExecQueue, ProviderResolver, Result, TrackInfo, TrackLocation, TrackProvider,
};
use aria_playback::{PlayerConfig, PlayerControl, PlayerState};

// ===== Test Helpers =====

/// Provider with deterministic metadata and a configurable track length
struct ScriptedProvider {
    duration: Duration,
}

impl TrackProvider for ScriptedProvider {
    fn list(&self, uri: &str) -> Result<Vec<TrackLocation>> {
        Ok(vec![TrackLocation::new(uri)])
    }

    fn track_info(&self, location: &TrackLocation) -> Result<TrackInfo> {
        Ok(TrackInfo::new(
            location.clone(),
            location.path().to_string(),
            1,
            self.duration,
            "test",
        ))
    }
}

/// Player + queue wired the way the CLI wires them; the owner loop runs on
/// a dedicated thread and is joined on drop
struct Harness {
    player: Arc<PlayerControl>,
    owner: Option<JoinHandle<()>>,
}

impl Harness {
    fn new(config: PlayerConfig, track_duration: Duration) -> Self {
        let resolver = Arc::new(ProviderResolver::new());
        resolver
            .register("test", move || {
                Box::new(ScriptedProvider {
                    duration: track_duration,
                }) as Box<dyn TrackProvider>
            })
            .unwrap();

        let exec = Arc::new(ExecQueue::new());
        let owner = {
            let exec = Arc::clone(&exec);
            thread::spawn(move || exec.run())
        };
        let player = PlayerControl::new(config, exec, resolver);

        Self {
            player,
            owner: Some(owner),
        }
    }

    fn add(&self, names: &[&str]) {
        let locations = names
            .iter()
            .map(|name| TrackLocation::new(format!("test://{name}")))
            .collect();
        self.player.add_tracks(locations);
    }

    fn current_location(&self) -> Option<TrackLocation> {
        self.player
            .current_track_info()
            .ok()
            .map(|(track, _)| track.location)
    }

    fn wait_until(&self, what: &str, condition: impl Fn(&PlayerControl) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while Instant::now() < deadline {
            if condition(&self.player) {
                return;
            }
            thread::sleep(Duration::from_millis(20));
        }
        panic!("timed out waiting for: {what}");
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        self.player.exit();
        if let Some(owner) = self.owner.take() {
            owner.join().unwrap();
        }
    }
}

fn location(name: &str) -> TrackLocation {
    TrackLocation::new(format!("test://{name}"))
}

// ===== Transport State Machine =====

#[test]
fn test_play_on_empty_playlist_stays_stopped() {
    let harness = Harness::new(PlayerConfig::default(), Duration::from_secs(60));
    harness.player.play();
    assert_eq!(harness.player.state(), PlayerState::Stopped);
    assert!(matches!(
        harness.player.current_track_info(),
        Err(AriaError::NotFound(_))
    ));
}

#[test]
fn test_play_pause_resume_cycle() {
    let harness = Harness::new(PlayerConfig::default(), Duration::from_secs(60));
    harness.add(&["a"]);

    harness.player.play();
    assert_eq!(harness.player.state(), PlayerState::Playing);

    harness.player.pause();
    assert_eq!(harness.player.state(), PlayerState::Paused);

    // pausing again is a no-op, not a state change
    harness.player.pause();
    assert_eq!(harness.player.state(), PlayerState::Paused);

    harness.player.play();
    assert_eq!(harness.player.state(), PlayerState::Playing);

    harness.player.stop();
    assert_eq!(harness.player.state(), PlayerState::Stopped);
}

#[test]
fn test_stop_while_paused_does_not_hang() {
    let harness = Harness::new(PlayerConfig::default(), Duration::from_secs(60));
    harness.add(&["a"]);
    harness.player.play();
    harness.player.pause();

    let start = Instant::now();
    harness.player.stop();
    assert!(start.elapsed() < Duration::from_secs(2), "teardown stalled");
    assert_eq!(harness.player.state(), PlayerState::Stopped);
}

#[test]
fn test_manual_next_past_end_reaches_stopped() {
    let harness = Harness::new(PlayerConfig::default(), Duration::from_secs(60));
    harness.add(&["a", "b", "c"]);

    harness.player.play();
    assert_eq!(harness.current_location(), Some(location("a")));

    harness.player.next();
    assert_eq!(harness.current_location(), Some(location("b")));

    harness.player.next();
    assert_eq!(harness.current_location(), Some(location("c")));

    // fourth transport step walks off the end: stop and rewind
    harness.player.next();
    assert_eq!(harness.player.state(), PlayerState::Stopped);
    assert_eq!(harness.current_location(), Some(location("a")));
}

#[test]
fn test_previous_before_start_stops() {
    let harness = Harness::new(PlayerConfig::default(), Duration::from_secs(60));
    harness.add(&["a", "b"]);
    harness.player.play();
    harness.player.previous();
    assert_eq!(harness.player.state(), PlayerState::Stopped);
}

// ===== Auto-advance =====

#[test]
fn test_tracks_auto_advance_until_playlist_ends() {
    let harness = Harness::new(PlayerConfig::default(), Duration::from_millis(150));
    harness.add(&["a", "b", "c"]);

    harness.player.play();
    harness.wait_until("playback to run out", |player| {
        player.state() == PlayerState::Stopped
    });

    // cursor rewound to the first track after the natural stop
    assert_eq!(harness.current_location(), Some(location("a")));
}

#[test]
fn test_repeat_track_restarts_instead_of_advancing() {
    let config = PlayerConfig {
        repeat_track: true,
        ..PlayerConfig::default()
    };
    let harness = Harness::new(config, Duration::from_millis(150));
    harness.add(&["a", "b"]);

    harness.player.play();
    thread::sleep(Duration::from_millis(700));

    // several completions later we are still on the same track
    assert_eq!(harness.player.state(), PlayerState::Playing);
    assert_eq!(harness.current_location(), Some(location("a")));
}

#[test]
fn test_repeat_playlist_keeps_cycling() {
    let config = PlayerConfig {
        repeat_playlist: true,
        ..PlayerConfig::default()
    };
    let harness = Harness::new(config, Duration::from_millis(150));
    harness.add(&["a", "b"]);

    harness.player.play();
    thread::sleep(Duration::from_millis(900));

    // both tracks have finished at least once; playback must still be live
    assert_eq!(harness.player.state(), PlayerState::Playing);
}

// ===== Playlist Commands Through the Controller =====

#[test]
fn test_remove_current_track_rewinds_cursor() {
    let harness = Harness::new(PlayerConfig::default(), Duration::from_secs(60));
    harness.add(&["a", "b", "c"]);

    harness.player.play();
    harness.player.next();
    assert_eq!(harness.current_location(), Some(location("b")));

    harness.player.remove_track(location("b"));
    assert_eq!(harness.current_location(), Some(location("a")));
    assert_eq!(harness.player.playlist_tracks().len(), 2);
}

#[test]
fn test_remove_duplicates_through_controller() {
    let harness = Harness::new(PlayerConfig::default(), Duration::from_secs(60));
    harness.add(&["a", "b", "a"]);

    harness.player.remove_duplicate_tracks();
    let names: Vec<String> = harness
        .player
        .playlist_tracks()
        .iter()
        .map(|track| track.location.to_string())
        .collect();
    assert_eq!(names, ["test://a", "test://b"]);
}

#[test]
fn test_metadata_resolves_asynchronously() {
    let harness = Harness::new(PlayerConfig::default(), Duration::from_secs(42));
    harness.add(&["song"]);

    // stubs go in synchronously; the owner context fills them in later
    harness.wait_until("metadata to resolve", |player| {
        player
            .playlist_tracks()
            .first()
            .is_some_and(|track| !track.title.is_empty())
    });

    let track = &harness.player.playlist_tracks()[0];
    assert_eq!(track.title, "song");
    assert_eq!(track.codec, "test");
    assert_eq!(track.duration, Duration::from_secs(42));
}

#[test]
fn test_unresolvable_track_is_skipped() {
    let harness = Harness::new(PlayerConfig::default(), Duration::from_secs(60));
    harness
        .player
        .add_tracks(vec![TrackLocation::new("bogus://x"), location("good")]);

    harness.player.play();
    harness.wait_until("the playable track to start", |player| {
        player.state() == PlayerState::Playing
    });
    assert_eq!(harness.current_location(), Some(location("good")));
}

// ===== Elapsed Time =====

#[test]
fn test_elapsed_time_advances_and_freezes_on_pause() {
    let harness = Harness::new(PlayerConfig::default(), Duration::from_secs(60));
    harness.add(&["a"]);

    harness.player.play();
    harness.wait_until("elapsed time to tick", |player| {
        player
            .current_track_info()
            .is_ok_and(|(_, elapsed)| elapsed >= Duration::from_secs(1))
    });

    harness.player.pause();
    thread::sleep(Duration::from_millis(150)); // let an in-flight tick land
    let (_, frozen) = harness.player.current_track_info().unwrap();
    thread::sleep(Duration::from_millis(400));
    let (_, still) = harness.player.current_track_info().unwrap();
    assert_eq!(frozen, still);
}

#[test]
fn test_elapsed_time_is_zero_when_stopped() {
    let harness = Harness::new(PlayerConfig::default(), Duration::from_secs(60));
    harness.add(&["a"]);

    let (_, elapsed) = harness.player.current_track_info().unwrap();
    assert_eq!(elapsed, Duration::ZERO);
}

// ===== Restart =====

#[test]
fn test_restart_replays_current_track() {
    let harness = Harness::new(PlayerConfig::default(), Duration::from_secs(60));
    harness.add(&["a", "b"]);

    harness.player.play();
    harness.player.next();
    harness.player.restart_current_track();

    assert_eq!(harness.player.state(), PlayerState::Playing);
    assert_eq!(harness.current_location(), Some(location("b")));
}
