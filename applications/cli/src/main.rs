//! Aria Player - command-line front end
//!
//! Thin interactive shell over [`PlayerControl`]. Commands arrive on
//! stdin, one per line; the main thread is the owner context and runs the
//! execution queue, so decoder completions and deferred metadata
//! resolution are applied here.

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::thread;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use aria_core::{ExecQueue, ProviderResolver, TrackLocation};
use aria_playback::{PlayerConfig, PlayerControl, PlayerState};
use aria_providers::{FsTrackProvider, NullTrackProvider};

#[derive(Parser)]
#[command(name = "aria")]
#[command(about = "Aria Player command-line interface", long_about = None)]
struct Cli {
    /// Locations to add to the playlist at startup (files, directories,
    /// or schemeless test names)
    locations: Vec<String>,

    /// Start with randomized playback order
    #[arg(long)]
    random: bool,

    /// Start with repeat-playlist enabled
    #[arg(long)]
    repeat_playlist: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let resolver = Arc::new(ProviderResolver::new());
    resolver
        .register("file://", || Box::new(FsTrackProvider::new()))
        .expect("file scheme is well-formed");
    resolver.register_default(|| Box::new(NullTrackProvider::new()));

    let exec = Arc::new(ExecQueue::new());
    let config = PlayerConfig {
        random: cli.random,
        repeat_playlist: cli.repeat_playlist,
        ..PlayerConfig::default()
    };
    let player = PlayerControl::new(config, Arc::clone(&exec), Arc::clone(&resolver));

    for uri in &cli.locations {
        add_location(&player, &resolver, uri);
    }

    let reader = {
        let player = Arc::clone(&player);
        let resolver = Arc::clone(&resolver);
        thread::spawn(move || command_loop(&player, &resolver))
    };

    // owner context: decoder completions and metadata resolution land here
    exec.run();
    reader.join().expect("command loop panicked");
}

fn command_loop(player: &PlayerControl, resolver: &ProviderResolver) {
    println!("Aria Player {}", env!("CARGO_PKG_VERSION"));
    println!("Type 'help' for the command list.");

    let stdin = io::stdin();
    loop {
        print!(">>> ");
        io::stdout().flush().ok();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => {
                // EOF behaves like an explicit exit
                player.exit();
                return;
            }
            Ok(_) => {}
            Err(err) => {
                eprintln!("stdin error: {err}");
                player.exit();
                return;
            }
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (command, params) = line
            .split_once(' ')
            .map_or((line, ""), |(command, params)| (command, params.trim()));
        debug!(command, params, "dispatching");

        if command == "exit" {
            player.exit();
            return;
        }
        dispatch(player, resolver, command, params);
    }
}

fn dispatch(player: &PlayerControl, resolver: &ProviderResolver, command: &str, params: &str) {
    match command {
        "play" => player.play(),
        "pause" => player.pause(),
        "stop" => player.stop(),
        "next" => player.next(),
        "previous" | "prev" => player.previous(),
        "restart" => player.restart_current_track(),
        "add" => add_location(player, resolver, params),
        "remove" => player.remove_track(TrackLocation::new(params)),
        "dedup" => player.remove_duplicate_tracks(),
        "random" => with_flag(params, |on| player.set_random_enabled(on)),
        "repeat-track" => with_flag(params, |on| player.set_repeat_track_enabled(on)),
        "repeat-playlist" => with_flag(params, |on| player.set_repeat_playlist_enabled(on)),
        "show" => show_playlist(player),
        "current" => show_current(player),
        "help" => print_help(),
        other => println!("Error: unknown command '{other}'"),
    }
}

/// Expand a location through its provider and hand the result to the
/// playlist; a directory contributes every track it lists
fn add_location(player: &PlayerControl, resolver: &ProviderResolver, uri: &str) {
    if uri.is_empty() {
        println!("Error: 'add' needs a location");
        return;
    }
    let location = TrackLocation::new(uri);
    match resolver
        .resolve(&location)
        .and_then(|provider| provider.list(uri))
    {
        Ok(locations) if locations.is_empty() => println!("Nothing to add under '{uri}'"),
        Ok(locations) => player.add_tracks(locations),
        Err(err) => println!("Error: cannot add '{uri}': {err}"),
    }
}

fn with_flag(params: &str, apply: impl FnOnce(bool)) {
    match params {
        "on" => apply(true),
        "off" => apply(false),
        other => println!("Error: expected 'on' or 'off', got '{other}'"),
    }
}

fn show_playlist(player: &PlayerControl) {
    let tracks = player.playlist_tracks();
    if tracks.is_empty() {
        println!("Playlist is empty.");
        return;
    }
    let current = player
        .current_track_info()
        .map(|(track, _)| track.location)
        .ok();
    for (position, track) in tracks.iter().enumerate() {
        let marker = if current.as_ref() == Some(&track.location) {
            '*'
        } else {
            ' '
        };
        let title = if track.title.is_empty() {
            track.location.to_string()
        } else {
            track.title.clone()
        };
        println!(
            "{marker} {position:3}  {title}  [{}]  {}",
            format_time(track.duration.as_secs()),
            track.codec
        );
    }
}

fn show_current(player: &PlayerControl) {
    match player.current_track_info() {
        Ok((track, elapsed)) => {
            let title = if track.title.is_empty() {
                track.location.to_string()
            } else {
                track.title.clone()
            };
            let state = match player.state() {
                PlayerState::Playing => "playing",
                PlayerState::Paused => "paused",
                PlayerState::Stopped => "stopped",
            };
            println!(
                "{title} ({} / {}) [{state}]",
                format_time(elapsed.as_secs()),
                format_time(track.duration.as_secs())
            );
        }
        Err(err) => println!("{err}"),
    }
}

fn format_time(total_secs: u64) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

fn print_help() {
    println!(
        "\
Commands:
  play                     start playback or resume from pause
  pause                    pause the current track
  stop                     stop and rewind to the first track
  next | previous          move through the playlist
  restart                  restart the current track from the top
  add <uri>                add a track, or every track under a directory
  remove <uri>             remove all entries at that location
  dedup                    drop duplicate entries, keeping the first
  random on|off            randomized playback order
  repeat-track on|off      replay the current track forever
  repeat-playlist on|off   wrap to the first track after the last
  show                     print the playlist in playback order
  current                  print the current track and elapsed time
  exit                     quit"
    );
}
