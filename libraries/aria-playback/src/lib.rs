//! Aria Player - Playback Engine
//!
//! Playlist sequencing, simulated decode tasks, and the transport state
//! machine that ties them together.
//!
//! This crate provides:
//! - [`Playlist`]: ordered/randomized traversal, add/remove/dedup mutation
//!   that preserves cursor semantics, repeat at track and playlist
//!   granularity
//! - [`Decoder`]: a cancellable background task that "plays" one track for
//!   its declared duration and reports completion exactly once
//! - [`PlayerControl`]: the play/pause/stop state machine, serializing
//!   transport commands against a single live decode task
//!
//! # Architecture
//!
//! `aria-playback` never applies a decoder completion from the decode
//! thread. Completions are posted to the [`aria_core::ExecQueue`] owned by
//! the embedding process, and the queue's owner context applies them, so
//! every state transition happens on one logical thread.
//!
//! # Example
//!
//! ```rust
//! use aria_core::{ExecQueue, ProviderResolver};
//! use aria_playback::{PlayerConfig, PlayerControl};
//! use std::sync::Arc;
//!
//! let exec = Arc::new(ExecQueue::new());
//! let resolver = Arc::new(ProviderResolver::new());
//! let player = PlayerControl::new(PlayerConfig::default(), Arc::clone(&exec), resolver);
//!
//! player.add_tracks(vec!["file:///music/a.mp3".into()]);
//! player.play();
//! player.exit();
//! exec.run(); // drain pending events, then return
//! ```

#![forbid(unsafe_code)]

mod controller;
mod decoder;
mod playlist;
pub mod types;

// Public exports
pub use aria_core::{AriaError, Result};
pub use controller::PlayerControl;
pub use decoder::Decoder;
pub use playlist::Playlist;
pub use types::{PlayerConfig, PlayerState, SeekMode};
