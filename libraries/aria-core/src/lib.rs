//! Aria Player Core
//!
//! Foundational building blocks shared by all Aria Player crates:
//!
//! - **Value types**: [`TrackLocation`], [`TrackInfo`]
//! - **Error handling**: unified [`AriaError`] and [`Result`] types
//! - **Provider contract**: the [`TrackProvider`] trait and the
//!   scheme-keyed [`ProviderResolver`] registry
//! - **Execution queue**: [`ExecQueue`], the single-writer task queue that
//!   serializes background completion events onto one owner context
//!
//! # Example
//!
//! ```rust
//! use aria_core::{TrackInfo, TrackLocation};
//! use std::time::Duration;
//!
//! let location = TrackLocation::new("file:///music/song.mp3");
//! assert_eq!(location.scheme(), Some("file"));
//!
//! let track = TrackInfo::new(location, "My Song", 1, Duration::from_secs(180), "mp3");
//! assert_eq!(track.title, "My Song");
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod exec;
pub mod provider;
pub mod types;

// Re-export commonly used types
pub use error::{AriaError, Result};
pub use exec::ExecQueue;
pub use provider::{ProviderFactory, ProviderResolver, TrackProvider};
pub use types::{TrackInfo, TrackLocation};
