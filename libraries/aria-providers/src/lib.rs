//! Aria Player - Track Providers
//!
//! Concrete implementations of the [`aria_core::TrackProvider`] contract:
//!
//! - [`FsTrackProvider`]: `file://` locations, backed by directory listing
//! - [`NullTrackProvider`]: schemeless locations, used as the resolver's
//!   fallback
//!
//! The decode layer is simulated, so neither provider reads real tags;
//! metadata is fabricated from an instance-scoped counter. That keeps
//! concurrent providers (and tests) from contaminating each other, which
//! a process-global counter would.

#![forbid(unsafe_code)]

mod fs;
mod null;

pub use fs::FsTrackProvider;
pub use null::NullTrackProvider;
