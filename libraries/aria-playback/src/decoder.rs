//! Simulated decode task
//!
//! One `Decoder` exists per "now playing" track. Construction spawns a
//! background thread that consumes the track in coarse time increments
//! until the declared duration is reached, cancellation is requested, or
//! the provider fails. The completion callback fires exactly once for all
//! three endings, guaranteed by a drop guard owned by the decode thread.
//!
//! The only state shared between the owning thread and the decode thread
//! is the cancel flag, the played-time snapshot, and the pause gate; the
//! decode loop never takes any player-level lock.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use aria_core::{AriaError, Result, TrackLocation, TrackProvider};
use tracing::{debug, trace, warn};

/// Granularity of the simulated decode loop; cancellation is observed
/// within one increment
const DECODE_TICK: Duration = Duration::from_millis(50);

/// Owner-side view of the decode thread lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskState {
    Running,
    Paused,
}

/// State shared with the decode thread
struct Shared {
    cancel: AtomicBool,
    played_secs: AtomicU64,
    paused: Mutex<bool>,
    pause_gate: Condvar,
}

/// Fires the completion callback exactly once, whichever way the decode
/// loop ends, including teardown mid-decode and panics
struct CompletionGuard {
    callback: Option<Box<dyn FnOnce(Result<()>) + Send + 'static>>,
    outcome: Option<Result<()>>,
}

impl CompletionGuard {
    fn new(callback: Box<dyn FnOnce(Result<()>) + Send + 'static>) -> Self {
        Self {
            callback: Some(callback),
            outcome: None,
        }
    }

    fn finish(&mut self, outcome: Result<()>) {
        self.outcome = Some(outcome);
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        if let Some(callback) = self.callback.take() {
            // leaving the loop without an explicit outcome means the task
            // was torn down before the track ended
            let outcome = self
                .outcome
                .take()
                .unwrap_or_else(|| Err(AriaError::OperationCancelled));
            callback(outcome);
        }
    }
}

/// Cancellable background task that "plays" one track
///
/// Lifecycle: `Running -> {Paused <-> Running} -> Exited`, where exiting
/// happens on drop. A dropped decoder cancels its thread and joins it
/// synchronously; a new `Decoder` must be constructed to play again.
pub struct Decoder {
    shared: Arc<Shared>,
    state: TaskState,
    handle: Option<JoinHandle<()>>,
    location: TrackLocation,
}

impl Decoder {
    /// Start decoding `location`, describing it through `provider`
    ///
    /// `on_completion` is invoked exactly once, from the decode thread,
    /// with `Ok(())` on natural completion, `OperationCancelled` on
    /// teardown, or `BadMessage` on a decode-layer failure.
    pub fn new(
        provider: Box<dyn TrackProvider>,
        location: TrackLocation,
        on_completion: impl FnOnce(Result<()>) + Send + 'static,
    ) -> Self {
        let shared = Arc::new(Shared {
            cancel: AtomicBool::new(false),
            played_secs: AtomicU64::new(0),
            paused: Mutex::new(false),
            pause_gate: Condvar::new(),
        });

        let thread_shared = Arc::clone(&shared);
        let thread_location = location.clone();
        let guard = CompletionGuard::new(Box::new(on_completion));
        let handle = thread::Builder::new()
            .name("aria-decoder".to_string())
            .spawn(move || decode_loop(&thread_shared, &*provider, &thread_location, guard))
            .expect("failed to spawn decoder thread");

        Self {
            shared,
            state: TaskState::Running,
            handle: Some(handle),
            location,
        }
    }

    /// Block the decode loop before it consumes its next increment
    ///
    /// Only valid while running. Pausing an already paused task is a
    /// contract violation: fatal in debug builds, ignored in release.
    pub fn pause(&mut self) {
        debug_assert_eq!(self.state, TaskState::Running, "pause on a paused decoder");
        if self.state != TaskState::Running {
            return;
        }
        *self.shared.paused.lock().unwrap() = true;
        self.state = TaskState::Paused;
    }

    /// Release a paused decode loop
    ///
    /// Only valid while paused; same contract as [`pause`](Self::pause).
    pub fn unpause(&mut self) {
        debug_assert_eq!(self.state, TaskState::Paused, "unpause on a running decoder");
        if self.state != TaskState::Paused {
            return;
        }
        let mut paused = self.shared.paused.lock().unwrap();
        *paused = false;
        self.shared.pause_gate.notify_one();
        drop(paused);
        self.state = TaskState::Running;
    }

    /// Whether the owner has paused the task
    pub fn is_paused(&self) -> bool {
        self.state == TaskState::Paused
    }

    /// Snapshot of the time played so far
    ///
    /// Lock-free; non-decreasing while running, frozen while paused.
    pub fn played_time(&self) -> Duration {
        Duration::from_secs(self.shared.played_secs.load(Ordering::Acquire))
    }
}

impl Drop for Decoder {
    /// Synchronous teardown: request cancellation, force the pause gate
    /// open so a paused loop can observe the flag, and join the thread
    fn drop(&mut self) {
        self.shared.cancel.store(true, Ordering::Release);
        {
            let mut paused = self.shared.paused.lock().unwrap();
            *paused = false;
            self.shared.pause_gate.notify_one();
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!(location = %self.location, "decoder thread panicked");
            }
        }
    }
}

fn decode_loop(
    shared: &Shared,
    provider: &dyn TrackProvider,
    location: &TrackLocation,
    mut completion: CompletionGuard,
) {
    let info = match provider.track_info(location) {
        Ok(info) => info,
        Err(err) => {
            completion.finish(Err(AriaError::bad_message(format!(
                "cannot decode '{location}': {err}"
            ))));
            return;
        }
    };

    debug!(%location, duration = info.duration.as_secs(), "decoding");

    let mut elapsed = Duration::ZERO;
    let mut ticks = 0u64;
    while elapsed < info.duration {
        if shared.cancel.load(Ordering::Acquire) {
            debug!(%location, "decode cancelled");
            return;
        }

        // block here while paused; the gate opens on unpause or teardown
        {
            let mut paused = shared.paused.lock().unwrap();
            while *paused {
                paused = shared.pause_gate.wait(paused).unwrap();
            }
        }
        if shared.cancel.load(Ordering::Acquire) {
            debug!(%location, "decode cancelled");
            return;
        }

        thread::sleep(DECODE_TICK);
        elapsed += DECODE_TICK;
        shared.played_secs.store(elapsed.as_secs(), Ordering::Release);

        ticks += 1;
        if ticks % 20 == 0 {
            trace!(
                %location,
                played = elapsed.as_secs(),
                total = info.duration.as_secs(),
                "decoded chunk"
            );
        }
    }

    completion.finish(Ok(()));
}
