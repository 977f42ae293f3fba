//! Paced worker threads with cooperative cancellation.
//!
//! Each periodic component implements [`FrameAction`] and runs on its own
//! named thread. The shared [`CancelSignal`] is checked at every iteration
//! boundary; a frame may also end the loop by returning
//! [`ControlFlow::Break`]. Either way [`FrameAction::teardown`] runs once on
//! the worker thread before it exits.

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, info, warn};

/// Shared cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal(Arc<AtomicBool>);

impl CancelSignal {
    /// Creates an untriggered signal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests every loop sharing this signal to stop.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Returns `true` once cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// One iteration of a periodic component.
pub trait FrameAction: Send + 'static {
    /// Thread name.
    fn name(&self) -> &'static str;

    /// Runs one frame. [`ControlFlow::Break`] ends the loop.
    fn frame(&mut self) -> ControlFlow<()>;

    /// Releases resources once the loop ends.
    fn teardown(&mut self) {}
}

/// Handle to a running frame loop.
#[derive(Debug)]
pub struct FrameLoop {
    name: &'static str,
    cancel: CancelSignal,
    handle: Option<JoinHandle<()>>,
}

impl FrameLoop {
    /// Thread name of the loop.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` once the worker thread has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Cancels the loop and waits for its teardown.
    ///
    /// Returns `false` when the worker panicked.
    pub fn stop(mut self) -> bool {
        self.shutdown()
    }

    fn shutdown(&mut self) -> bool {
        self.cancel.cancel();
        let Some(handle) = self.handle.take() else {
            return true;
        };
        let joined = handle.join().is_ok();
        if !joined {
            warn!("{} worker panicked", self.name);
        }
        joined
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Runs `action` on a named thread, sleeping `frame_sleep` between frames.
///
/// # Errors
/// Returns the spawn error when the thread could not be created.
pub fn spawn_frame_loop<A: FrameAction>(
    mut action: A,
    cancel: CancelSignal,
    frame_sleep: Duration,
) -> std::io::Result<FrameLoop> {
    let name = action.name();
    let worker_cancel = cancel.clone();
    let handle = thread::Builder::new()
        .name(name.to_owned())
        .spawn(move || {
            info!("{name} started");
            while !worker_cancel.is_cancelled() {
                if action.frame().is_break() {
                    debug!("{name} requested stop");
                    break;
                }
                thread::sleep(frame_sleep);
            }
            action.teardown();
            info!("{name} stopped");
        })?;
    Ok(FrameLoop {
        name,
        cancel,
        handle: Some(handle),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::atomic::AtomicUsize;

    struct Counter {
        frames: Arc<AtomicUsize>,
        torn_down: Arc<AtomicBool>,
        stop_after: usize,
    }

    impl FrameAction for Counter {
        fn name(&self) -> &'static str {
            "counter"
        }

        fn frame(&mut self) -> ControlFlow<()> {
            let seen = self.frames.fetch_add(1, Ordering::SeqCst) + 1;
            if seen >= self.stop_after {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        }

        fn teardown(&mut self) {
            self.torn_down.store(true, Ordering::SeqCst);
        }
    }

    fn counter(stop_after: usize) -> (Counter, Arc<AtomicUsize>, Arc<AtomicBool>) {
        let frames = Arc::new(AtomicUsize::new(0));
        let torn_down = Arc::new(AtomicBool::new(false));
        let action = Counter {
            frames: Arc::clone(&frames),
            torn_down: Arc::clone(&torn_down),
            stop_after,
        };
        (action, frames, torn_down)
    }

    #[rstest]
    fn break_ends_loop_and_tears_down() {
        let (action, frames, torn_down) = counter(3);
        let worker = spawn_frame_loop(action, CancelSignal::new(), Duration::ZERO)
            .expect("spawn worker");
        for _ in 0..1000 {
            if worker.is_finished() {
                break;
            }
            thread::sleep(Duration::from_millis(1));
        }
        assert!(worker.is_finished(), "worker should stop on its own");
        assert!(worker.stop());
        assert_eq!(frames.load(Ordering::SeqCst), 3);
        assert!(torn_down.load(Ordering::SeqCst));
    }

    #[rstest]
    fn cancelled_before_start_runs_no_frames() {
        let (action, frames, torn_down) = counter(usize::MAX);
        let cancel = CancelSignal::new();
        cancel.cancel();
        let worker =
            spawn_frame_loop(action, cancel, Duration::ZERO).expect("spawn worker");
        assert!(worker.stop());
        assert_eq!(frames.load(Ordering::SeqCst), 0);
        assert!(torn_down.load(Ordering::SeqCst));
    }

    #[rstest]
    fn stop_cancels_running_loop() {
        let (action, _frames, torn_down) = counter(usize::MAX);
        let worker = spawn_frame_loop(action, CancelSignal::new(), Duration::from_millis(1))
            .expect("spawn worker");
        assert_eq!(worker.name(), "counter");
        assert!(worker.stop());
        assert!(torn_down.load(Ordering::SeqCst));
    }
}
