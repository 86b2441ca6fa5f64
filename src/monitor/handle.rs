//! Threaded monitor lifecycle.
//!
//! ```text
//!   new ──start()──▶ Running ──stop()──▶ (loop exits) ──join()──▶ MonitorExit
//!    │                  │                                   ▲
//!    └──stop()──────────┼───────── start() = UseAfterStop   │
//!                       └── reader failure ─────────────────┘
//! ```
//!
//! The sampling loop runs on one dedicated, named thread.  The handle
//! keeps the owner's clone of the [`CancellationSignal`]; [`join`] hands
//! the reader back only after the loop has exited, so the caller can
//! release the hardware channel without racing a read.
//!
//! [`join`]: MonitorHandle::join

use std::mem;
use std::thread::{self, JoinHandle};

use log::{error, info, warn};

use super::{RunSummary, SensorMonitor};
use crate::app::ports::{ChannelReader, EventSink};
use crate::cancel::CancellationSignal;
use crate::error::MonitorError;

/// Stack for the monitor thread.  The loop holds no large buffers.
const MONITOR_STACK_KB: usize = 64;

/// What the loop thread returns: the reader for release, and how the
/// run ended.
#[derive(Debug)]
pub struct MonitorExit<R> {
    pub reader: R,
    pub outcome: Result<RunSummary, MonitorError>,
}

enum Lifecycle<R, S> {
    Ready { monitor: SensorMonitor<R>, sink: S },
    Running(JoinHandle<MonitorExit<R>>),
    Finished,
}

/// Owner-side handle for a monitor running on its own thread.
pub struct MonitorHandle<R, S> {
    name: String,
    cancel: CancellationSignal,
    lifecycle: Lifecycle<R, S>,
}

impl<R, S> MonitorHandle<R, S>
where
    R: ChannelReader + Send + 'static,
    S: EventSink + Send + 'static,
{
    /// Wrap a monitor and its sink.  Nothing runs until [`start`](Self::start).
    pub fn new(
        name: impl Into<String>,
        monitor: SensorMonitor<R>,
        sink: S,
        cancel: CancellationSignal,
    ) -> Self {
        Self {
            name: name.into(),
            cancel,
            lifecycle: Lifecycle::Ready { monitor, sink },
        }
    }

    /// Spawn the sampling loop.
    ///
    /// Fails with [`MonitorError::DoubleStart`] while the loop is running and
    /// with [`MonitorError::UseAfterStop`] once the handle was stopped or the
    /// loop has already exited.
    pub fn start(&mut self) -> Result<(), MonitorError> {
        match mem::replace(&mut self.lifecycle, Lifecycle::Finished) {
            Lifecycle::Ready { monitor, sink } if !self.cancel.is_cancelled() => {
                let handle = self.spawn(monitor, sink)?;
                self.lifecycle = Lifecycle::Running(handle);
                Ok(())
            }
            other => {
                let err = match &other {
                    Lifecycle::Running(h) if !h.is_finished() && !self.cancel.is_cancelled() => {
                        MonitorError::DoubleStart
                    }
                    _ => MonitorError::UseAfterStop,
                };
                warn!("Monitor '{}': start rejected ({err})", self.name);
                self.lifecycle = other;
                Err(err)
            }
        }
    }

    fn spawn(
        &self,
        mut monitor: SensorMonitor<R>,
        mut sink: S,
    ) -> Result<JoinHandle<MonitorExit<R>>, MonitorError> {
        let cancel = self.cancel.clone();
        info!(
            "Spawning monitor '{}' (interval={:?}, stack={}KB)",
            self.name,
            monitor.interval(),
            MONITOR_STACK_KB
        );

        thread::Builder::new()
            .name(self.name.clone())
            .stack_size(MONITOR_STACK_KB * 1024)
            .spawn(move || {
                let outcome = monitor.run(&cancel, &mut sink);
                MonitorExit {
                    reader: monitor.into_reader(),
                    outcome,
                }
            })
            .map_err(|e| {
                error!("Monitor '{}': thread spawn failed: {e}", self.name);
                MonitorError::SpawnFailed
            })
    }
}

impl<R, S> MonitorHandle<R, S> {
    /// Request shutdown.  The loop notices at its next wait, so it exits
    /// within one interval (or one policy pause).  Returns `true` only for
    /// the call that actually requested it; repeated calls are no-ops.
    pub fn stop(&self) -> bool {
        let first = self.cancel.cancel();
        if first {
            info!("Monitor '{}': stop requested", self.name);
        }
        first
    }

    /// True while the loop thread is alive.
    pub fn is_running(&self) -> bool {
        matches!(&self.lifecycle, Lifecycle::Running(h) if !h.is_finished())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Block until the loop has exited and take back the reader.
    ///
    /// Does not stop the loop by itself: call [`stop`](Self::stop) first,
    /// or use [`shutdown`](Self::shutdown).  A handle that never started
    /// gives its reader back with a `UseAfterStop` outcome.
    pub fn join(mut self) -> Result<MonitorExit<R>, MonitorError> {
        match mem::replace(&mut self.lifecycle, Lifecycle::Finished) {
            Lifecycle::Running(handle) => {
                let exit = handle.join().map_err(|_| {
                    error!("Monitor '{}': thread panicked", self.name);
                    MonitorError::Panicked
                })?;
                info!("Monitor '{}': loop exited, reader returned", self.name);
                Ok(exit)
            }
            Lifecycle::Ready { monitor, .. } => {
                self.cancel.cancel();
                Ok(MonitorExit {
                    reader: monitor.into_reader(),
                    outcome: Err(MonitorError::UseAfterStop),
                })
            }
            Lifecycle::Finished => Err(MonitorError::UseAfterStop),
        }
    }

    /// [`stop`](Self::stop) followed by [`join`](Self::join).
    pub fn shutdown(self) -> Result<MonitorExit<R>, MonitorError> {
        self.stop();
        self.join()
    }
}

impl<R, S> Drop for MonitorHandle<R, S> {
    fn drop(&mut self) {
        if let Lifecycle::Running(handle) = mem::replace(&mut self.lifecycle, Lifecycle::Finished) {
            self.cancel.cancel();
            if handle.join().is_err() {
                error!("Monitor '{}': thread panicked during drop", self.name);
            }
        }
    }
}
