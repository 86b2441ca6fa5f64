//! One-shot cancellation signal with a timed wait.
//!
//! The owner of a monitor holds one clone and calls [`cancel`]; the
//! sampling loop holds another and parks in [`wait_timeout`] between
//! samples.  Once set, the flag is never cleared.
//!
//! [`cancel`]: CancellationSignal::cancel
//! [`wait_timeout`]: CancellationSignal::wait_timeout

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

#[derive(Debug, Default)]
struct Inner {
    cancelled: Mutex<bool>,
    cond: Condvar,
}

/// Cloneable handle to a shared cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationSignal {
    inner: Arc<Inner>,
}

impl CancellationSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flag and wake every waiter.
    ///
    /// Returns `true` only for the call that actually set it, so callers
    /// can run their teardown side effects once.
    pub fn cancel(&self) -> bool {
        let mut cancelled = self.inner.cancelled.lock();
        if *cancelled {
            return false;
        }
        *cancelled = true;
        self.inner.cond.notify_all();
        true
    }

    pub fn is_cancelled(&self) -> bool {
        *self.inner.cancelled.lock()
    }

    /// Block for up to `timeout`.  Returns `true` as soon as the signal is
    /// set, `false` once the full timeout elapsed without it.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut cancelled = self.inner.cancelled.lock();
        // Condvar waits may wake spuriously; only the deadline ends the wait.
        while !*cancelled {
            if self.inner.cond.wait_until(&mut cancelled, deadline).timed_out() {
                return *cancelled;
            }
        }
        true
    }

    /// Block until the signal is set.
    pub fn wait(&self) {
        let mut cancelled = self.inner.cancelled.lock();
        while !*cancelled {
            self.inner.cond.wait(&mut cancelled);
        }
    }
}
