//! Simulated input pin.
//!
//! Level and fault flag live in shared atomics: clone the pin, hand one
//! clone to the monitor and flip the level from anywhere else (stdin in the
//! host's `--sim` mode, test threads otherwise).

use core::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use embedded_hal::digital::{self, ErrorKind, ErrorType, InputPin};

/// Error returned while a fault is injected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimFault;

impl fmt::Display for SimFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "injected fault")
    }
}

impl digital::Error for SimFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

#[derive(Debug, Default)]
struct Shared {
    high: AtomicBool,
    fault: AtomicBool,
    reads: AtomicU64,
}

/// Input pin whose level is set in software.
#[derive(Debug, Clone, Default)]
pub struct SimPin {
    shared: Arc<Shared>,
}

impl SimPin {
    pub fn new(high: bool) -> Self {
        let pin = Self::default();
        pin.set_level(high);
        pin
    }

    pub fn set_level(&self, high: bool) {
        self.shared.high.store(high, Ordering::Release);
    }

    /// While set, every read fails with [`SimFault`].
    pub fn inject_fault(&self, on: bool) {
        self.shared.fault.store(on, Ordering::Release);
    }

    /// Reads attempted so far, across all clones.
    pub fn reads(&self) -> u64 {
        self.shared.reads.load(Ordering::Acquire)
    }

    fn sample(&self) -> Result<bool, SimFault> {
        self.shared.reads.fetch_add(1, Ordering::AcqRel);
        if self.shared.fault.load(Ordering::Acquire) {
            return Err(SimFault);
        }
        Ok(self.shared.high.load(Ordering::Acquire))
    }
}

impl ErrorType for SimPin {
    type Error = SimFault;
}

impl InputPin for SimPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.sample()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.sample().map(|high| !high)
    }
}
