//! Unified error types for alarmwatch.
//!
//! A single [`Error`] enum that every subsystem converts into, keeping the
//! host's error handling uniform.  Sensor and monitor variants are `Copy` so
//! they can be carried inside [`AlarmEvent`](crate::app::events::AlarmEvent)s
//! without allocation.

use core::fmt;

use crate::config::ConfigError;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug)]
pub enum Error {
    /// The input channel could not be read.
    Sensor(SensorError),
    /// The monitor rejected a request or its loop failed.
    Monitor(MonitorError),
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Monitor(e) => write!(f, "monitor: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// GPIO read returned an error.
    GpioReadFailed,
    /// The channel is no longer available (unexported, unplugged).
    Disconnected,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioReadFailed => write!(f, "GPIO read failed"),
            Self::Disconnected => write!(f, "input channel disconnected"),
        }
    }
}

impl std::error::Error for SensorError {}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Monitor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorError {
    /// The reader failed mid-run; the loop has terminated.
    ReaderFailure(SensorError),
    /// Debounce threshold below 1.  Carries the rejected value.
    MisconfiguredThreshold(u32),
    /// `start()` on a monitor whose loop is already running.
    DoubleStart,
    /// `start()` or `join()` on a monitor that was stopped or already joined.
    UseAfterStop,
    /// The OS refused to create the monitor thread.
    SpawnFailed,
    /// The monitor thread panicked; the reader is lost.
    Panicked,
}

impl fmt::Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReaderFailure(e) => write!(f, "reader failure: {e}"),
            Self::MisconfiguredThreshold(t) => {
                write!(f, "debounce threshold must be at least 1 (got {t})")
            }
            Self::DoubleStart => write!(f, "monitor already running"),
            Self::UseAfterStop => write!(f, "monitor already stopped"),
            Self::SpawnFailed => write!(f, "monitor thread could not be spawned"),
            Self::Panicked => write!(f, "monitor thread panicked"),
        }
    }
}

impl std::error::Error for MonitorError {}

impl From<MonitorError> for Error {
    fn from(e: MonitorError) -> Self {
        Self::Monitor(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
