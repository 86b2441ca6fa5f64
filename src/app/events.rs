//! Outbound monitor events.
//!
//! The sampling loop emits these through the
//! [`EventSink`](super::ports::EventSink) port, strictly in the order the
//! underlying readings were taken.

use crate::error::SensorError;

/// Externally visible state of a monitored channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmState {
    Clear,
    Alarmed,
}

/// Structured events emitted by the sampling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmEvent {
    /// The initial reading was taken; carries the seeded state.
    Started { state: AlarmState },

    /// A debounced alarm began.  `index` counts alarms from 1.
    Raised { index: u32 },

    /// The alarm with this `index` ended.
    Cleared { index: u32 },

    /// The reader failed on reading number `sample` (1-based); the loop
    /// has terminated.  Emitted at most once per run.
    ReaderFailed { sample: u64, error: SensorError },

    /// The loop observed cancellation after `samples` successful reads.
    Stopped { samples: u64 },
}

impl AlarmEvent {
    /// True for the two debounced transition events.
    pub fn is_transition(&self) -> bool {
        matches!(self, Self::Raised { .. } | Self::Cleared { .. })
    }
}
