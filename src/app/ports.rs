//! Port traits — the boundary between the sampling loop and the outside world.
//!
//! ```text
//!   ChannelReader ──▶ SensorMonitor ──▶ EventSink
//! ```
//!
//! Driven adapters (GPIO pins, console, channels) implement these traits.
//! The monitor consumes them via generics, so the loop never touches
//! hardware or global state directly.

use super::events::AlarmEvent;
use crate::error::SensorError;

// ───────────────────────────────────────────────────────────────
// Channel reader (driven adapter: hardware → monitor)
// ───────────────────────────────────────────────────────────────

/// Read-side port: one raw sample of the monitored input.
///
/// `Ok(true)` means the input currently reports its triggered level.
/// Reads are expected to be fast; the monitor applies no timeout.
pub trait ChannelReader {
    fn read(&mut self) -> Result<bool, SensorError>;
}

impl<F> ChannelReader for F
where
    F: FnMut() -> Result<bool, SensorError>,
{
    fn read(&mut self) -> Result<bool, SensorError> {
        self()
    }
}

// ───────────────────────────────────────────────────────────────
// Event sink (driven adapter: monitor → logging / alerting)
// ───────────────────────────────────────────────────────────────

/// The monitor emits [`AlarmEvent`]s through this port.  Adapters decide
/// where they go (console log, channel to the host, external alerting).
pub trait EventSink {
    fn emit(&mut self, event: &AlarmEvent);
}

impl<F> EventSink for F
where
    F: FnMut(&AlarmEvent),
{
    fn emit(&mut self, event: &AlarmEvent) {
        self(event);
    }
}
