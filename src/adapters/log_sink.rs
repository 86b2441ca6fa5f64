//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing each [`AlarmEvent`] through the `log`
//! facade.  The host uses it to render events it receives from the monitor
//! thread; it can also be handed to a monitor directly.

use log::{error, info, warn};

use crate::app::events::{AlarmEvent, AlarmState};
use crate::app::ports::EventSink;

/// Adapter that logs every [`AlarmEvent`] for one named sensor.
pub struct LogEventSink {
    label: String,
}

impl LogEventSink {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AlarmEvent) {
        let label = &self.label;
        match event {
            AlarmEvent::Started { state } => match state {
                AlarmState::Clear => info!("START | {label} | everything is fine"),
                AlarmState::Alarmed => warn!("START | {label} | already triggered"),
            },
            AlarmEvent::Raised { index } => {
                warn!("ALARM | {label} | alarm #{index} has started");
            }
            AlarmEvent::Cleared { index } => {
                info!("CLEAR | {label} | alarm #{index} has ended");
            }
            AlarmEvent::ReaderFailed { sample, error: e } => {
                error!("FAULT | {label} | read #{sample} failed: {e}");
            }
            AlarmEvent::Stopped { samples } => {
                info!("STOP  | {label} | {samples} samples taken");
            }
        }
    }
}
