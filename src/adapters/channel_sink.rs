//! Channel event sink adapter.
//!
//! Forwards every [`AlarmEvent`] over a `crossbeam-channel` sender.  The
//! sink moves onto the monitor thread and is dropped when the loop exits,
//! which disconnects the channel: a host blocked on the receiver wakes up
//! exactly when the monitor is done.

use crossbeam_channel::{Receiver, Sender, unbounded};
use log::debug;

use crate::app::events::AlarmEvent;
use crate::app::ports::EventSink;

pub struct ChannelEventSink {
    tx: Sender<AlarmEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: Sender<AlarmEvent>) -> Self {
        Self { tx }
    }

    /// A sink plus the receiver that observes it.
    pub fn pair() -> (Self, Receiver<AlarmEvent>) {
        let (tx, rx) = unbounded();
        (Self::new(tx), rx)
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&mut self, event: &AlarmEvent) {
        // A vanished receiver is not the loop's problem; keep sampling.
        if self.tx.send(*event).is_err() {
            debug!("event receiver gone, dropping {event:?}");
        }
    }
}
