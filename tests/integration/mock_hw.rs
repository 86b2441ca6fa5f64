//! Mock reader and sink adapters for integration tests.
//!
//! `ScriptReader` replays a fixed list of readings and can set the
//! cancellation signal once the script runs out, so a synchronous
//! `SensorMonitor::run` ends deterministically right after the last
//! scripted sample.  `RecordingSink` keeps every event in a shared vector
//! that survives the sink moving onto a monitor thread.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use alarmwatch::CancellationSignal;
use alarmwatch::app::events::AlarmEvent;
use alarmwatch::app::ports::{ChannelReader, EventSink};
use alarmwatch::config::{MonitorConfig, PolicyConfig};
use alarmwatch::error::SensorError;
use alarmwatch::sensors::contact::ActiveLevel;
use parking_lot::Mutex;

// ── ScriptReader ──────────────────────────────────────────────

pub struct ScriptReader {
    script: VecDeque<Result<bool, SensorError>>,
    last: Result<bool, SensorError>,
    cancel: Option<CancellationSignal>,
    reads: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl ScriptReader {
    pub fn new(levels: &[bool]) -> Self {
        Self::with_results(levels.iter().map(|&l| Ok(l)).collect())
    }

    pub fn with_results(results: Vec<Result<bool, SensorError>>) -> Self {
        Self {
            script: results.into(),
            last: Ok(false),
            cancel: None,
            reads: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Set `cancel` as the final scripted reading is handed out.
    pub fn cancel_when_exhausted(mut self, cancel: CancellationSignal) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Shared count of reads attempted, readable after the reader moved.
    pub fn read_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.reads)
    }
}

impl ChannelReader for ScriptReader {
    fn read(&mut self) -> Result<bool, SensorError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if let Some(next) = self.script.pop_front() {
            self.last = next;
        }
        if self.script.is_empty() {
            if let Some(cancel) = &self.cancel {
                cancel.cancel();
            }
        }
        self.last
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<AlarmEvent>>>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AlarmEvent> {
        self.events.lock().clone()
    }

    pub fn transitions(&self) -> Vec<AlarmEvent> {
        self.events
            .lock()
            .iter()
            .copied()
            .filter(AlarmEvent::is_transition)
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&AlarmEvent) -> bool) -> usize {
        self.events.lock().iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AlarmEvent) {
        self.events.lock().push(*event);
    }
}

// ── Config helper ─────────────────────────────────────────────

pub fn config(interval_ms: u64, policy: PolicyConfig) -> MonitorConfig {
    MonitorConfig {
        channel: 9,
        active_level: ActiveLevel::High,
        interval_ms,
        policy,
    }
}
