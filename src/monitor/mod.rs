//! The debounced sampling loop.
//!
//! ```text
//!  CancellationSignal ─┐
//!                      ▼
//!  ChannelReader ──▶ SensorMonitor ──▶ Policy ──▶ EventSink
//!                   (wait · read)    (debounce)
//! ```
//!
//! [`SensorMonitor::run`] is a plain blocking function; it runs on whatever
//! thread calls it.  [`MonitorHandle`] puts it on a dedicated thread and
//! owns the start / stop / join lifecycle.

pub mod handle;
pub mod policy;

pub use handle::{MonitorExit, MonitorHandle};

use std::time::{Duration, Instant};

use log::{debug, error, info};

use crate::app::events::{AlarmEvent, AlarmState};
use crate::app::ports::{ChannelReader, EventSink};
use crate::cancel::CancellationSignal;
use crate::config::MonitorConfig;
use crate::error::MonitorError;
use policy::{Debounce, Policy, Transition};

/// What a completed run looked like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Successful reads, including the seeding read.
    pub samples: u64,
    /// Alarms raised during the run.
    pub alarms: u32,
    pub final_state: AlarmState,
}

/// Monitors one input channel through a configured debounce policy.
pub struct SensorMonitor<R> {
    reader: R,
    interval: Duration,
    policy: Policy,
    state: AlarmState,
    samples: u64,
    alarms: u32,
    finished: bool,
}

impl<R> SensorMonitor<R> {
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Release the reader so the caller can tear down the hardware channel.
    pub fn into_reader(self) -> R {
        self.reader
    }
}

impl<R: ChannelReader> SensorMonitor<R> {
    /// Build a monitor around `reader`.
    ///
    /// Rejects a debounce threshold below 1 with
    /// [`MonitorError::MisconfiguredThreshold`].  No reading is taken yet.
    pub fn new(reader: R, config: &MonitorConfig) -> Result<Self, MonitorError> {
        let policy = Policy::from_config(&config.policy)?;
        Ok(Self {
            reader,
            interval: Duration::from_millis(config.interval_ms),
            policy,
            state: AlarmState::Clear,
            samples: 0,
            alarms: 0,
            finished: false,
        })
    }

    /// Seed the state from one reading, then sample until `cancel` is set
    /// or the reader fails.
    ///
    /// A monitor runs once: a second call returns
    /// [`MonitorError::UseAfterStop`].  A reader failure is reported to
    /// `sink` as [`AlarmEvent::ReaderFailed`] and returned as
    /// [`MonitorError::ReaderFailure`].
    pub fn run(
        &mut self,
        cancel: &CancellationSignal,
        sink: &mut impl EventSink,
    ) -> Result<RunSummary, MonitorError> {
        if self.finished {
            return Err(MonitorError::UseAfterStop);
        }
        let outcome = self.sample_loop(cancel, sink);
        self.finished = true;
        outcome
    }

    fn sample_loop(
        &mut self,
        cancel: &CancellationSignal,
        sink: &mut impl EventSink,
    ) -> Result<RunSummary, MonitorError> {
        let clock = Instant::now();

        let initial = self.sample(sink)?;
        self.state = self.policy.seed(initial);
        info!("Monitor started: state={:?}", self.state);
        sink.emit(&AlarmEvent::Started { state: self.state });

        let mut wait = self.interval;
        loop {
            if cancel.wait_timeout(wait) {
                info!("Monitor stopped after {} samples", self.samples);
                sink.emit(&AlarmEvent::Stopped {
                    samples: self.samples,
                });
                return Ok(self.summary());
            }

            let triggered = self.sample(sink)?;
            let now_ms = clock.elapsed().as_millis() as u64;
            let step = self.policy.observe(triggered, now_ms);

            if let Some(transition) = step.transition {
                self.apply(transition, sink);
            }
            wait = step.pause.unwrap_or(self.interval);
        }
    }

    /// One raw read.  On failure the event is emitted here, exactly once,
    /// and the error ends the loop through `?`.
    fn sample(&mut self, sink: &mut impl EventSink) -> Result<bool, MonitorError> {
        match self.reader.read() {
            Ok(triggered) => {
                self.samples += 1;
                Ok(triggered)
            }
            Err(e) => {
                let sample = self.samples + 1;
                error!("Reader failed on sample {sample}: {e}");
                sink.emit(&AlarmEvent::ReaderFailed { sample, error: e });
                Err(MonitorError::ReaderFailure(e))
            }
        }
    }

    fn apply(&mut self, transition: Transition, sink: &mut impl EventSink) {
        self.state = self.policy.state();
        let event = match transition {
            Transition::Raised => {
                self.alarms += 1;
                AlarmEvent::Raised { index: self.alarms }
            }
            Transition::Cleared => AlarmEvent::Cleared { index: self.alarms },
        };
        debug!("{:?} at sample {} -> {:?}", transition, self.samples, self.state);
        sink.emit(&event);
    }

    fn summary(&self) -> RunSummary {
        RunSummary {
            samples: self.samples,
            alarms: self.alarms,
            final_state: self.state,
        }
    }
}
