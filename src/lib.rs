//! alarmwatch library.
//!
//! Debounced, cancellable monitoring of one binary sensor input (water leak
//! probe, fire alarm relay contact).  The sampling loop lives in
//! [`monitor`]; it reads through the [`app::ports::ChannelReader`] port and
//! reports through [`app::ports::EventSink`], so it can be driven by real
//! GPIO, a simulated pin or a test script alike.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod cancel;
pub mod config;
pub mod error;
pub mod monitor;
pub mod pins;
pub mod sensors;

pub use cancel::CancellationSignal;
pub use error::{Error, MonitorError, Result, SensorError};
pub use monitor::{MonitorExit, MonitorHandle, RunSummary, SensorMonitor};
