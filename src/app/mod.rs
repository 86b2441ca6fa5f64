//! Application core — port traits and the events that cross them.
//!
//! The [`SensorMonitor`](crate::monitor::SensorMonitor) only talks to the
//! outside world through the traits in [`ports`]: one to read the input
//! channel, one to publish [`events::AlarmEvent`]s.  Everything behind
//! those traits (GPIO, console, channels) lives in `sensors` and
//! `adapters`.

pub mod events;
pub mod ports;
