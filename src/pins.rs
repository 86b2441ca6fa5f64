//! Default input channels.
//!
//! Numbers follow the host's numbering scheme (physical header pins for the
//! water and fire sensors, BCM for the confirm-style leak sensor).  Electrical
//! setup of these pins (pull resistors, export) is done by the host before a
//! monitor is built.

/// Water leak probe; idles low on a pull-down, reads high when wet.
pub const WATER_SENSOR_CHANNEL: u8 = 9;

/// Fire alarm panel relay contact; idles high on a pull-up, pulls low on alarm.
pub const FIRE_ALARM_CHANNEL: u8 = 8;

/// Leak probe read with a delayed confirmation.
pub const LEAK_CONFIRM_CHANNEL: u8 = 17;
