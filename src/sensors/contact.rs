//! Dry-contact sensor on a digital input.
//!
//! Water probes close a ~2 MOhm path when wet; on a pull-down input that
//! reads HIGH.  Fire alarm panel relays idle HIGH on a pull-up and pull the
//! line LOW when the alarm trips.  [`ActiveLevel`] captures which level
//! means "triggered" so the monitor only ever sees a boolean.

use embedded_hal::digital::InputPin;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::app::ports::ChannelReader;
use crate::error::SensorError;

/// Electrical level that indicates the triggered condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveLevel {
    High,
    Low,
}

/// A contact sensor wired to one input pin.
pub struct ContactSensor<P> {
    pin: P,
    active: ActiveLevel,
}

impl<P: InputPin> ContactSensor<P> {
    /// The pin must already be configured as an input with the right pull.
    pub fn new(pin: P, active: ActiveLevel) -> Self {
        Self { pin, active }
    }

    pub fn active_level(&self) -> ActiveLevel {
        self.active
    }

    /// Give the pin back for release.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: InputPin> ChannelReader for ContactSensor<P> {
    fn read(&mut self) -> Result<bool, SensorError> {
        let level = match self.active {
            ActiveLevel::High => self.pin.is_high(),
            ActiveLevel::Low => self.pin.is_low(),
        };
        level.map_err(|e| {
            warn!("contact read failed: {e:?}");
            SensorError::GpioReadFailed
        })
    }
}
