//! Linux sysfs GPIO input.
//!
//! Reads `<root>/gpio<N>/value`, which the kernel reports as `0` or `1`.
//! Exporting the line, setting its direction and its pull resistor are the
//! host's job (udev rule, `raspi-gpio`, device tree overlay); this driver
//! only reads.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use embedded_hal::digital::{self, ErrorKind, ErrorType, InputPin};
use log::{info, warn};

use crate::error::SensorError;

/// Default sysfs GPIO root.
pub const SYSFS_GPIO_ROOT: &str = "/sys/class/gpio";

#[derive(Debug)]
pub enum SysfsError {
    /// The value file could not be read.
    Io(io::ErrorKind),
    /// The value file held something other than `0` or `1`.
    Garbled,
}

impl fmt::Display for SysfsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(kind) => write!(f, "value read failed: {kind}"),
            Self::Garbled => write!(f, "value file garbled"),
        }
    }
}

impl digital::Error for SysfsError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// One exported sysfs GPIO line, read as an input.
#[derive(Debug)]
pub struct SysfsPin {
    channel: u8,
    value_path: PathBuf,
}

impl SysfsPin {
    /// Bind to `gpio<channel>` under `root`.  Fails with
    /// [`SensorError::Disconnected`] if the line is not exported.
    pub fn open(root: &Path, channel: u8) -> Result<Self, SensorError> {
        let value_path = root.join(format!("gpio{channel}")).join("value");
        if !value_path.is_file() {
            warn!("GPIO {channel} not exported ({})", value_path.display());
            return Err(SensorError::Disconnected);
        }
        info!("GPIO {channel}: reading {}", value_path.display());
        Ok(Self {
            channel,
            value_path,
        })
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    fn level(&self) -> Result<bool, SysfsError> {
        let raw = fs::read_to_string(&self.value_path).map_err(|e| SysfsError::Io(e.kind()))?;
        match raw.trim() {
            "1" => Ok(true),
            "0" => Ok(false),
            _ => Err(SysfsError::Garbled),
        }
    }
}

impl ErrorType for SysfsPin {
    type Error = SysfsError;
}

impl InputPin for SysfsPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.level()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.level().map(|high| !high)
    }
}
