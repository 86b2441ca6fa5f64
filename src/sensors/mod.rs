//! Input channel drivers.
//!
//! [`contact::ContactSensor`] turns any `embedded-hal` input pin into a
//! [`ChannelReader`](crate::app::ports::ChannelReader).  The pin itself
//! comes from one of the back-ends here or from a board HAL.
//!
//! | Back-end          | Source of the level                      |
//! |-------------------|------------------------------------------|
//! | `sysfs::SysfsPin` | `/sys/class/gpio/gpio<N>/value` (Linux)  |
//! | `sim::SimPin`     | shared atomic, set by the host or tests  |

pub mod contact;
pub mod sim;
pub mod sysfs;
