//! Adapters — concrete implementations of the port traits and host glue.
//!
//! | Adapter        | Implements   | Connects to                    |
//! |----------------|--------------|--------------------------------|
//! | `channel_sink` | EventSink    | crossbeam channel to the host  |
//! | `log_sink`     | EventSink    | `log` facade (console)         |
//! | `logging`      | subscriber   | stderr (host binary only)      |

pub mod channel_sink;
pub mod log_sink;
#[cfg(feature = "cli")]
pub mod logging;
