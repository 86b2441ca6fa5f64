//! Host log output.
//!
//! Installs a `tracing-subscriber` formatter on stderr.  The crate itself
//! only uses the `log` facade; `try_init` also installs the `tracing-log`
//! bridge, so those records land in the same output.  Filter directives
//! come from `ALARMWATCH_LOG` (`warn`, `alarmwatch=debug`, ...), defaulting
//! to `info`.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// Environment variable holding the filter directives.
pub const LOG_FILTER_ENV: &str = "ALARMWATCH_LOG";

const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber.  Call once, first thing in `main`.
pub fn init() -> Result<(), TryInitError> {
    let directives = std::env::var(LOG_FILTER_ENV).ok();
    tracing_subscriber::registry()
        .with(filter_from(directives.as_deref()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
}

/// Unset or unparsable directives fall back to `info`.
fn filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}
