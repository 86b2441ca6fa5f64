//! alarmwatch host entry point.
//!
//! ```text
//! ┌──────────────┐  ContactSensor  ┌────────────────┐  ChannelEventSink  ┌──────────────┐
//! │ SysfsPin /   │────────────────▶│ monitor thread │───────────────────▶│ main thread  │
//! │ SimPin       │                 │ (SensorMonitor)│                    │ LogEventSink │
//! └──────────────┘                 └────────────────┘                    └──────────────┘
//!                                          ▲
//!                     SIGINT / SIGTERM ────┘ CancellationSignal
//! ```
//!
//! The main thread blocks on the event channel, which disconnects when the
//! monitor loop exits (cancelled or failed).  Only then is the monitor
//! joined and the pin released.
#![deny(unused_must_use)]

use std::io::BufRead;
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;

use anyhow::{Context, Result};
use clap::Parser;
use embedded_hal::digital::InputPin;
use log::{error, info, warn};
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;

use alarmwatch::adapters::channel_sink::ChannelEventSink;
use alarmwatch::adapters::log_sink::LogEventSink;
use alarmwatch::adapters::logging;
use alarmwatch::app::ports::EventSink;
use alarmwatch::config::{ConfigError, MonitorConfig};
use alarmwatch::sensors::contact::{ActiveLevel, ContactSensor};
use alarmwatch::sensors::sim::SimPin;
use alarmwatch::sensors::sysfs::{SYSFS_GPIO_ROOT, SysfsPin};
use alarmwatch::{CancellationSignal, MonitorHandle, SensorMonitor};

/// Watch a leak or fire-alarm contact and report debounced alarms.
#[derive(Parser)]
#[command(name = "alarmwatch", version, about)]
struct Cli {
    /// JSON config file (takes precedence over --preset).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Built-in sensor profile: water, water_edge, fire, confirm.
    #[arg(long, default_value = "water")]
    preset: String,
    /// GPIO channel, overriding the config.
    #[arg(long)]
    channel: Option<u8>,
    /// sysfs GPIO root directory.
    #[arg(long, default_value = SYSFS_GPIO_ROOT)]
    gpio_root: PathBuf,
    /// Simulate the input; type `1` or `0` lines on stdin to set the level.
    #[arg(long)]
    sim: bool,
}

fn main() -> Result<ExitCode> {
    logging::init().context("installing logger")?;
    let cli = Cli::parse();

    info!("alarmwatch v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;
    info!(
        "Initializing sensor on channel {} (active {:?}, every {} ms, {:?})",
        config.channel, config.active_level, config.interval_ms, config.policy
    );

    let cancel = CancellationSignal::new();
    install_shutdown(cancel.clone())?;

    if cli.sim {
        // Idle level: whatever does not count as triggered.
        let pin = SimPin::new(config.active_level == ActiveLevel::Low);
        feed_from_stdin(pin.clone())?;
        watch(pin, &config, cancel)
    } else {
        let pin = SysfsPin::open(&cli.gpio_root, config.channel)
            .with_context(|| format!("opening GPIO {}", config.channel))?;
        watch(pin, &config, cancel)
    }
}

fn load_config(cli: &Cli) -> alarmwatch::Result<MonitorConfig> {
    let mut config = match &cli.config {
        Some(path) => MonitorConfig::load(path)?,
        None => MonitorConfig::preset(&cli.preset)
            .ok_or(ConfigError::ValidationFailed("unknown preset"))?,
    };
    if let Some(channel) = cli.channel {
        config.channel = channel;
    }
    config.validate()?;
    Ok(config)
}

/// Exit status when a second signal cuts the graceful shutdown short.
const FORCED_EXIT_CODE: i32 = 130;

/// The first SIGINT / SIGTERM requests cancellation; a second one exits
/// right away, for a reader stuck in a read that never returns.
fn install_shutdown(cancel: CancellationSignal) -> Result<()> {
    let mut signals = Signals::new([SIGINT, SIGTERM]).context("installing signal handlers")?;
    thread::Builder::new()
        .name("signals".into())
        .spawn(move || {
            for sig in signals.forever() {
                if !on_signal(&cancel, sig) {
                    std::process::exit(FORCED_EXIT_CODE);
                }
            }
        })
        .context("spawning signal thread")?;
    Ok(())
}

/// Returns `false` once the process should stop waiting and exit.
fn on_signal(cancel: &CancellationSignal, sig: i32) -> bool {
    if cancel.cancel() {
        info!("Signal {sig} received, preparing for graceful shutdown...");
        true
    } else {
        warn!("Signal {sig} received again, exiting without waiting for the monitor");
        false
    }
}

fn feed_from_stdin(pin: SimPin) -> Result<()> {
    thread::Builder::new()
        .name("sim-stdin".into())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                match line.trim() {
                    "1" | "high" => pin.set_level(true),
                    "0" | "low" => pin.set_level(false),
                    "" => {}
                    other => warn!("sim: ignoring '{other}' (expected 1 or 0)"),
                }
            }
        })
        .context("spawning stdin reader")?;
    Ok(())
}

fn watch<P>(pin: P, config: &MonitorConfig, cancel: CancellationSignal) -> Result<ExitCode>
where
    P: InputPin + Send + 'static,
{
    let sensor = ContactSensor::new(pin, config.active_level);
    let monitor = SensorMonitor::new(sensor, config)?;
    let (sink, events) = ChannelEventSink::pair();

    let mut handle = MonitorHandle::new(
        format!("alarm-ch{}", config.channel),
        monitor,
        sink,
        cancel,
    );
    handle.start()?;
    info!("Monitor '{}' running, Ctrl-C to stop", handle.name());

    let mut console = LogEventSink::new(format!("channel {}", config.channel));
    for event in &events {
        console.emit(&event);
    }

    let exit = handle.join()?;
    drop(exit.reader.into_inner());
    info!("Channel {} released", config.channel);

    match exit.outcome {
        Ok(summary) => {
            info!(
                "Exiting: {} samples, {} alarms, final state {:?}",
                summary.samples, summary.alarms, summary.final_state
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!("Monitor failed: {e}");
            Ok(ExitCode::FAILURE)
        }
    }
}
