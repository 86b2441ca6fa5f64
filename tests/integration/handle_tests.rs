//! Threaded lifecycle: start, stop, join and the reader hand-back.

use std::thread;
use std::time::{Duration, Instant};

use alarmwatch::adapters::channel_sink::ChannelEventSink;
use alarmwatch::app::events::{AlarmEvent, AlarmState};
use alarmwatch::config::PolicyConfig;
use alarmwatch::error::{MonitorError, SensorError};
use alarmwatch::sensors::contact::{ActiveLevel, ContactSensor};
use alarmwatch::sensors::sim::SimPin;
use alarmwatch::{CancellationSignal, MonitorHandle, SensorMonitor};

use crate::mock_hw::{RecordingSink, config};

type SimHandle<S> = MonitorHandle<ContactSensor<SimPin>, S>;

fn sim_handle<S>(pin: &SimPin, interval_ms: u64, policy: PolicyConfig, sink: S) -> SimHandle<S>
where
    S: alarmwatch::app::ports::EventSink + Send + 'static,
{
    sim_handle_with(pin, interval_ms, policy, sink, CancellationSignal::new())
}

fn sim_handle_with<S>(
    pin: &SimPin,
    interval_ms: u64,
    policy: PolicyConfig,
    sink: S,
    cancel: CancellationSignal,
) -> SimHandle<S>
where
    S: alarmwatch::app::ports::EventSink + Send + 'static,
{
    let sensor = ContactSensor::new(pin.clone(), ActiveLevel::High);
    let monitor = SensorMonitor::new(sensor, &config(interval_ms, policy)).unwrap();
    let handle = MonitorHandle::new("test-monitor", monitor, sink, cancel);
    assert_eq!(handle.name(), "test-monitor");
    handle
}

/// Poll `cond` for up to two seconds.
fn eventually(cond: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    cond()
}

const THRESHOLD_2: PolicyConfig = PolicyConfig::Threshold { threshold: 2 };

// ── Start / stop / join ──────────────────────────────────────

#[test]
fn stop_then_join_returns_reader_and_reads_cease() {
    let pin = SimPin::new(false);
    let sink = RecordingSink::new();
    let mut handle = sim_handle(&pin, 2, THRESHOLD_2, sink.clone());

    handle.start().unwrap();
    assert!(handle.is_running());
    assert!(eventually(|| pin.reads() >= 3));

    assert!(handle.stop());
    let exit = handle.join().unwrap();
    let summary = exit.outcome.unwrap();

    let reads_at_join = pin.reads();
    assert_eq!(summary.samples, reads_at_join);
    thread::sleep(Duration::from_millis(20));
    assert_eq!(pin.reads(), reads_at_join, "no reads after join");

    let events = sink.events();
    assert_eq!(
        events.first(),
        Some(&AlarmEvent::Started {
            state: AlarmState::Clear
        })
    );
    assert_eq!(
        events.last(),
        Some(&AlarmEvent::Stopped {
            samples: summary.samples
        })
    );

    // The pin handed back is the same shared line.
    let released = exit.reader.into_inner();
    assert_eq!(released.reads(), reads_at_join);
}

#[test]
fn stop_interrupts_long_interval_promptly() {
    let pin = SimPin::new(false);
    let mut handle = sim_handle(&pin, 60_000, THRESHOLD_2, RecordingSink::new());

    handle.start().unwrap();
    assert!(eventually(|| pin.reads() == 1));

    let start = Instant::now();
    handle.stop();
    let exit = handle.join().unwrap();

    assert!(start.elapsed() < Duration::from_secs(5));
    assert_eq!(exit.outcome.unwrap().samples, 1);
    assert_eq!(pin.reads(), 1);
}

#[test]
fn stop_interrupts_edge_cooldown_promptly() {
    let pin = SimPin::new(false);
    let sink = RecordingSink::new();
    let mut handle = sim_handle(
        &pin,
        2,
        PolicyConfig::Edge { cooldown_ms: 60_000 },
        sink.clone(),
    );
    handle.start().unwrap();
    assert!(eventually(|| pin.reads() >= 1));

    // The next sample is an edge; the loop then parks for the full cooldown.
    pin.set_level(true);
    assert!(eventually(|| sink.transitions() == vec![AlarmEvent::Raised { index: 1 }]));
    let reads = pin.reads();

    let start = Instant::now();
    handle.stop();
    let exit = handle.join().unwrap();

    assert!(start.elapsed() < Duration::from_secs(5));
    let summary = exit.outcome.unwrap();
    assert_eq!(summary.alarms, 1);
    assert_eq!(summary.samples, reads);
    thread::sleep(Duration::from_millis(20));
    assert_eq!(pin.reads(), reads, "no reads after the cooldown was cut short");
}

#[test]
fn stop_interrupts_confirm_delay_promptly() {
    let pin = SimPin::new(false);
    let sink = RecordingSink::new();
    let mut handle = sim_handle(
        &pin,
        2,
        PolicyConfig::Confirm { delay_ms: 60_000 },
        sink.clone(),
    );
    handle.start().unwrap();
    assert!(eventually(|| pin.reads() >= 1));

    // A triggered reading opens the confirmation window; nothing is emitted
    // and the read count stops moving while the loop waits out the delay.
    pin.set_level(true);
    assert!(eventually(|| {
        let before = pin.reads();
        thread::sleep(Duration::from_millis(30));
        pin.reads() == before
    }));
    let reads = pin.reads();

    let start = Instant::now();
    let exit = handle.shutdown().unwrap();

    assert!(start.elapsed() < Duration::from_secs(5));
    assert_eq!(exit.outcome.unwrap().alarms, 0);
    assert!(sink.transitions().is_empty(), "unconfirmed trigger raises nothing");
    assert_eq!(pin.reads(), reads);
}

#[test]
fn owner_waiting_on_signal_is_released_by_stop() {
    let pin = SimPin::new(false);
    let cancel = CancellationSignal::new();
    let waiter = cancel.clone();
    let mut handle = sim_handle_with(&pin, 5, THRESHOLD_2, RecordingSink::new(), cancel);
    handle.start().unwrap();

    let idle = thread::spawn(move || waiter.wait());
    thread::sleep(Duration::from_millis(10));
    assert!(!idle.is_finished());

    handle.stop();
    idle.join().unwrap();
    assert!(handle.join().unwrap().outcome.is_ok());
}

#[test]
fn stop_is_idempotent() {
    let pin = SimPin::new(false);
    let mut handle = sim_handle(&pin, 5, THRESHOLD_2, RecordingSink::new());
    handle.start().unwrap();

    assert!(handle.stop());
    assert!(!handle.stop());
    assert!(!handle.stop());
    assert!(handle.shutdown().unwrap().outcome.is_ok());
}

#[test]
fn start_twice_is_double_start() {
    let pin = SimPin::new(false);
    let mut handle = sim_handle(&pin, 5, THRESHOLD_2, RecordingSink::new());
    handle.start().unwrap();

    assert_eq!(handle.start().unwrap_err(), MonitorError::DoubleStart);
    assert!(handle.is_running(), "rejected start leaves the loop alone");
    assert!(handle.shutdown().unwrap().outcome.is_ok());
}

#[test]
fn start_after_stop_is_use_after_stop() {
    let pin = SimPin::new(false);
    let mut handle = sim_handle(&pin, 5, THRESHOLD_2, RecordingSink::new());
    handle.start().unwrap();
    handle.stop();

    assert_eq!(handle.start().unwrap_err(), MonitorError::UseAfterStop);
    handle.join().unwrap();
}

#[test]
fn start_on_stopped_fresh_handle_is_use_after_stop() {
    let pin = SimPin::new(false);
    let mut handle = sim_handle(&pin, 5, THRESHOLD_2, RecordingSink::new());
    handle.stop();

    assert_eq!(handle.start().unwrap_err(), MonitorError::UseAfterStop);
    assert_eq!(pin.reads(), 0);
}

#[test]
fn join_without_start_hands_reader_back() {
    let pin = SimPin::new(true);
    let handle = sim_handle(&pin, 5, THRESHOLD_2, RecordingSink::new());

    let exit = handle.join().unwrap();
    assert_eq!(exit.outcome.unwrap_err(), MonitorError::UseAfterStop);
    assert_eq!(exit.reader.active_level(), ActiveLevel::High);
    assert_eq!(pin.reads(), 0);
}

#[test]
fn dropping_running_handle_stops_the_loop() {
    let pin = SimPin::new(false);
    let mut handle = sim_handle(&pin, 2, THRESHOLD_2, RecordingSink::new());
    handle.start().unwrap();
    assert!(eventually(|| pin.reads() >= 1));

    drop(handle);
    let reads = pin.reads();
    thread::sleep(Duration::from_millis(20));
    assert_eq!(pin.reads(), reads);
}

// ── Alarms and failures on the thread ────────────────────────

#[test]
fn sustained_trigger_raises_one_alarm_over_channel() {
    let pin = SimPin::new(false);
    let (sink, events) = ChannelEventSink::pair();
    let mut handle = sim_handle(&pin, 2, THRESHOLD_2, sink);
    handle.start().unwrap();

    assert_eq!(
        events.recv_timeout(Duration::from_secs(2)).unwrap(),
        AlarmEvent::Started {
            state: AlarmState::Clear
        }
    );
    pin.set_level(true);
    assert_eq!(
        events.recv_timeout(Duration::from_secs(2)).unwrap(),
        AlarmEvent::Raised { index: 1 }
    );

    let exit = handle.shutdown().unwrap();
    let summary = exit.outcome.unwrap();
    assert_eq!(summary.alarms, 1);
    assert_eq!(summary.final_state, AlarmState::Alarmed);

    // Sink dropped with the loop: the receiver drains then disconnects.
    let rest: Vec<_> = events.iter().collect();
    assert_eq!(
        rest,
        vec![AlarmEvent::Stopped {
            samples: summary.samples
        }]
    );
}

#[test]
fn reader_fault_ends_loop_with_failure() {
    let pin = SimPin::new(false);
    let sink = RecordingSink::new();
    let mut handle = sim_handle(&pin, 2, THRESHOLD_2, sink.clone());
    handle.start().unwrap();
    assert!(eventually(|| pin.reads() >= 2));

    pin.inject_fault(true);
    assert!(eventually(|| !handle.is_running()));
    let reads = pin.reads();

    let exit = handle.join().unwrap();
    assert_eq!(
        exit.outcome.unwrap_err(),
        MonitorError::ReaderFailure(SensorError::GpioReadFailed)
    );

    let events = sink.events();
    assert_eq!(
        sink.count(|e| matches!(e, AlarmEvent::ReaderFailed { .. })),
        1
    );
    assert!(matches!(
        events.last(),
        Some(AlarmEvent::ReaderFailed {
            error: SensorError::GpioReadFailed,
            ..
        })
    ));
    assert_eq!(pin.reads(), reads, "no reads after the failure");
}

#[test]
fn start_after_failure_is_use_after_stop() {
    let pin = SimPin::new(false);
    pin.inject_fault(true);
    let mut handle = sim_handle(&pin, 2, THRESHOLD_2, RecordingSink::new());
    handle.start().unwrap();
    assert!(eventually(|| !handle.is_running()));

    assert_eq!(handle.start().unwrap_err(), MonitorError::UseAfterStop);
    assert!(handle.join().unwrap().outcome.is_err());
}
