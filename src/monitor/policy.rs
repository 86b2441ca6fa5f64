//! Debounce policies.
//!
//! Each policy turns a stream of raw readings into at most one
//! [`Transition`] per reading.  Policies are pure: time comes in as
//! `now_ms` (monotonic milliseconds since the loop started) and any pause
//! the loop should take comes back in the [`Step`].
//!
//! | Policy      | Clear → Alarmed                      | Alarmed → Clear      |
//! |-------------|--------------------------------------|----------------------|
//! | `Latching`  | `threshold` consecutive hits         | never                |
//! | `Edge`      | first disagreeing reading            | first disagreeing    |
//! | `Confirm`   | still triggered after `delay`        | first clear reading  |
//!
//! `Edge` ignores every reading taken within `cooldown` of its last
//! accepted transition.

use core::time::Duration;

use crate::app::events::AlarmState;
use crate::config::PolicyConfig;
use crate::error::MonitorError;

/// A debounced state change accepted by a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Raised,
    Cleared,
}

/// Result of feeding one reading into a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Step {
    pub transition: Option<Transition>,
    /// Wait this long before the next sample instead of the normal interval.
    pub pause: Option<Duration>,
}

impl Step {
    const IDLE: Self = Self {
        transition: None,
        pause: None,
    };
}

/// Common interface of every debounce policy.
pub trait Debounce {
    /// Adopt the state implied by the very first reading.  No debounce
    /// evidence is required since there is no history yet.
    fn seed(&mut self, triggered: bool) -> AlarmState;

    /// Feed one raw reading taken at `now_ms`.
    fn observe(&mut self, triggered: bool, now_ms: u64) -> Step;

    fn state(&self) -> AlarmState;
}

// ───────────────────────────────────────────────────────────────
// Latching threshold
// ───────────────────────────────────────────────────────────────

/// Counts consecutive triggered readings and latches once the count
/// reaches the threshold.  Nothing clears it afterwards.
#[derive(Debug, Clone)]
pub struct Latching {
    threshold: u32,
    hits: u32,
    state: AlarmState,
}

impl Latching {
    pub fn new(threshold: u32) -> Result<Self, MonitorError> {
        if threshold < 1 {
            return Err(MonitorError::MisconfiguredThreshold(threshold));
        }
        Ok(Self {
            threshold,
            hits: 0,
            state: AlarmState::Clear,
        })
    }

    /// Consecutive triggered readings since the last clear one.
    pub fn hits(&self) -> u32 {
        self.hits
    }
}

impl Debounce for Latching {
    fn seed(&mut self, triggered: bool) -> AlarmState {
        self.hits = 0;
        self.state = if triggered {
            AlarmState::Alarmed
        } else {
            AlarmState::Clear
        };
        self.state
    }

    fn observe(&mut self, triggered: bool, _now_ms: u64) -> Step {
        if !triggered {
            self.hits = 0;
            return Step::IDLE;
        }

        self.hits = self.hits.saturating_add(1);
        if self.state == AlarmState::Clear && self.hits >= self.threshold {
            self.state = AlarmState::Alarmed;
            return Step {
                transition: Some(Transition::Raised),
                pause: None,
            };
        }
        Step::IDLE
    }

    fn state(&self) -> AlarmState {
        self.state
    }
}

// ───────────────────────────────────────────────────────────────
// Edge with cooldown
// ───────────────────────────────────────────────────────────────

/// Follows every edge of the raw input, then holds off for `cooldown`
/// so the bounce of one physical event cannot produce a second edge.
#[derive(Debug, Clone)]
pub struct Edge {
    cooldown: Duration,
    state: AlarmState,
    last_edge_ms: Option<u64>,
}

impl Edge {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            state: AlarmState::Clear,
            last_edge_ms: None,
        }
    }

    fn cooling_down(&self, now_ms: u64) -> bool {
        self.last_edge_ms
            .is_some_and(|edge| now_ms.saturating_sub(edge) < self.cooldown.as_millis() as u64)
    }
}

impl Debounce for Edge {
    fn seed(&mut self, triggered: bool) -> AlarmState {
        self.last_edge_ms = None;
        self.state = if triggered {
            AlarmState::Alarmed
        } else {
            AlarmState::Clear
        };
        self.state
    }

    fn observe(&mut self, triggered: bool, now_ms: u64) -> Step {
        if self.cooling_down(now_ms) {
            return Step::IDLE;
        }

        let transition = match (self.state, triggered) {
            (AlarmState::Clear, true) => Transition::Raised,
            (AlarmState::Alarmed, false) => Transition::Cleared,
            _ => return Step::IDLE,
        };

        self.state = match transition {
            Transition::Raised => AlarmState::Alarmed,
            Transition::Cleared => AlarmState::Clear,
        };
        self.last_edge_ms = Some(now_ms);
        Step {
            transition: Some(transition),
            pause: Some(self.cooldown),
        }
    }

    fn state(&self) -> AlarmState {
        self.state
    }
}

// ───────────────────────────────────────────────────────────────
// Delayed confirmation
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfirmState {
    Clear,
    Pending { since_ms: u64 },
    Alarmed,
}

/// Raises only if the input still reads triggered `delay` after it first
/// went triggered.  Clears on the first clear reading.
#[derive(Debug, Clone)]
pub struct Confirm {
    delay: Duration,
    state: ConfirmState,
}

impl Confirm {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            state: ConfirmState::Clear,
        }
    }
}

impl Debounce for Confirm {
    fn seed(&mut self, triggered: bool) -> AlarmState {
        self.state = if triggered {
            ConfirmState::Alarmed
        } else {
            ConfirmState::Clear
        };
        self.state()
    }

    fn observe(&mut self, triggered: bool, now_ms: u64) -> Step {
        match (self.state, triggered) {
            (ConfirmState::Clear, true) => {
                self.state = ConfirmState::Pending { since_ms: now_ms };
                Step {
                    transition: None,
                    pause: Some(self.delay),
                }
            }

            (ConfirmState::Pending { since_ms }, true) => {
                if now_ms.saturating_sub(since_ms) >= self.delay.as_millis() as u64 {
                    self.state = ConfirmState::Alarmed;
                    Step {
                        transition: Some(Transition::Raised),
                        pause: None,
                    }
                } else {
                    Step::IDLE
                }
            }

            // Blip gone before confirmation: discard silently.
            (ConfirmState::Pending { .. }, false) => {
                self.state = ConfirmState::Clear;
                Step::IDLE
            }

            (ConfirmState::Alarmed, false) => {
                self.state = ConfirmState::Clear;
                Step {
                    transition: Some(Transition::Cleared),
                    pause: None,
                }
            }

            (ConfirmState::Clear, false) | (ConfirmState::Alarmed, true) => Step::IDLE,
        }
    }

    fn state(&self) -> AlarmState {
        match self.state {
            ConfirmState::Alarmed => AlarmState::Alarmed,
            ConfirmState::Clear | ConfirmState::Pending { .. } => AlarmState::Clear,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Configured policy
// ───────────────────────────────────────────────────────────────

/// The policy selected by [`PolicyConfig`], dispatched statically.
#[derive(Debug, Clone)]
pub enum Policy {
    Latching(Latching),
    Edge(Edge),
    Confirm(Confirm),
}

impl Policy {
    /// Build the policy a config names.  A threshold below 1 is rejected
    /// here, before any monitor exists.
    pub fn from_config(config: &PolicyConfig) -> Result<Self, MonitorError> {
        Ok(match *config {
            PolicyConfig::Threshold { threshold } => Self::Latching(Latching::new(threshold)?),
            PolicyConfig::Edge { cooldown_ms } => {
                Self::Edge(Edge::new(Duration::from_millis(cooldown_ms)))
            }
            PolicyConfig::Confirm { delay_ms } => {
                Self::Confirm(Confirm::new(Duration::from_millis(delay_ms)))
            }
        })
    }

    fn inner(&mut self) -> &mut dyn Debounce {
        match self {
            Self::Latching(p) => p,
            Self::Edge(p) => p,
            Self::Confirm(p) => p,
        }
    }
}

impl Debounce for Policy {
    fn seed(&mut self, triggered: bool) -> AlarmState {
        self.inner().seed(triggered)
    }

    fn observe(&mut self, triggered: bool, now_ms: u64) -> Step {
        self.inner().observe(triggered, now_ms)
    }

    fn state(&self) -> AlarmState {
        match self {
            Self::Latching(p) => p.state(),
            Self::Edge(p) => p.state(),
            Self::Confirm(p) => p.state(),
        }
    }
}
