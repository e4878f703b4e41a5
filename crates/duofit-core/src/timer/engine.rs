//! Interval timer engine implementation.
//!
//! The engine is a wall-clock-based state machine. It does not use
//! internal threads - the caller is responsible for calling `tick()` periodically.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!            |
//!            v
//!         Finished -> (start) -> Idle -> Running
//! ```
//!
//! The run itself is `Prep -> Workout`. The "End" window is a projection
//! over the tail of `Workout` (see [`display_phase`]) and never a stored phase.
//!
//! ## Usage
//!
//! ```
//! use duofit_core::{DisplayPhase, ManualClock, TimerConfig, TimerEngine};
//!
//! let clock = ManualClock::new();
//! let mut engine = TimerEngine::with_clock(TimerConfig::from_secs(2, 5, 2), clock.clone());
//! engine.start();
//!
//! // In a loop:
//! clock.advance(1.0);
//! let events = engine.tick();
//! assert_eq!(events.len(), 1);
//! assert_eq!(engine.display_phase(), DisplayPhase::Prep);
//! assert_eq!(engine.remaining_secs(), 1.0);
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::clock::{Clock, SystemClock};
use super::config::TimerConfig;
use super::phase::{display_phase, DisplayPhase, Phase, SignalStrength};
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    /// Workout ran out. Terminal until the next `start()` or `reset()`.
    Finished,
}

/// Value copy of everything a renderer needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub state: TimerState,
    pub phase: Phase,
    pub display_phase: DisplayPhase,
    pub remaining_secs: f64,
    pub progress: f64,
    pub config: TimerConfig,
}

/// Core interval timer engine.
///
/// Operates on wall-clock deltas -- no internal thread.
/// The caller is responsible for calling `tick()` periodically.
#[derive(Debug, Clone)]
pub struct TimerEngine<C: Clock = SystemClock> {
    clock: C,
    /// Durations driving the current run.
    config: TimerConfig,
    /// Config received mid-run, applied on the next reset.
    pending: Option<TimerConfig>,
    state: TimerState,
    phase: Phase,
    /// Seconds left in `phase`, always within `0..=duration_of(phase)`.
    remaining_secs: f64,
    /// Fraction of the current phase still remaining, in `0..=1`.
    progress: f64,
    /// Clock reading at the last start/tick. `None` while not running.
    last_tick_secs: Option<f64>,
    /// Elapsed time not yet charged because the tick already made a transition.
    carry_secs: f64,
}

impl TimerEngine<SystemClock> {
    /// Create an engine driven by the system monotonic clock.
    pub fn new(config: TimerConfig) -> Self {
        Self::with_clock(config, SystemClock::new())
    }
}

impl<C: Clock> TimerEngine<C> {
    /// Create an engine with an explicit time source.
    ///
    /// Starts `Idle` in `Prep` with the full prep time remaining.
    pub fn with_clock(config: TimerConfig, clock: C) -> Self {
        let config = config.sanitized();
        Self {
            clock,
            config,
            pending: None,
            state: TimerState::Idle,
            phase: Phase::Prep,
            remaining_secs: config.prep,
            progress: 1.0,
            last_tick_secs: None,
            carry_secs: 0.0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn display_phase(&self) -> DisplayPhase {
        display_phase(self.phase, self.remaining_secs, &self.config)
    }

    pub fn remaining_secs(&self) -> f64 {
        self.remaining_secs
    }

    /// 1.0 .. 0.0 remaining fraction of the current phase.
    ///
    /// Inside the End window this stays relative to the whole workout.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Durations of the active run.
    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// Config waiting for the next reset, if one arrived mid-run.
    pub fn pending_config(&self) -> Option<&TimerConfig> {
        self.pending.as_ref()
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            state: self.state,
            phase: self.phase,
            display_phase: self.display_phase(),
            remaining_secs: self.remaining_secs,
            progress: self.progress,
            config: self.config,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Replace the durations. Applied at once unless a run is active,
    /// in which case they wait for the next `reset()`.
    pub fn configure(&mut self, config: TimerConfig) -> Event {
        let config = config.sanitized();
        let deferred = self.is_running();
        if deferred {
            debug!(?config, "configure while running: deferred until reset");
            self.pending = Some(config);
        } else {
            self.pending = None;
            self.config = config;
            self.restore_initial();
        }
        Event::Configured {
            config,
            deferred,
            at: Utc::now(),
        }
    }

    pub fn start(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Running => {
                debug!("start ignored: already running");
                None
            }
            TimerState::Finished => {
                // A finished run starts over from the top.
                self.reset();
                self.start()
            }
            TimerState::Idle | TimerState::Paused => {
                self.state = TimerState::Running;
                self.last_tick_secs = Some(self.clock.now_secs());
                Some(Event::Started {
                    phase: self.display_phase(),
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            debug!(state = ?self.state, "pause ignored: not running");
            return None;
        }
        self.state = TimerState::Paused;
        self.last_tick_secs = None;
        Some(Event::Paused {
            phase: self.display_phase(),
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Stop and return to the start of `Prep`, picking up any pending config.
    pub fn reset(&mut self) -> Event {
        if let Some(config) = self.pending.take() {
            self.config = config;
        }
        self.restore_initial();
        Event::Reset {
            snapshot: self.snapshot(),
            at: Utc::now(),
        }
    }

    /// Call periodically while running.
    ///
    /// Returns at most one `Signal` followed by exactly one `Updated`.
    /// Returns nothing when the timer is not running.
    pub fn tick(&mut self) -> Vec<Event> {
        if self.state != TimerState::Running {
            debug!(state = ?self.state, "tick ignored: not running");
            return Vec::new();
        }

        let mut events = Vec::with_capacity(2);
        let elapsed = self.take_elapsed();
        self.remaining_secs -= elapsed;

        if self.remaining_secs <= 0.0 {
            events.push(self.complete_phase());
        } else if self.display_phase() == DisplayPhase::End {
            events.push(Event::Signal {
                phase: DisplayPhase::End,
                strength: SignalStrength::Small,
            });
        }

        self.progress = self.compute_progress();
        events.push(Event::Updated {
            phase: self.display_phase(),
            remaining_secs: self.remaining_secs,
            progress: self.progress,
        });
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn restore_initial(&mut self) {
        self.state = TimerState::Idle;
        self.phase = Phase::Prep;
        self.remaining_secs = self.config.prep;
        self.progress = 1.0;
        self.last_tick_secs = None;
        self.carry_secs = 0.0;
    }

    fn take_elapsed(&mut self) -> f64 {
        let now = self.clock.now_secs();
        let delta = self
            .last_tick_secs
            .map(|last| (now - last).max(0.0))
            .unwrap_or(0.0);
        self.last_tick_secs = Some(now);
        delta + std::mem::take(&mut self.carry_secs)
    }

    /// One transition step. Any deficit beyond the next phase is carried
    /// into the following tick rather than looping here.
    fn complete_phase(&mut self) -> Event {
        match self.phase {
            Phase::Prep => {
                let overflow = self.remaining_secs;
                let credited = self.config.workout + overflow;
                self.phase = Phase::Workout;
                if credited < 0.0 {
                    self.carry_secs = -credited;
                    self.remaining_secs = 0.0;
                } else {
                    self.remaining_secs = credited;
                }
                info!(
                    overflow_secs = -overflow,
                    remaining_secs = self.remaining_secs,
                    "prep complete, workout started"
                );
                Event::Signal {
                    phase: DisplayPhase::Prep,
                    strength: SignalStrength::Big,
                }
            }
            Phase::Workout => {
                self.remaining_secs = 0.0;
                self.state = TimerState::Finished;
                self.last_tick_secs = None;
                info!(total_secs = self.config.total_secs(), "workout complete, run finished");
                Event::Signal {
                    phase: self.display_phase(),
                    strength: SignalStrength::Big,
                }
            }
        }
    }

    fn compute_progress(&self) -> f64 {
        let total = self.config.duration_of(self.phase);
        if total <= 0.0 {
            return 0.0;
        }
        (self.remaining_secs / total).clamp(0.0, 1.0)
    }
}
