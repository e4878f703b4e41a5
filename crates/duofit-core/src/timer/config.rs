use serde::{Deserialize, Serialize};

use super::phase::Phase;

/// Durations (in seconds) for one interval run.
///
/// `end` is not a separate segment: it is the trailing window of the
/// workout during which the display switches to "End".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimerConfig {
    pub prep: f64,
    pub workout: f64,
    pub end: f64,
}

impl TimerConfig {
    /// Build a config, clamping negative and non-finite values to 0.
    pub fn new(prep: f64, workout: f64, end: f64) -> Self {
        Self {
            prep: clamp_secs(prep),
            workout: clamp_secs(workout),
            end: clamp_secs(end),
        }
    }

    /// Same as [`TimerConfig::new`] for whole-second inputs.
    pub fn from_secs(prep: u32, workout: u32, end: u32) -> Self {
        Self::new(prep as f64, workout as f64, end as f64)
    }

    /// Length of the End overlay, never longer than the workout itself.
    pub fn effective_end(&self) -> f64 {
        self.end.min(self.workout)
    }

    pub fn duration_of(&self, phase: Phase) -> f64 {
        match phase {
            Phase::Prep => self.prep,
            Phase::Workout => self.workout,
        }
    }

    /// Whole run length from start to the terminal transition.
    pub fn total_secs(&self) -> f64 {
        self.prep + self.workout
    }

    /// Re-apply clamping, for values that bypassed [`TimerConfig::new`]
    /// (e.g. deserialized ones).
    pub fn sanitized(self) -> Self {
        Self::new(self.prep, self.workout, self.end)
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self::from_secs(10, 60, 10)
    }
}

fn clamp_secs(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
