use serde::{Deserialize, Serialize};

use super::config::TimerConfig;

/// Authoritative timeline segment. There are only two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Prep,
    Workout,
}

/// What the user sees. `End` is an overlay on the tail of `Workout`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayPhase {
    Prep,
    Workout,
    End,
}

impl DisplayPhase {
    pub fn label(&self) -> &'static str {
        match self {
            DisplayPhase::Prep => "PREP",
            DisplayPhase::Workout => "WORK",
            DisplayPhase::End => "END",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalStrength {
    /// Ordinary tick inside the End window.
    Small,
    /// A phase just ran out.
    Big,
}

/// Project the authoritative phase onto the displayed one.
///
/// The boundary is inclusive: `remaining == effective_end` is already End.
pub fn display_phase(phase: Phase, remaining_secs: f64, config: &TimerConfig) -> DisplayPhase {
    match phase {
        Phase::Prep => DisplayPhase::Prep,
        Phase::Workout if remaining_secs <= config.effective_end() => DisplayPhase::End,
        Phase::Workout => DisplayPhase::Workout,
    }
}
