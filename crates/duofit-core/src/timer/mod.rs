mod clock;
mod config;
mod engine;
mod phase;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::TimerConfig;
pub use engine::{TimerEngine, TimerSnapshot, TimerState};
pub use phase::{display_phase, DisplayPhase, Phase, SignalStrength};
