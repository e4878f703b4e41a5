//! # Duofit Core Library
//!
//! This library provides the interval timer behind the Duofit workout
//! utility: a prep phase followed by a workout phase, with a trailing
//! "End" cooldown window shown over the last seconds of the workout.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A wall-clock-based state machine that requires the caller
//!   to periodically invoke `tick()` for progress updates
//! - **Events**: Value snapshots pushed to an [`EventSink`] for rendering or sound
//! - **Storage**: Read-only TOML configuration
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`display_phase`]: Projection of the authoritative phase onto Prep / Workout / End
//! - [`Config`]: Application configuration

pub mod error;
pub mod events;
pub mod storage;
pub mod text;
pub mod timer;

pub use error::{ConfigError, CoreError, ValidationError};
pub use events::{dispatch, Event, EventSink};
pub use storage::{Config, Palette};
pub use text::{format_seconds, parse_time};
pub use timer::{
    display_phase, Clock, DisplayPhase, ManualClock, Phase, SignalStrength, SystemClock,
    TimerConfig, TimerEngine, TimerSnapshot, TimerState,
};
