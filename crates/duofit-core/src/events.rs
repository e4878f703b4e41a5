use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{DisplayPhase, SignalStrength, TimerConfig, TimerSnapshot};

/// Every state change of the timer produces an Event.
/// Renderers and sound players consume them through an [`EventSink`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Configured {
        config: TimerConfig,
        /// True when the run is active and the config waits for a reset.
        deferred: bool,
        at: DateTime<Utc>,
    },
    Started {
        phase: DisplayPhase,
        remaining_secs: f64,
        at: DateTime<Utc>,
    },
    Paused {
        phase: DisplayPhase,
        remaining_secs: f64,
        at: DateTime<Utc>,
    },
    Reset {
        snapshot: TimerSnapshot,
        at: DateTime<Utc>,
    },
    /// A phase boundary was crossed (Big) or a tick landed in the End window (Small).
    Signal {
        phase: DisplayPhase,
        strength: SignalStrength,
    },
    /// Emitted on every running tick, after any Signal of the same tick.
    Updated {
        phase: DisplayPhase,
        remaining_secs: f64,
        progress: f64,
    },
}

/// Receiver for timer notifications. Implementations must not fail;
/// the engine does not care whether or how events are rendered.
pub trait EventSink {
    fn handle(&mut self, event: &Event);
}

impl EventSink for Vec<Event> {
    fn handle(&mut self, event: &Event) {
        self.push(event.clone());
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn handle(&mut self, event: &Event) {
        (**self).handle(event);
    }
}

/// Feed events to a sink in emission order.
pub fn dispatch<'a, I, S>(events: I, sink: &mut S)
where
    I: IntoIterator<Item = &'a Event>,
    S: EventSink + ?Sized,
{
    for event in events {
        sink.handle(event);
    }
}
