//! Event sinks for the terminal: a live ring line, or JSON lines.

use std::io::Write;

use duofit_core::{Clock, Event, EventSink, SignalStrength};
use serde::Serialize;

use crate::render::RingRenderer;

const BELL: &str = "\x07";

/// Redraws one status line in place and rings the bell on signals.
///
/// Small signals arrive on every tick of the End window, so the bell for
/// them rings at most once per displayed second.
pub struct TerminalSink<W: Write> {
    out: W,
    renderer: RingRenderer,
    signals: bool,
    bell: bool,
    /// A Small signal is waiting for the `Updated` that follows it.
    small_pending: bool,
    /// Whole second (as displayed) the last Small bell rang for.
    last_bell_second: Option<u64>,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W, renderer: RingRenderer, signals: bool, bell: bool) -> Self {
        Self {
            out,
            renderer,
            signals,
            bell,
            small_pending: false,
            last_bell_second: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            tracing::debug!("terminal write failed: {e}");
        }
    }
}

impl<W: Write> EventSink for TerminalSink<W> {
    fn handle(&mut self, event: &Event) {
        match event {
            Event::Updated {
                phase,
                remaining_secs,
                progress,
            } => {
                if std::mem::take(&mut self.small_pending) {
                    let second = remaining_secs.max(0.0).ceil() as u64;
                    if self.last_bell_second != Some(second) {
                        self.last_bell_second = Some(second);
                        self.write(BELL);
                    }
                }
                let frame = self.renderer.frame(*phase, *remaining_secs, *progress);
                let line = self.renderer.line(&frame);
                self.write(&format!("\r{line}"));
            }
            Event::Signal { phase, strength } if self.signals => match strength {
                SignalStrength::Small => self.small_pending = self.bell,
                SignalStrength::Big => {
                    let bell = if self.bell { BELL } else { "" };
                    self.write(&format!("{bell}\n{} complete\n", phase.label()))
                }
            },
            Event::Paused { remaining_secs, .. } => {
                let text = duofit_core::format_seconds(*remaining_secs);
                self.write(&format!("\npaused at {text}\n"));
            }
            Event::Started { remaining_secs, .. } => {
                let text = duofit_core::format_seconds(*remaining_secs);
                self.write(&format!("started at {text}\n"));
            }
            Event::Reset { snapshot, .. } => {
                self.small_pending = false;
                self.last_bell_second = None;
                let frame = self.renderer.frame(
                    snapshot.display_phase,
                    snapshot.remaining_secs,
                    snapshot.progress,
                );
                let line = self.renderer.line(&frame);
                self.write(&format!("\nreset\n{line}"));
            }
            _ => {}
        }
    }
}

#[derive(Serialize)]
struct Record<'a> {
    /// Seconds on the sink's clock when the event was handled.
    t: f64,
    #[serde(flatten)]
    event: &'a Event,
}

/// Writes one JSON object per event, stamped with the given clock.
pub struct JsonSink<W: Write, C: Clock> {
    out: W,
    clock: C,
}

impl<W: Write, C: Clock> JsonSink<W, C> {
    pub fn new(out: W, clock: C) -> Self {
        Self { out, clock }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write, C: Clock> EventSink for JsonSink<W, C> {
    fn handle(&mut self, event: &Event) {
        let record = Record {
            t: self.clock.now_secs(),
            event,
        };
        let written = serde_json::to_string(&record)
            .map_err(std::io::Error::from)
            .and_then(|line| writeln!(self.out, "{line}"));
        if let Err(e) = written {
            tracing::debug!("json write failed: {e}");
        }
    }
}
