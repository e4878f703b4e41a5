//! Text rendering of the progress ring.

use duofit_core::{format_seconds, DisplayPhase, Palette};

const BAR_WIDTH: usize = 24;

/// Everything needed to draw one frame of the ring.
#[derive(Debug, Clone, PartialEq)]
pub struct RingFrame {
    pub label: &'static str,
    pub time_text: String,
    pub color: String,
    /// Degrees; the arc starts at 12 o'clock.
    pub start_angle: f32,
    /// Degrees of arc to fill, `progress * 360`.
    pub sweep: f32,
}

/// Projects timer values onto ring frames. Colors are fixed at construction.
#[derive(Debug, Clone)]
pub struct RingRenderer {
    palette: Palette,
}

impl RingRenderer {
    pub const START_ANGLE: f32 = 90.0;

    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    pub fn frame(&self, phase: DisplayPhase, remaining_secs: f64, progress: f64) -> RingFrame {
        let progress = progress.clamp(0.0, 1.0) as f32;
        RingFrame {
            label: phase.label(),
            time_text: format_seconds(remaining_secs),
            color: self.palette.color_for(phase).to_string(),
            start_angle: Self::START_ANGLE,
            sweep: progress * 360.0,
        }
    }

    /// One terminal line: `WORK  00:42  [#########-------]  green`.
    pub fn line(&self, frame: &RingFrame) -> String {
        let filled = ((frame.sweep / 360.0) * BAR_WIDTH as f32).round() as usize;
        let filled = filled.min(BAR_WIDTH);
        format!(
            "{:<4}  {}  [{}{}]  {}",
            frame.label,
            frame.time_text,
            "#".repeat(filled),
            "-".repeat(BAR_WIDTH - filled),
            frame.color,
        )
    }
}
