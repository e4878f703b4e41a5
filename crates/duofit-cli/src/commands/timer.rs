use std::io::{self, BufRead};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use clap::{Args, Subcommand};
use duofit_core::{
    dispatch, parse_time, Clock, Config, EventSink, ManualClock, SystemClock, TimerConfig,
    TimerEngine, TimerState,
};
use tracing::{debug, info};

use crate::render::RingRenderer;
use crate::sink::{JsonSink, TerminalSink};

/// Upper bound on ticks a simulation may take.
const MAX_SIMULATED_TICKS: f64 = 10_000_000.0;

/// Durations given on the command line; unset ones fall back to the config.
#[derive(Args, Debug, Clone, Default)]
pub struct DurationArgs {
    /// Prep duration (MM:SS or seconds)
    #[arg(long, value_parser = parse_time)]
    pub prep: Option<u32>,
    /// Workout duration (MM:SS or seconds)
    #[arg(long, value_parser = parse_time)]
    pub workout: Option<u32>,
    /// Trailing End window inside the workout (MM:SS or seconds)
    #[arg(long, value_parser = parse_time)]
    pub end: Option<u32>,
}

impl DurationArgs {
    fn resolve(&self, config: &Config) -> TimerConfig {
        TimerConfig::from_secs(
            self.prep.unwrap_or(config.timer.prep),
            self.workout.unwrap_or(config.timer.workout),
            self.end.unwrap_or(config.timer.end),
        )
    }
}

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run an interval session in real time.
    ///
    /// Type a line on stdin to control it: `p` pause/resume, `r` reset, `q` quit.
    Run {
        #[command(flatten)]
        durations: DurationArgs,
        /// Tick interval in milliseconds (overrides ticker.interval_ms)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        tick_ms: Option<u64>,
        /// Print JSON lines instead of the live ring
        #[arg(long)]
        json: bool,
    },
    /// Replay a session instantly on a simulated clock
    Simulate {
        #[command(flatten)]
        durations: DurationArgs,
        /// Seconds the simulated clock advances per tick
        #[arg(long, default_value = "1", value_parser = parse_step)]
        step: f64,
        /// Print JSON lines instead of the ring
        #[arg(long)]
        json: bool,
    },
}

fn parse_step(s: &str) -> Result<f64, String> {
    let step: f64 = s.parse().map_err(|_| format!("invalid step '{s}'"))?;
    if step.is_finite() && step > 0.0 {
        Ok(step)
    } else {
        Err("step must be a positive number of seconds".into())
    }
}

/// Commands read from stdin during a live run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    /// Pause if running, start otherwise.
    Toggle,
    Reset,
    Quit,
}

impl Control {
    fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "p" => Some(Control::Toggle),
            "r" => Some(Control::Reset),
            "q" => Some(Control::Quit),
            _ => None,
        }
    }
}

/// Read controls on a helper thread. The channel disconnects at EOF.
fn spawn_controls() -> Receiver<Control> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            match Control::parse(&line) {
                Some(control) => {
                    if tx.send(control).is_err() {
                        break;
                    }
                }
                None => debug!(input = %line.trim(), "unknown control ignored"),
            }
        }
    });
    rx
}

fn make_sink<C: Clock + 'static>(json: bool, config: &Config, clock: C) -> Box<dyn EventSink> {
    if json {
        Box::new(JsonSink::new(io::stdout(), clock))
    } else {
        Box::new(TerminalSink::new(
            io::stdout(),
            RingRenderer::new(config.palette.clone()),
            config.signals.enabled,
            config.signals.bell,
        ))
    }
}

fn run_live(
    timer: TimerConfig,
    interval: Duration,
    json: bool,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = TimerEngine::new(timer);
    let mut sink = make_sink(json, config, SystemClock::new());
    info!(?timer, interval_ms = interval.as_millis() as u64, "starting run");

    let controls = spawn_controls();
    let mut controls_open = true;

    if let Some(event) = engine.start() {
        sink.handle(&event);
    }
    'run: loop {
        while controls_open {
            match controls.try_recv() {
                Ok(Control::Toggle) => {
                    let event = if engine.is_running() {
                        engine.pause()
                    } else {
                        engine.start()
                    };
                    if let Some(event) = event {
                        sink.handle(&event);
                    }
                }
                Ok(Control::Reset) => sink.handle(&engine.reset()),
                Ok(Control::Quit) => break 'run,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => controls_open = false,
            }
        }
        if engine.state() == TimerState::Finished {
            break;
        }
        // Stopped with nobody left to resume it.
        if !engine.is_running() && !controls_open {
            break;
        }
        thread::sleep(interval);
        if engine.is_running() {
            dispatch(&engine.tick(), sink.as_mut());
        }
    }
    if !json {
        println!();
    }
    Ok(())
}

fn run_simulated(
    timer: TimerConfig,
    step: f64,
    json: bool,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let expected_ticks = (timer.total_secs() / step).ceil() + 2.0;
    if expected_ticks > MAX_SIMULATED_TICKS {
        return Err(format!(
            "step of {step}s is too small for a {}s run",
            timer.total_secs()
        )
        .into());
    }

    let clock = ManualClock::new();
    let mut engine = TimerEngine::with_clock(timer, clock.clone());
    let mut sink = make_sink(json, config, clock.clone());
    info!(?timer, step, "starting simulated run");

    if let Some(event) = engine.start() {
        sink.handle(&event);
    }
    while engine.is_running() {
        clock.advance(step);
        dispatch(&engine.tick(), sink.as_mut());
    }
    if !json {
        println!();
    }
    Ok(())
}

pub fn run(action: TimerAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimerAction::Run {
            durations,
            tick_ms,
            json,
        } => {
            let interval = Duration::from_millis(tick_ms.unwrap_or(config.ticker.interval_ms));
            run_live(durations.resolve(config), interval, json, config)
        }
        TimerAction::Simulate {
            durations,
            step,
            json,
        } => run_simulated(durations.resolve(config), step, json, config),
    }
}
