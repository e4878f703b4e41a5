mod config;

pub use config::{Config, Palette, SignalsConfig, TickerConfig, TimerDefaults};

use std::path::PathBuf;

/// Returns `~/.config/duofit[-dev]/` based on DUOFIT_ENV.
///
/// Set DUOFIT_ENV=dev to use the development directory. Nothing is
/// created here; Duofit only ever reads from this directory.
pub fn data_dir() -> PathBuf {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("DUOFIT_ENV").unwrap_or_else(|_| "production".to_string());

    if env == "dev" {
        base_dir.join("duofit-dev")
    } else {
        base_dir.join("duofit")
    }
}
