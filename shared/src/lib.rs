// lib.rs - Emergency aid core

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod app;
pub mod assistant;
pub mod capabilities;
pub mod contacts;
pub mod countdown;
pub mod error;
pub mod event;
pub mod model;
pub mod profile;
pub mod settings;
pub mod view;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use crux_core::{render::Render, App as CruxApp};
pub use error::{AppError, ErrorKind};
pub use event::Event;
pub use model::Model;
pub use view::ViewModel;

pub const DEFAULT_COUNTDOWN_SECONDS: u32 = 10;
pub const TICK_INTERVAL_MS: u64 = 1000;
pub const ASSISTANT_REPLY_DELAY_MS: u64 = 1500;
pub const MAX_MESSAGE_LEN: usize = 2000;
pub const MAX_FIELD_LEN: usize = 256;

#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn get_current_time_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_time_is_after_epoch() {
        assert!(get_current_time_ms() > 0);
    }

    #[test]
    fn test_default_countdown_matches_config() {
        let config = countdown::CountdownConfig::default();
        assert_eq!(config.start_seconds, DEFAULT_COUNTDOWN_SECONDS);
        assert_eq!(config.tick_interval_ms, TICK_INTERVAL_MS);
    }

    #[test]
    fn test_reply_delay_is_longer_than_tick() {
        assert!(ASSISTANT_REPLY_DELAY_MS > TICK_INTERVAL_MS);
    }
}
