//! Configuration module for the integration bot.
//!
//! Handles loading of Telegram credentials and per-integration
//! settings from the process environment.

mod settings;

pub use settings::{ConfigError, GithubConfig, TelegramConfig};
