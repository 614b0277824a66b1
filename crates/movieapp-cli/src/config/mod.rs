//! Application configuration module.
//!
//! Manages the TOML config file holding the API base URL override,
//! request timeout, search debounce delay and runtime cache TTL.

#[allow(clippy::module_inception)]
mod config;

#[allow(clippy::module_name_repetitions)]
pub use config::AppConfig;
