//! Command handlers.
//!
//! Handlers are thin: they take the loaded [`CliConfig`](crate::config::CliConfig),
//! call into `polyread-core` / `polyread-voice`, and format the result for
//! the terminal. No classification or scheduling logic lives here.

pub mod classify;
pub mod languages;
pub mod read;
pub mod voices;
