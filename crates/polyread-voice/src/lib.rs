#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

pub mod console;
pub mod driver;
pub mod engine;
pub mod error;
pub mod scheduler;
pub mod service;

// Re-export key types for convenience
pub use console::ConsoleSpeechEngine;
pub use driver::{PlaybackDriver, PlaybackHandle};
pub use engine::{SpeechEngine, SpeechRequest};
pub use error::VoiceError;
pub use scheduler::{Directive, Generation, PacingConfig, PlaybackScheduler, PlaybackSnapshot};
pub use service::{NowReading, ReaderService};
