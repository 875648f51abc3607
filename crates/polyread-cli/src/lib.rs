#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by the main.rs binary only
use anyhow as _;
use dotenvy as _;
use tracing_subscriber as _;

pub mod commands;
pub mod config;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;
pub mod text;

// Re-export primary types for convenient access
pub use commands::{Commands, TextArgs};
pub use config::{CliConfig, Overrides, VoiceOverride};
pub use error::CliError;
pub use parser::Cli;
