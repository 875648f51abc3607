//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for the polyread word-by-word reader.
///
/// This is the top-level parser that handles global options and dispatches
/// to subcommands.
#[derive(Parser)]
#[command(name = "polyread")]
#[command(about = "Read mixed-language text aloud, one word at a time")]
#[command(version)]
pub struct Cli {
    /// Settings file (defaults to <config dir>/polyread/settings.json)
    #[arg(long, global = true, env = "POLYREAD_CONFIG")]
    pub config: Option<PathBuf>,

    /// JSON voice catalog (defaults to one console voice per language)
    #[arg(long, global = true, env = "POLYREAD_VOICES")]
    pub voices: Option<PathBuf>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
