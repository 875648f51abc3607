//! Main commands enum and shared argument groups.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use polyread_core::LanguageCode;

use crate::config::VoiceOverride;

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Read text aloud word by word, highlighting each word as it is spoken
    Read {
        #[command(flatten)]
        text: TextArgs,

        /// Speech rate multiplier (0.5–2.0)
        #[arg(short, long)]
        speed: Option<f32>,

        /// Voice for a language, as LANG=VOICE_ID (repeatable)
        #[arg(long, value_name = "LANG=VOICE_ID")]
        voice: Vec<VoiceOverride>,
    },

    /// Print every word with the language it would be spoken in
    Classify {
        #[command(flatten)]
        text: TextArgs,

        /// Output JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List supported languages
    Languages,

    /// List available voices and the default for each active language
    Voices {
        /// Only show voices for this language
        #[arg(short, long)]
        language: Option<LanguageCode>,
    },
}

/// Where the text comes from and which languages to expect.
#[derive(Debug, Clone, Default, Args)]
pub struct TextArgs {
    /// Text to read (defaults to the built-in lesson)
    pub text: Option<String>,

    /// Read the text from a file instead
    #[arg(short, long, conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// Active languages in priority order, e.g. `pt,fr`
    #[arg(short, long, value_delimiter = ',')]
    pub languages: Vec<LanguageCode>,
}
