//! CLI-specific error types and mappings.
//!
//! This module provides the error type for the CLI adapter and mappings
//! from domain errors to exit codes and user-facing messages.

use polyread_core::{LanguageError, PathError, SettingsError};
use polyread_voice::VoiceError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Argument parsing error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Playback could not be driven.
    #[error("Playback error: {0}")]
    Playback(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Arguments(_) => 2, // EX_USAGE
            Self::Io(_) => 74,       // EX_IOERR
            Self::Config(_) => 78,   // EX_CONFIG
            Self::Playback(_) => 70, // EX_SOFTWARE
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        match err {
            SettingsError::Read { .. } => Self::Io(err.to_string()),
            _ => Self::Config(err.to_string()),
        }
    }
}

impl From<LanguageError> for CliError {
    fn from(err: LanguageError) -> Self {
        Self::Arguments(err.to_string())
    }
}

impl From<PathError> for CliError {
    fn from(err: PathError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<VoiceError> for CliError {
    fn from(err: VoiceError) -> Self {
        match err {
            VoiceError::UnknownVoice { .. } => Self::Arguments(err.to_string()),
            _ => Self::Playback(err.to_string()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
