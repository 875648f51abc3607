#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

pub mod classifier;
pub mod events;
pub mod language;
pub mod paths;
pub mod settings;
pub mod tokenizer;
pub mod voice;

// Re-export commonly used types for convenience
pub use classifier::{AnnotatedToken, MIN_SUBSTRING_CHARS, analyze, annotate, classify, normalize};
pub use events::{PlaybackEvent, PlaybackStatus};
pub use language::{ActiveLanguages, LanguageCode, LanguageError, LanguageProfile};
pub use paths::{PathError, config_root, default_settings_path};
pub use settings::{
    DEFAULT_SPEED, MAX_SPEED, MIN_SPEED, ReaderSettings, SettingsError, SettingsUpdate,
    clamp_speed, load_settings, load_settings_or_default, validate_settings,
};
pub use tokenizer::{Token, tokenize};
pub use voice::{Voice, VoiceCatalog, VoiceDirectory, VoiceHandle, VoiceSelection};
