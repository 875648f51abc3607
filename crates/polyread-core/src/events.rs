//! Events emitted by the playback scheduler to the UI boundary.
//!
//! The UI never holds its own copy of playback state; it renders from these
//! events alone.
//!
//! # Wire Format
//!
//! Events are serialized with a `type` tag:
//!
//! ```json
//! { "type": "highlight", "index": 3 }
//! { "type": "progress", "current": 3, "total": 10 }
//! ```

use serde::{Deserialize, Serialize};

/// Whether a reading run is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackStatus {
    /// No run in progress.
    #[default]
    Idle,
    /// Speaking tokens one at a time.
    Playing,
}

impl PlaybackStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Playing => "playing",
        }
    }
}

/// Playback notifications for display layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlaybackEvent {
    /// The token at `index` is now being spoken.
    Highlight {
        /// Token index in reading order.
        index: usize,
    },

    /// The scheduler changed status.
    Status {
        /// New status.
        status: PlaybackStatus,
    },

    /// Position within the current run (zero-based `current`).
    Progress {
        /// Index of the token being handled.
        current: usize,
        /// Number of tokens in the run.
        total: usize,
    },
}

impl PlaybackEvent {
    #[must_use]
    pub const fn highlight(index: usize) -> Self {
        Self::Highlight { index }
    }

    #[must_use]
    pub const fn status(status: PlaybackStatus) -> Self {
        Self::Status { status }
    }

    #[must_use]
    pub const fn progress(current: usize, total: usize) -> Self {
        Self::Progress { current, total }
    }
}
