//! Single-flight playback scheduler.
//!
//! The scheduler is a synchronous state machine. It never awaits anything
//! itself; every transition returns at most one [`Directive`] for the caller
//! (normally the [`driver`](crate::driver)) to carry out:
//!
//! ```text
//!   Idle ──start──▶ Playing ──step──▶ Submit(token i)
//!                     ▲                   │
//!                     │        on_complete / on_error
//!                     │                   ▼
//!                     └─────────── Schedule(pause) ──▶ … ──exhausted──▶ Idle
//! ```
//!
//! Every run carries a [`Generation`]. Callbacks and scheduled steps from an
//! older generation are ignored, so a cancelled utterance that still reports
//! completion cannot advance a newer run.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use polyread_core::{
    AnnotatedToken, PlaybackEvent, PlaybackStatus, VoiceCatalog, VoiceSelection, clamp_speed,
};

use crate::engine::SpeechRequest;
use crate::error::VoiceError;

// ── Generation ─────────────────────────────────────────────────────

/// Monotonic run identifier.
///
/// Bumped when a run starts and when a run is interrupted. A run that simply
/// reaches its last token keeps its generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ── Pacing ─────────────────────────────────────────────────────────

/// Pauses inserted between words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingConfig {
    /// After a word finished speaking.
    pub after_complete: Duration,
    /// After the engine reported an error for a word.
    pub after_error: Duration,
    /// After a word was skipped because its language has no voice.
    pub after_skip: Duration,
}

impl PacingConfig {
    /// No pauses at all (useful in tests).
    #[must_use]
    pub const fn immediate() -> Self {
        Self {
            after_complete: Duration::ZERO,
            after_error: Duration::ZERO,
            after_skip: Duration::ZERO,
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            after_complete: Duration::from_millis(100),
            after_error: Duration::from_millis(50),
            after_skip: Duration::from_millis(50),
        }
    }
}

// ── Directives ─────────────────────────────────────────────────────

/// Side effect requested by a scheduler transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// Hand `request` to the speech engine and report the outcome through
    /// [`PlaybackScheduler::on_complete`] or [`PlaybackScheduler::on_error`].
    Submit {
        generation: Generation,
        index: usize,
        request: SpeechRequest,
    },

    /// Call [`PlaybackScheduler::step`] after `delay`.
    Schedule {
        generation: Generation,
        delay: Duration,
    },

    /// Cancel whatever the engine is speaking.
    CancelAll,
}

// ── Snapshot ───────────────────────────────────────────────────────

/// Point-in-time view of the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlaybackSnapshot {
    pub status: PlaybackStatus,
    pub generation: Generation,
    /// Index of the token being handled, `None` while idle.
    pub current_index: Option<usize>,
    /// The token at `current_index`.
    pub current: Option<AnnotatedToken>,
    /// Number of tokens in the current run (0 while idle).
    pub total: usize,
}

// ── Scheduler ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// A step is scheduled (or about to run) for `index`.
    Waiting,
    /// A request for the current token is with the engine.
    Speaking,
}

/// Inputs frozen for the duration of one run.
struct Run {
    tokens: Arc<[AnnotatedToken]>,
    selection: VoiceSelection,
    rate: f32,
    index: usize,
    phase: Phase,
}

/// Speaks annotated tokens one at a time, at most one request in flight.
pub struct PlaybackScheduler {
    generation: Generation,
    run: Option<Run>,
    catalog: Arc<dyn VoiceCatalog>,
    pacing: PacingConfig,
    event_tx: mpsc::UnboundedSender<PlaybackEvent>,
}

impl PlaybackScheduler {
    /// Create an idle scheduler.
    ///
    /// Returns the scheduler and a receiver for [`PlaybackEvent`]s.
    pub fn new(
        catalog: Arc<dyn VoiceCatalog>,
        pacing: PacingConfig,
    ) -> (Self, mpsc::UnboundedReceiver<PlaybackEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            generation: Generation::default(),
            run: None,
            catalog,
            pacing,
            event_tx,
        };
        (scheduler, event_rx)
    }

    #[must_use]
    pub const fn status(&self) -> PlaybackStatus {
        if self.run.is_some() {
            PlaybackStatus::Playing
        } else {
            PlaybackStatus::Idle
        }
    }

    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.run.as_ref().map(|run| run.index)
    }

    #[must_use]
    pub const fn pacing(&self) -> PacingConfig {
        self.pacing
    }

    #[must_use]
    pub fn snapshot(&self) -> PlaybackSnapshot {
        match &self.run {
            Some(run) => PlaybackSnapshot {
                status: PlaybackStatus::Playing,
                generation: self.generation,
                current_index: Some(run.index),
                current: run.tokens.get(run.index).cloned(),
                total: run.tokens.len(),
            },
            None => PlaybackSnapshot {
                generation: self.generation,
                ..PlaybackSnapshot::default()
            },
        }
    }

    // ── Lifecycle ──────────────────────────────────────────────────

    /// Start reading `tokens`, or stop if a run is already in progress.
    ///
    /// The voice selection and rate are captured for the whole run; later
    /// changes apply to the next run. An empty token list is a no-op.
    pub fn start(
        &mut self,
        tokens: impl Into<Arc<[AnnotatedToken]>>,
        selection: VoiceSelection,
        speed: f32,
    ) -> Option<Directive> {
        if self.run.is_some() {
            tracing::debug!(generation = %self.generation, "Start while playing, stopping");
            return self.stop();
        }

        let tokens = tokens.into();
        if tokens.is_empty() {
            tracing::debug!("Nothing to read");
            return None;
        }

        self.generation = self.generation.next();
        let rate = clamp_speed(speed);
        tracing::info!(
            generation = %self.generation,
            tokens = tokens.len(),
            rate,
            "Playback started"
        );
        self.run = Some(Run {
            tokens,
            selection,
            rate,
            index: 0,
            phase: Phase::Waiting,
        });
        self.emit(PlaybackEvent::status(PlaybackStatus::Playing));
        self.step(self.generation)
    }

    /// Stop the current run. Stopping while idle does nothing.
    pub fn stop(&mut self) -> Option<Directive> {
        let run = self.run.take()?;
        self.generation = self.generation.next();
        tracing::info!(
            generation = %self.generation,
            at = run.index,
            total = run.tokens.len(),
            "Playback stopped"
        );
        self.emit(PlaybackEvent::status(PlaybackStatus::Idle));
        Some(Directive::CancelAll)
    }

    // ── Transitions ────────────────────────────────────────────────

    /// Handle the token at the current index.
    ///
    /// Emits `Highlight` and `Progress` and returns a [`Directive::Submit`],
    /// or skips ahead silently when no voice resolves.
    pub fn step(&mut self, generation: Generation) -> Option<Directive> {
        if !self.accepts(generation, Phase::Waiting) {
            tracing::trace!(%generation, "Ignoring stale step");
            return None;
        }
        let run = self.run.as_mut()?;
        let index = run.index;
        let total = run.tokens.len();
        let token = run.tokens.get(index)?.clone();
        let voice = run.selection.resolve(token.language, self.catalog.as_ref());
        let rate = run.rate;

        match voice {
            Some(voice) => {
                if let Some(run) = self.run.as_mut() {
                    run.phase = Phase::Speaking;
                }
                tracing::debug!(index, language = %token.language, word = %token.text(), "Next word");
                self.emit(PlaybackEvent::highlight(index));
                self.emit(PlaybackEvent::progress(index, total));
                Some(Directive::Submit {
                    generation,
                    index,
                    request: SpeechRequest::new(token.token.text, voice, rate),
                })
            }
            None => {
                tracing::debug!(
                    index,
                    language = %token.language,
                    word = %token.text(),
                    "No voice for language, skipping word"
                );
                let delay = self.pacing.after_skip;
                self.advance(delay)
            }
        }
    }

    /// The engine finished the in-flight request.
    pub fn on_complete(&mut self, generation: Generation) -> Option<Directive> {
        if !self.accepts(generation, Phase::Speaking) {
            tracing::trace!(%generation, "Ignoring stale completion");
            return None;
        }
        let delay = self.pacing.after_complete;
        self.advance(delay)
    }

    /// The engine failed the in-flight request. Errors never end a run.
    pub fn on_error(&mut self, generation: Generation, error: &VoiceError) -> Option<Directive> {
        if !self.accepts(generation, Phase::Speaking) {
            tracing::trace!(%generation, "Ignoring stale error");
            return None;
        }
        tracing::warn!(index = ?self.current_index(), %error, "Speech failed, continuing");
        let delay = self.pacing.after_error;
        self.advance(delay)
    }

    // ── Internal helpers ───────────────────────────────────────────

    fn accepts(&self, generation: Generation, phase: Phase) -> bool {
        generation == self.generation
            && self.run.as_ref().is_some_and(|run| run.phase == phase)
    }

    /// Move past the current token, finishing the run when none remain.
    fn advance(&mut self, delay: Duration) -> Option<Directive> {
        let run = self.run.as_mut()?;
        run.index += 1;
        run.phase = Phase::Waiting;

        if run.index >= run.tokens.len() {
            tracing::info!(generation = %self.generation, "Playback finished");
            self.run = None;
            self.emit(PlaybackEvent::status(PlaybackStatus::Idle));
            return None;
        }

        Some(Directive::Schedule {
            generation: self.generation,
            delay,
        })
    }

    fn emit(&self, event: PlaybackEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::warn!("Playback event receiver dropped");
        }
    }
}

impl fmt::Debug for PlaybackScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackScheduler")
            .field("generation", &self.generation)
            .field("status", &self.status())
            .field("current_index", &self.current_index())
            .field("pacing", &self.pacing)
            .finish_non_exhaustive()
    }
}
