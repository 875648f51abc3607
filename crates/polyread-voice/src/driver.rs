//! Async driver for the [`PlaybackScheduler`].
//!
//! The scheduler is synchronous; this module owns it inside a single tokio
//! task and turns its [`Directive`]s into real work: speech requests on the
//! engine, timers for the pauses between words, and cancellation.
//!
//! Every input (user commands, engine outcomes, timer expiry) arrives on a
//! channel and is applied by that one task, so scheduler state is never
//! touched concurrently.
//!
//! The public [`PlaybackHandle`] is the cheap, cloneable proxy the rest of
//! the application holds.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use polyread_core::{AnnotatedToken, VoiceSelection};

use crate::engine::SpeechEngine;
use crate::error::VoiceError;
use crate::scheduler::{Directive, Generation, PlaybackScheduler, PlaybackSnapshot};

// ── Commands ───────────────────────────────────────────────────────

/// A command sent from a handle to the driver task.
enum Command {
    /// Start a run, or stop the current one.
    Start {
        tokens: Arc<[AnnotatedToken]>,
        selection: VoiceSelection,
        speed: f32,
    },

    /// Stop the current run.
    Stop,

    /// Report the scheduler state.
    Snapshot { reply: oneshot::Sender<PlaybackSnapshot> },

    /// Stop and exit the driver task.
    Shutdown,
}

/// Work completed on behalf of the driver.
enum Feedback {
    /// A scheduled pause elapsed.
    Step(Generation),

    /// The engine resolved a request.
    Outcome {
        generation: Generation,
        result: Result<(), VoiceError>,
    },
}

// ── Handle ─────────────────────────────────────────────────────────

/// Cloneable handle to a running playback driver.
///
/// All methods are non-blocking apart from [`snapshot`](Self::snapshot),
/// which waits for the driver to answer.
#[derive(Debug, Clone)]
pub struct PlaybackHandle {
    cmd_tx: mpsc::UnboundedSender<Command>,
}

impl PlaybackHandle {
    /// Start reading `tokens`. If a run is in progress this stops it instead.
    pub fn start(
        &self,
        tokens: impl Into<Arc<[AnnotatedToken]>>,
        selection: VoiceSelection,
        speed: f32,
    ) -> Result<(), VoiceError> {
        self.send(Command::Start {
            tokens: tokens.into(),
            selection,
            speed,
        })
    }

    /// Stop the current run.
    pub fn stop(&self) -> Result<(), VoiceError> {
        self.send(Command::Stop)
    }

    /// Current scheduler state.
    pub async fn snapshot(&self) -> Result<PlaybackSnapshot, VoiceError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Snapshot { reply })?;
        rx.await.map_err(|_| VoiceError::DriverStopped)
    }

    /// Stop playback and end the driver task.
    pub fn shutdown(&self) -> Result<(), VoiceError> {
        self.send(Command::Shutdown)
    }

    /// Whether the driver task is still accepting commands.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.cmd_tx.is_closed()
    }

    fn send(&self, command: Command) -> Result<(), VoiceError> {
        self.cmd_tx
            .send(command)
            .map_err(|_| VoiceError::DriverStopped)
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Start { tokens, speed, .. } => f
                .debug_struct("Start")
                .field("tokens", &tokens.len())
                .field("speed", speed)
                .finish_non_exhaustive(),
            Self::Stop => f.write_str("Stop"),
            Self::Snapshot { .. } => f.write_str("Snapshot"),
            Self::Shutdown => f.write_str("Shutdown"),
        }
    }
}

// ── Driver task ────────────────────────────────────────────────────

/// Owns a scheduler and a speech engine for the lifetime of one task.
pub struct PlaybackDriver {
    scheduler: PlaybackScheduler,
    engine: Arc<dyn SpeechEngine>,
    cmd_rx: mpsc::UnboundedReceiver<Command>,
    feedback_tx: mpsc::UnboundedSender<Feedback>,
    feedback_rx: mpsc::UnboundedReceiver<Feedback>,
}

impl PlaybackDriver {
    /// Spawn the driver on the current tokio runtime.
    ///
    /// The task runs until [`PlaybackHandle::shutdown`] is called or every
    /// handle has been dropped.
    pub fn spawn(
        scheduler: PlaybackScheduler,
        engine: Arc<dyn SpeechEngine>,
    ) -> (PlaybackHandle, JoinHandle<()>) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (feedback_tx, feedback_rx) = mpsc::unbounded_channel();
        let driver = Self {
            scheduler,
            engine,
            cmd_rx,
            feedback_tx,
            feedback_rx,
        };
        let task = tokio::spawn(driver.run());
        (PlaybackHandle { cmd_tx }, task)
    }

    async fn run(mut self) {
        tracing::debug!("Playback driver started");
        loop {
            tokio::select! {
                command = self.cmd_rx.recv() => {
                    match command {
                        Some(Command::Shutdown) | None => break,
                        Some(command) => self.handle_command(command),
                    }
                }
                Some(feedback) = self.feedback_rx.recv() => {
                    self.handle_feedback(feedback);
                }
            }
        }

        let directive = self.scheduler.stop();
        self.execute(directive);
        tracing::debug!("Playback driver stopped");
    }

    fn handle_command(&mut self, command: Command) {
        tracing::trace!(?command, "Playback command");
        let directive = match command {
            Command::Start {
                tokens,
                selection,
                speed,
            } => self.scheduler.start(tokens, selection, speed),
            Command::Stop => self.scheduler.stop(),
            Command::Snapshot { reply } => {
                // The caller may have given up waiting.
                let _ = reply.send(self.scheduler.snapshot());
                None
            }
            Command::Shutdown => None,
        };
        self.execute(directive);
    }

    fn handle_feedback(&mut self, feedback: Feedback) {
        let directive = match feedback {
            Feedback::Step(generation) => self.scheduler.step(generation),
            Feedback::Outcome {
                generation,
                result: Ok(()),
            } => self.scheduler.on_complete(generation),
            Feedback::Outcome {
                generation,
                result: Err(error),
            } => self.scheduler.on_error(generation, &error),
        };
        self.execute(directive);
    }

    fn execute(&self, directive: Option<Directive>) {
        let Some(directive) = directive else {
            return;
        };
        match directive {
            Directive::Submit {
                generation,
                index,
                request,
            } => {
                tracing::debug!(%generation, index, word = %request.text, voice = %request.voice.id, "Speaking");
                let engine = Arc::clone(&self.engine);
                let feedback_tx = self.feedback_tx.clone();
                tokio::spawn(async move {
                    let result = engine.speak(&request).await;
                    // The driver may already be gone.
                    let _ = feedback_tx.send(Feedback::Outcome { generation, result });
                });
            }
            Directive::Schedule { generation, delay } => {
                let feedback_tx = self.feedback_tx.clone();
                tokio::spawn(async move {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    let _ = feedback_tx.send(Feedback::Step(generation));
                });
            }
            Directive::CancelAll => self.engine.cancel_all(),
        }
    }
}
