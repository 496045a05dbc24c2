//! Turn orchestration
//!
//! One full turn: new clip → transcribe → append user turn → request reply
//! → append assistant turn → render → synthesize. The controller walks the
//! state machine `Idle → Captured → Transcribed → Replied → Rendered → Idle`
//! per processing cycle; `Reset` is reachable from `Idle` only.
//!
//! Failure policy: a transcription failure appends nothing; a chat failure
//! leaves the user turn recorded and nothing else; a synthesis failure still
//! completes the turn with text-only output. Nothing is retried.

use crate::providers::{ChatModel, Respond, Synthesize, Transcribe};
use crate::render;
use crate::session::{Session, Speaker};
use crate::voice::AudioClip;
use crate::Result;

/// Pipeline position within one processing cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    Captured,
    Transcribed,
    Replied,
    Rendered,
    Reset,
}

/// Why a processing cycle produced no turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No clip was offered
    NoCapture,
    /// Clip has zero duration
    EmptyCapture,
    /// Clip id was already accepted in an earlier cycle
    AlreadyProcessed,
    /// This is the one suppressed cycle following a reset
    ResetCycle,
}

/// Result of one processing cycle
#[derive(Debug)]
pub enum TurnOutcome {
    /// Cycle was a no-op
    Skipped(SkipReason),
    /// A full turn was recorded and rendered
    Completed(RenderedTurn),
}

/// Rendered output of a completed turn
#[derive(Debug)]
pub struct RenderedTurn {
    /// What the user said
    pub transcript: String,

    /// What the assistant replied
    pub reply: String,

    /// Full conversation as styled HTML, re-rendered from scratch
    pub transcript_html: String,

    /// Inline autoplay fragment for the reply audio; `None` when synthesis
    /// failed (the reply text is still recorded and rendered)
    pub audio_html: Option<String>,
}

/// Orchestrates turns against a caller-owned [`Session`]
pub struct TurnController {
    transcriber: Box<dyn Transcribe>,
    responder: Box<dyn Respond>,
    synthesizer: Box<dyn Synthesize>,
    model: ChatModel,
    state: TurnState,
    reset_armed: bool,
    last_processed_clip: Option<u64>,
}

impl TurnController {
    /// Create a controller over the three external collaborators
    #[must_use]
    pub fn new(
        transcriber: Box<dyn Transcribe>,
        responder: Box<dyn Respond>,
        synthesizer: Box<dyn Synthesize>,
        model: ChatModel,
    ) -> Self {
        Self {
            transcriber,
            responder,
            synthesizer,
            model,
            state: TurnState::Idle,
            reset_armed: false,
            last_processed_clip: None,
        }
    }

    /// Currently selected chat model
    #[must_use]
    pub const fn model(&self) -> ChatModel {
        self.model
    }

    /// Select a chat model for subsequent turns
    ///
    /// The prompt history is model-agnostic; history built under another
    /// model is resent unchanged.
    pub fn set_model(&mut self, model: ChatModel) {
        tracing::info!(model = %model, "chat model selected");
        self.model = model;
    }

    /// Current pipeline state
    #[must_use]
    pub const fn state(&self) -> TurnState {
        self.state
    }

    /// Clear the session and suppress the next processing cycle
    pub fn reset(&mut self, session: &mut Session) {
        self.state = TurnState::Reset;
        session.clear();
        self.reset_armed = true;
        self.state = TurnState::Idle;
        tracing::info!("session reset");
    }

    /// Run one processing cycle
    ///
    /// Accepts whatever clip is pending (or none) and drives it through the
    /// full pipeline. Idempotent with respect to already-processed clips.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Stt`] or [`crate::Error::Chat`] when the corresponding
    /// external call fails; the session is left in the last consistent
    /// state described in the module docs.
    pub async fn process(
        &mut self,
        session: &mut Session,
        clip: Option<&AudioClip>,
    ) -> Result<TurnOutcome> {
        self.state = TurnState::Idle;

        // One cycle of suppression after reset, regardless of pending input.
        // The watermark is not advanced, so a pending clip is processed
        // normally on the following cycle.
        if self.reset_armed {
            self.reset_armed = false;
            tracing::debug!("cycle suppressed after reset");
            return Ok(TurnOutcome::Skipped(SkipReason::ResetCycle));
        }

        let Some(clip) = clip else {
            return Ok(TurnOutcome::Skipped(SkipReason::NoCapture));
        };

        if clip.is_silent() {
            tracing::debug!(clip = clip.id, "ignoring zero-duration clip");
            return Ok(TurnOutcome::Skipped(SkipReason::EmptyCapture));
        }

        if self.last_processed_clip == Some(clip.id) {
            tracing::debug!(clip = clip.id, "clip already processed");
            return Ok(TurnOutcome::Skipped(SkipReason::AlreadyProcessed));
        }

        // Accepted: mark processed before any external call so a failed
        // turn is not silently retried on the next cycle
        self.last_processed_clip = Some(clip.id);
        self.state = TurnState::Captured;
        tracing::debug!(clip = clip.id, secs = clip.duration.as_secs_f64(), "turn started");

        let transcript = match self.transcriber.transcribe(&clip.wav).await {
            Ok(text) => text,
            Err(e) => {
                self.state = TurnState::Idle;
                return Err(e);
            }
        };
        self.state = TurnState::Transcribed;

        session.push(Speaker::User, transcript.clone());

        let reply = match self.responder.respond(session.history(), self.model).await {
            Ok(text) => text,
            Err(e) => {
                // User turn stays recorded; no assistant turn is appended
                self.state = TurnState::Idle;
                return Err(e);
            }
        };
        self.state = TurnState::Replied;

        session.push(Speaker::Assistant, reply.clone());

        let transcript_html = render::render_transcript(session);

        let audio_html = match self.synthesizer.synthesize(&reply).await {
            Ok(mp3) => Some(render::audio_fragment(&mp3)),
            Err(e) => {
                tracing::warn!(error = %e, "synthesis failed, reply is text-only");
                None
            }
        };

        self.state = TurnState::Rendered;
        tracing::info!(clip = clip.id, turns = session.len(), "turn complete");
        self.state = TurnState::Idle;

        Ok(TurnOutcome::Completed(RenderedTurn {
            transcript,
            reply,
            transcript_html,
            audio_html,
        }))
    }
}

impl std::fmt::Debug for TurnController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnController")
            .field("model", &self.model)
            .field("state", &self.state)
            .field("reset_armed", &self.reset_armed)
            .field("last_processed_clip", &self.last_processed_clip)
            .finish_non_exhaustive()
    }
}
