//! AI gateway: thin adapter over the external generative-model service.
//!
//! Each operation issues exactly one outbound call with a declared
//! structured-output schema and decodes the result into the matching
//! domain type. No retries; failures surface as [`GatewayError`] and the
//! caller's state is left untouched.
//!
//! The [`TutorGateway`] trait is the seam: the chat orchestrator and the
//! app layer only ever see the trait, so tests substitute a fake.

mod gemini;
mod prompts;

pub use gemini::GeminiClient;

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::chat::{ChatMessage, ChatMode};
use crate::error::GatewayError;
use crate::model::{EssayCorrection, ProbableTheme, SimulationQuestion};

/// Finite, non-restartable sequence of incremental text fragments from
/// one streaming reply.
pub type ChatStream = Pin<Box<dyn Stream<Item = Result<String, GatewayError>> + Send>>;

#[async_trait]
pub trait TutorGateway: Send + Sync {
    /// Evaluate an essay. The rigor flag selects a stricter grader
    /// persona in the prompt.
    async fn correct_essay(
        &self,
        essay: &str,
        rigorous: bool,
    ) -> Result<EssayCorrection, GatewayError>;

    /// Generate a batch of multiple-choice questions for the given
    /// subjects, with a balanced difficulty distribution.
    async fn generate_simulation(
        &self,
        count: u32,
        subjects: &[String],
    ) -> Result<Vec<SimulationQuestion>, GatewayError>;

    /// Discover probable exam themes from roughly the last six months
    /// of events, with source citations where available.
    async fn probable_themes(&self) -> Result<Vec<ProbableTheme>, GatewayError>;

    /// Open a streaming reply for one chat turn. `history` is the
    /// session transcript before `message`.
    async fn stream_chat(
        &self,
        mode: ChatMode,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<ChatStream, GatewayError>;
}
