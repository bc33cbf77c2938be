//! # Redacta Core Library
//!
//! Core business logic for Redacta, a study companion for the ENEM
//! essay exam. The CLI binary is a thin shell over this library;
//! presentation concerns live entirely outside it.
//!
//! ## Architecture
//!
//! - **Progression Engine**: pure state transformations for experience,
//!   levels and the simulated ability score
//! - **AI Gateway**: one-shot structured-output calls and SSE chat
//!   streaming against the external generative-model service
//! - **Chat Orchestrator**: three independent transcripts with an
//!   `Idle -> Sending -> Streaming -> Idle` state machine per session
//! - **Storage**: SQLite-backed key-value mirror of the application
//!   state plus TOML-based configuration
//!
//! ## Key Components
//!
//! - [`App`]: root application state with an injected persistence port
//! - [`UserStats`]: progression state and its `apply_*` transitions
//! - [`TutorGateway`]: gateway trait (real client: [`GeminiClient`])
//! - [`ChatOrchestrator`]: streaming chat session driver
//! - [`StateStore`]: typed write-through wrapper over the key-value port

pub mod app;
pub mod chat;
pub mod error;
pub mod gateway;
pub mod model;
pub mod progression;
pub mod storage;

pub use app::{App, LaunchScreen};
pub use chat::{ChatHistories, ChatMessage, ChatMode, ChatOrchestrator, ChatRole, SendOutcome};
pub use error::{ConfigError, CoreError, GatewayError, Result, StorageError, ValidationError};
pub use gateway::{ChatStream, GeminiClient, TutorGateway};
pub use model::{
    Difficulty, EssayCorrection, ProbableTheme, SavedCorrection, SimulationQuestion, ThemeSource,
};
pub use progression::{SubjectAccuracy, SubjectStat, UserStats};
pub use storage::{Config, Database, KvStore, MemoryStore, StateStore};
