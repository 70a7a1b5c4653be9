//! Delegates move choice and evaluation to an external USI engine.
//!
//! [`MoveOrchestrator`] is the entry point. Move requests try the engine
//! configured in [`BridgeConfig`] and fall back to the local alpha-beta
//! search on any failure. Evaluation requests only ever use the engine and
//! report [`Evaluation::Unavailable`] when it cannot answer.

pub mod config;
pub mod engine;
pub mod orchestrator;
pub mod request;

pub use config::{BridgeConfig, ConfigError};
pub use engine::{evaluate_movetime, select_movetime, BridgeError, BridgeFailure, EngineBridge};
pub use orchestrator::MoveOrchestrator;
pub use request::{AiRequest, AiResponse, Evaluation, Mode};
