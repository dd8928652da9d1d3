//! Model extraction collaborators.
//!
//! The compiler only consumes a [`ProcessModel`]; where that model comes
//! from is a capability handed to the caller. [`ClaudeExtractor`] asks an
//! Anthropic model, [`HeuristicExtractor`] scans the text locally and is the
//! substitute when no model is reachable.

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

use crate::model::ProcessModel;

mod claude;
mod heuristic;

pub use claude::ClaudeExtractor;
pub use heuristic::HeuristicExtractor;

/// Turns free text into a structured process model.
#[async_trait]
pub trait ModelExtractor: Send + Sync {
    async fn extract(&self, text: &str) -> Result<ProcessModel>;

    /// Provider label for logging and API responses.
    fn provider_name(&self) -> &str;
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("ANTHROPIC_API_KEY environment variable not set")]
    MissingApiKey,
    #[error("Anthropic API error {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("empty response from model")]
    EmptyResponse,
}
