use thiserror::Error;

use super::BoxFuture;

#[derive(Debug, Error)]
pub enum ChatCompletionError {
    #[error("chat transport error: {0}")]
    Transport(String),
    #[error("chat upstream error: {0}")]
    Upstream(String),
    #[error("chat response decode error: {0}")]
    InvalidResponse(String),
}

/// One-shot completion against a remote chat endpoint. Returns the raw
/// assistant message content; interpreting it is the caller's problem.
pub trait ChatCompletion: Send + Sync {
    fn complete(&self, prompt: &str) -> BoxFuture<'_, Result<String, ChatCompletionError>>;
}
