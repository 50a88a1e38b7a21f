//! Text-generation client seam.

use async_trait::async_trait;
use miette::Diagnostic;
use thiserror::Error;

/// A text-generation service invoked with a system/user prompt pair.
///
/// Implementations own transport concerns (endpoints, authentication,
/// transport-level retries, temperature). The engine wraps every call in
/// error handling that converts a raised error into a status event plus an
/// unset output field; a failing model never crashes a run.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Send one prompt pair and return the raw response text.
    async fn invoke(&self, system_prompt: &str, user_prompt: &str) -> Result<String, ModelError>;
}

/// Errors surfaced by a model invocation.
#[derive(Debug, Error, Diagnostic)]
pub enum ModelError {
    /// Transport or service-side failure.
    #[error("model transport error: {message}")]
    #[diagnostic(code(uiforge::model::transport))]
    Transport { message: String },

    /// The call exceeded the client's deadline.
    #[error("model call timed out after {seconds}s")]
    #[diagnostic(code(uiforge::model::timeout))]
    Timeout { seconds: u64 },

    /// The service answered with no usable text.
    #[error("model returned an empty response")]
    #[diagnostic(code(uiforge::model::empty_response))]
    EmptyResponse,
}
