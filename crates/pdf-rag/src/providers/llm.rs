//! LLM provider trait for generating answers

use async_trait::async_trait;
use crate::error::Result;

/// Trait for prompt completion
///
/// Implementations:
/// - `OllamaCli`: `ollama run <model>` child process
/// - `OllamaLlm`: Ollama HTTP API
///
/// Failures are reported as `Error::Generation` carrying the collaborator's
/// diagnostic text.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion for the prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
