//! Turns retrieved chunks and a question into a grounded answer

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::providers::LlmProvider;
use crate::retrieval::RetrievalStore;

use super::prompt::PromptBuilder;

/// Builds prompts and runs them through the language model
pub struct AnswerComposer {
    llm: Arc<dyn LlmProvider>,
}

impl AnswerComposer {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    pub fn llm(&self) -> &Arc<dyn LlmProvider> {
        &self.llm
    }

    /// Prompt containing every chunk, in order, followed by the question
    pub fn compose<S: AsRef<str>>(&self, question: &str, chunks: &[S]) -> String {
        let context = PromptBuilder::build_context(chunks);
        PromptBuilder::build_qa_prompt(question, &context)
    }

    /// Run `prompt` through the model and trim the completion.
    ///
    /// Any collaborator failure comes back as `Error::Generation` with the
    /// collaborator's diagnostic text.
    pub async fn answer(&self, prompt: &str) -> Result<String> {
        match self.llm.generate(prompt).await {
            Ok(text) => Ok(text.trim().to_string()),
            Err(Error::Generation(diagnostic)) => Err(Error::Generation(diagnostic)),
            Err(other) => Err(Error::Generation(other.to_string())),
        }
    }

    /// Retrieve the `k` nearest chunks for `question` and answer from them
    pub async fn ask(&self, store: &RetrievalStore, question: &str, k: usize) -> Result<String> {
        let retrieved = store.query(question, k).await?;
        tracing::debug!(
            "Answering from {} chunks (nearest distance {:?})",
            retrieved.len(),
            retrieved.first().map(|r| r.distance)
        );

        let texts: Vec<&str> = retrieved.iter().map(|r| r.chunk.content.as_str()).collect();
        let prompt = self.compose(question, &texts);

        tracing::info!("Generating answer with {} ({})", self.llm.model(), self.llm.name());
        self.answer(&prompt).await
    }
}
