//! Prompt assembly and answer generation

pub mod composer;
pub mod prompt;

pub use composer::AnswerComposer;
pub use prompt::PromptBuilder;
