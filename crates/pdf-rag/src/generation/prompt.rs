//! Prompt template for document question answering

/// Prompt builder for retrieval-augmented questions
pub struct PromptBuilder;

impl PromptBuilder {
    /// Join chunk texts in the given order, separated by blank lines
    pub fn build_context<S: AsRef<str>>(chunks: &[S]) -> String {
        chunks
            .iter()
            .map(|c| c.as_ref())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Build the question-answering prompt around an assembled context
    pub fn build_qa_prompt(question: &str, context: &str) -> String {
        format!(
            r#"Use the following document content to answer the question:

{context}

Question: {question}
Answer:"#,
            context = context,
            question = question
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_keeps_order() {
        assert_eq!(
            PromptBuilder::build_context(&["first", "second", "third"]),
            "first\n\nsecond\n\nthird"
        );
    }

    #[test]
    fn test_qa_prompt_layout() {
        let prompt = PromptBuilder::build_qa_prompt("Who wrote it?", "Alice wrote it.");
        assert_eq!(
            prompt,
            "Use the following document content to answer the question:\n\n\
             Alice wrote it.\n\n\
             Question: Who wrote it?\n\
             Answer:"
        );
    }
}
