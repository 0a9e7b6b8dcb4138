//! Query request types

use serde::{Deserialize, Serialize};

/// Question asked against the loaded document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    /// The question to answer
    pub question: String,

    /// Number of chunks to retrieve (default: configured `retrieval.top_k`)
    #[serde(default)]
    pub top_k: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_k_is_optional() {
        let req: AskRequest = serde_json::from_str(r#"{"question": "why?"}"#).unwrap();
        assert_eq!(req.question, "why?");
        assert!(req.top_k.is_none());

        let req: AskRequest =
            serde_json::from_str(r#"{"question": "why?", "top_k": 5}"#).unwrap();
        assert_eq!(req.top_k, Some(5));
    }
}
