use crate::assistant::intent::IntentTag;
use serde::{Deserialize, Serialize};

/// The rendered answer to one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    pub answer: String,
    pub query_type: IntentTag,
    /// Length of the raw id or listing result, regardless of how much was rendered.
    pub items_found: usize,
    /// Remote round-trips made: 1, or 2 when a detail fetch followed the id query.
    pub api_calls: u8,
}

impl QueryResult {
    pub fn new(
        answer: impl Into<String>,
        query_type: IntentTag,
        items_found: usize,
        api_calls: u8,
    ) -> Self {
        Self {
            answer: answer.into(),
            query_type,
            items_found,
            api_calls,
        }
    }
}
