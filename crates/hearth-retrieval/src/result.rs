//! Search result model.

/// Passages and their sources returned by a vector search.
///
/// The two sequences are positionally paired and ordered by descending
/// relevance score.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetrievalResult {
    /// Passage text, most relevant first.
    pub passages: Vec<String>,
    /// Source identifier for the passage at the same position.
    pub sources: Vec<String>,
}

impl RetrievalResult {
    /// Render the passages as a single context block for prompt assembly.
    ///
    /// Returns `None` when the search produced nothing, so callers can skip
    /// the context section entirely.
    pub fn context_block(&self) -> Option<String> {
        if self.passages.is_empty() {
            return None;
        }
        Some(self.passages.join("\n"))
    }
}
