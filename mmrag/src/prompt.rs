//! Context-block and prompt assembly.

use crate::document::RetrievedResult;

/// The default grounding instruction placed at the top of every prompt.
pub const DEFAULT_INSTRUCTION: &str =
    "You are a multimodal RAG assistant.\nUse ONLY the given context to answer.";

/// Join retrieved results into a context block.
///
/// Each result becomes `[<MODALITY>] <chunk>`; entries keep retrieval order
/// and are separated by a blank line. No results gives an empty string.
///
/// ```
/// use mmrag::{Modality, RetrievedResult, build_context};
///
/// let results = vec![
///     RetrievedResult {
///         source: "docA".into(),
///         chunk: "hello".into(),
///         modality: Modality::Text,
///         score: 0.9,
///     },
///     RetrievedResult {
///         source: "docB".into(),
///         chunk: "world".into(),
///         modality: Modality::Image,
///         score: 0.8,
///     },
/// ];
/// assert_eq!(build_context(&results), "[TEXT] hello\n\n[IMAGE] world");
/// ```
pub fn build_context(results: &[RetrievedResult]) -> String {
    results.iter().map(|r| format!("[{}] {}", r.modality, r.chunk)).collect::<Vec<_>>().join("\n\n")
}

/// The fixed prompt layout: instruction, then context, then the question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    instruction: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self { instruction: DEFAULT_INSTRUCTION.to_string() }
    }
}

impl PromptTemplate {
    /// Create the default template.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the grounding instruction.
    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }

    /// The grounding instruction.
    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// Render the prompt for a context block and a verbatim query.
    pub fn render(&self, context: &str, query: &str) -> String {
        format!(
            "{instruction}\n\nContext:\n{context}\n\nQuestion:\n{query}\n\nAnswer:\n",
            instruction = self.instruction
        )
    }
}
