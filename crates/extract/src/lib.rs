pub mod fields;
pub mod llm;
pub mod prompt;

pub use fields::{CaseFields, NOT_INFORMED, is_informed};
pub use llm::{CompletionService, OpenAiChat};

use anyhow::{Context, Result};
use std::sync::Arc;

/// Sends one document's text through the fixed extraction prompt and
/// keeps the model's free-text answer as-is. Deterministic decoding so
/// reruns over the same dossier stay stable.
pub struct FieldExtractor {
    llm: Arc<dyn CompletionService>,
}

impl FieldExtractor {
    pub fn new(llm: Arc<dyn CompletionService>) -> Self {
        Self { llm }
    }

    pub async fn extract(&self, source: &str, text: &str) -> Result<CaseFields> {
        let user = prompt::build_field_extraction_prompt(text);

        let raw = self
            .llm
            .complete(prompt::SYSTEM_REGULATORY_EXPERT, &user, 0.0)
            .await
            .context(format!("Field extraction failed for {source}"))?;

        Ok(CaseFields::new(source, raw.trim()))
    }
}
