use anyhow::{Context, Result};
use std::sync::Arc;

use extract::{CaseFields, CompletionService};

const SYSTEM_PROMPT: &str = "Você é um especialista em regulação da ANS.";

/// Slightly warmed-up decoding: the summary is prose, fluency matters
/// more than byte-stable output here.
const SUMMARY_TEMPERATURE: f32 = 0.2;

/// Condenses the whole batch of per-document extractions into one
/// technical paragraph covering the complaint and the operator's
/// justification.
pub struct SummarySynthesizer {
    llm: Arc<dyn CompletionService>,
}

impl SummarySynthesizer {
    pub fn new(llm: Arc<dyn CompletionService>) -> Self {
        Self { llm }
    }

    pub async fn summarize(&self, batch: &[CaseFields]) -> Result<String> {
        let payload = batch
            .iter()
            .map(|fields| fields.raw.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let user = build_summary_prompt(&payload);

        let summary = self
            .llm
            .complete(SYSTEM_PROMPT, &user, SUMMARY_TEMPERATURE)
            .await
            .context("Failed to generate case summary")?;

        Ok(summary.trim().to_string())
    }
}

fn build_summary_prompt(payload: &str) -> String {
    format!(
        r#"Você é um advogado regulatório da ANS. Resuma as informações abaixo em um parágrafo técnico claro, que represente o contexto da reclamação e a justificativa da operadora. Seja objetivo e inclua os principais pontos jurídicos e de cobertura.

Dados:
{}
"#,
        payload
    )
}
