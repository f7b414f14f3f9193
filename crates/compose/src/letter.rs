use anyhow::{Context, Result};
use std::sync::Arc;

use extract::CompletionService;

use crate::backfill::{PLACEHOLDER_DEMAND, PLACEHOLDER_NIP, PLACEHOLDER_PROTOCOL};

const SYSTEM_PROMPT: &str = "Você é um advogado especialista em regulação da ANS.";

/// Warm enough for natural legal prose while staying close to the
/// template.
const LETTER_TEMPERATURE: f32 = 0.3;

/// Generates the response letter from the case summary and the filtered
/// regulation texts. The output still carries the literal placeholder
/// tokens for the case identifiers; back-filling happens afterwards.
pub struct LetterComposer {
    llm: Arc<dyn CompletionService>,
}

impl LetterComposer {
    pub fn new(llm: Arc<dyn CompletionService>) -> Self {
        Self { llm }
    }

    pub async fn compose(&self, summary: &str, regulations: &[String]) -> Result<String> {
        let user = build_letter_prompt(summary, &regulations.join("\n\n"));

        let letter = self
            .llm
            .complete(SYSTEM_PROMPT, &user, LETTER_TEMPERATURE)
            .await
            .context("Failed to compose response letter")?;

        Ok(letter.trim().to_string())
    }
}

fn build_letter_prompt(summary: &str, regulations: &str) -> String {
    format!(
        r#"Você é um advogado redigindo uma resposta formal à ANS em nome da operadora. A carta deve seguir o formato jurídico abaixo, com linguagem técnica e respeitosa, e conter as seções nominais em caixa alta. Sempre respeite a decisão da reclamada. Use obrigatoriamente todos os campos extraídos abaixo. Se algum estiver ausente, não mencione. Cite, sempre que possível, o artigo correspondente.

**ESTRUTURA DA CARTA**:
- Data no topo à direita (formato: "São Paulo, 27 de março de 2025.")
- Endereçamento formal à ANS no topo: "AGÊNCIA NACIONAL DE SAÚDE SUPLEMENTAR - ANS
Avenida Augusto Severo, nº 84, 11º andar - Glória
CEP 20021-040 - Rio de Janeiro/RJ"
- Título: "ASSUNTO: RESPOSTA À NOTIFICAÇÃO DE INTERMEDIAÇÃO PRELIMINAR – NIP Nº {nip} – PROTOCOLO Nº {protocolo} – DEMANDA Nº {demanda}"
- Primeiro parágrafo: "A ASSOCIAÇÃO DE SAÚDE DO VALE - LEVMED, pessoa jurídica de direito privado, inscrita no CNPJ sob nº 35.657.268/0001-85, registro ANS nº 422321, com sede à Rua Epitácio Pessoa, nº 651, bairro Centro, na cidade de Jaraguá do Sul/SC, vem informar o que segue."
- Corpo dividido em três seções com títulos em caixa alta:

**I – DA NOTIFICAÇÃO DE INTERMEDIAÇÃO PRELIMINAR**
Descreva brevemente a solicitação da beneficiária, os itens solicitados, argumentos da reclamante e posicionamento inicial da operadora.

**II – DA COBERTURA ASSISTENCIAL**
Explique tecnicamente e juridicamente a negativa, com base nas resoluções mais recentes da ANS (exemplo RN nº 558/2022 ou 465/2021), citando argumentos objetivos, evitando termos vagos.

**III – DO PEDIDO**
Finalização pedindo arquivamento da NIP e reafirmando a conformidade da operadora com as normas regulatórias da ANS.

- Assinatura final genérica:
"ASSOCIAÇÃO DE SAÚDE DO VALE – LEVMED"

Normativas vigentes da ANS para referência:
{regulations}

Informações extraídas:
{summary}
"#,
        nip = PLACEHOLDER_NIP,
        protocolo = PLACEHOLDER_PROTOCOL,
        demanda = PLACEHOLDER_DEMAND,
        regulations = regulations,
        summary = summary,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CapturingLlm;

    #[async_trait::async_trait]
    impl CompletionService for CapturingLlm {
        async fn complete(&self, _system: &str, user: &str, temperature: f32) -> Result<String> {
            assert_eq!(temperature, LETTER_TEMPERATURE);
            assert!(user.contains(PLACEHOLDER_NIP));
            assert!(user.contains(PLACEHOLDER_PROTOCOL));
            assert!(user.contains(PLACEHOLDER_DEMAND));
            assert!(user.contains("RN 465/2021 texto da norma"));
            assert!(user.contains("resumo do caso"));
            Ok(format!(
                "ASSUNTO: NIP Nº {} – PROTOCOLO Nº {}",
                PLACEHOLDER_NIP, PLACEHOLDER_PROTOCOL
            ))
        }
    }

    #[tokio::test]
    async fn letter_prompt_embeds_summary_regulations_and_placeholders() {
        let composer = LetterComposer::new(Arc::new(CapturingLlm));
        let letter = composer
            .compose(
                "resumo do caso",
                &["RN 465/2021 texto da norma".to_string()],
            )
            .await
            .unwrap();

        assert!(letter.contains(PLACEHOLDER_NIP));
    }
}
