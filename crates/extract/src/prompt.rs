/// System role shared by the extraction call.
pub const SYSTEM_REGULATORY_EXPERT: &str =
    "Você é um especialista jurídico em regulação da ANS.";

pub fn build_field_extraction_prompt(text: &str) -> String {
    format!(
        r#"Você é um advogado especialista em regulação da ANS. Extraia do texto os seguintes itens de forma estruturada:
- Número da NIP
- Protocolo
- Número da demanda
- Nome da parte reclamante
- Nome da operadora
- Argumento da reclamante
- Decisão da operadora
- Justificativa da decisão da operadora

Texto:
{}
"#,
        text
    )
}
