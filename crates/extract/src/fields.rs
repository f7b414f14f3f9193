use serde::{Deserialize, Serialize};

/// Phrasings the extraction model uses when a document does not state a
/// value. These never qualify as real identifiers.
pub const NOT_INFORMED: &[&str] = &[
    "Não mencionado no texto",
    "Não fornecido",
    "Não informado",
    "Não disponível no texto",
];

/// Semi-structured key/value lines returned by the extraction model for
/// one document. There is no fixed schema: labels may be missing or
/// spelled differently between documents, so every accessor is
/// tolerant and callers must handle `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseFields {
    /// File name of the document the fields came from.
    pub source: String,
    pub raw: String,
}

impl CaseFields {
    pub fn new(source: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            raw: raw.into(),
        }
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.raw.contains(label)
    }

    /// Value of the first line mentioning `label`: the substring after
    /// the first colon, trimmed. `None` when no such line exists or the
    /// line carries no colon.
    pub fn value_of(&self, label: &str) -> Option<String> {
        self.raw
            .lines()
            .find(|line| line.contains(label))
            .and_then(|line| line.split_once(':'))
            .map(|(_, value)| value.trim().to_string())
    }
}

/// A value counts as informed when it is non-empty and not one of the
/// model's "not stated" phrasings.
pub fn is_informed(value: &str) -> bool {
    !value.is_empty() && !NOT_INFORMED.contains(&value)
}
