pub mod ocr;
pub mod pdf;
pub mod reader;

pub use ocr::{NoopOcr, OcrEngine};
pub use pdf::{ExtractedText, PdfTextExtractor};
pub use reader::{CaseDocument, list_case_documents, read_document};

/// Limits applied to the text pulled out of a single document.
pub struct ExtractorConfig {
    /// Documents whose trimmed text exceeds this many characters are truncated.
    pub max_chars: usize,
    /// Number of leading characters kept when a document is truncated.
    pub truncate_to: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_chars: 8000,
            truncate_to: 2000,
        }
    }
}
