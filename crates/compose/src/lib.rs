pub mod backfill;
pub mod letter;
pub mod relevance;
pub mod summarizer;

pub use backfill::{
    CaseIdentifiers, MISSING_VALUE, PLACEHOLDER_DEMAND, PLACEHOLDER_NIP, PLACEHOLDER_PROTOCOL,
    fill_letter, find_identifiers,
};
pub use letter::LetterComposer;
pub use relevance::{RelevanceConfig, RelevanceFilter};
pub use summarizer::SummarySynthesizer;
