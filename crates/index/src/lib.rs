pub mod embeddings;
pub mod pinecone;

pub use embeddings::{EmbeddingService, OpenAiEmbeddings};
pub use pinecone::{PineconeIndex, VectorIndex};

use anyhow::{Context, Result};
use std::sync::Arc;

pub struct RetrievalConfig {
    /// Nearest entries requested from the index per run.
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 5 }
    }
}

/// Embeds the case summary and pulls the closest in-force regulation
/// texts from the vector index. No local re-ranking: candidate order is
/// the index's similarity ranking.
pub struct RegulationRetriever {
    embeddings: Arc<dyn EmbeddingService>,
    index: Arc<dyn VectorIndex>,
    config: RetrievalConfig,
}

impl RegulationRetriever {
    pub fn new(
        embeddings: Arc<dyn EmbeddingService>,
        index: Arc<dyn VectorIndex>,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            embeddings,
            index,
            config,
        }
    }

    pub async fn retrieve(&self, summary: &str) -> Result<Vec<String>> {
        let vector = self
            .embeddings
            .embed(summary)
            .await
            .context("Failed to embed case summary")?;

        let candidates = self
            .index
            .query(vector, self.config.top_k)
            .await
            .context("Failed to query regulation index")?;

        tracing::info!(candidates = candidates.len(), "Retrieved regulation candidates");

        Ok(candidates)
    }
}
