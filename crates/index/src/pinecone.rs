use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// One operation: nearest-neighbour query over the regulation index,
/// returning the stored text payload of each match. Implementations
/// apply the mandatory in-force restriction themselves; callers never
/// see regulations that are no longer valid law.
#[async_trait::async_trait]
pub trait VectorIndex: Send + Sync {
    async fn query(&self, vector: Vec<f32>, top_k: usize) -> Result<Vec<String>>;
}

/// Pinecone index of ANS regulation texts. Entries carry a `texto`
/// payload and a `vigente` flag marking them as currently in force.
pub struct PineconeIndex {
    host: String,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Deserialize)]
struct QueryMatch {
    #[serde(default)]
    metadata: Option<MatchMetadata>,
}

#[derive(Deserialize)]
struct MatchMetadata {
    #[serde(default)]
    texto: Option<String>,
}

impl PineconeIndex {
    pub fn new(host: String, api_key: String) -> Self {
        Self {
            host,
            api_key,
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }
}

#[async_trait::async_trait]
impl VectorIndex for PineconeIndex {
    async fn query(&self, vector: Vec<f32>, top_k: usize) -> Result<Vec<String>> {
        let url = format!("{}/query", self.host);

        let body = json!({
            "vector": vector,
            "topK": top_k,
            "includeMetadata": true,
            "filter": { "vigente": { "$eq": "sim" } },
        });

        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&body)
            .send()
            .await
            .context("Failed to send query to regulation index")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Regulation index query failed: {} {}", status, body);
        }

        let parsed: QueryResponse = response
            .json()
            .await
            .context("Failed to parse regulation index response")?;

        // Ranking order comes from the index; matches without a text
        // payload cannot be cited and are dropped.
        let texts = parsed
            .matches
            .into_iter()
            .filter_map(|m| m.metadata.and_then(|meta| meta.texto))
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        Ok(texts)
    }
}
