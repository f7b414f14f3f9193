use anyhow::Result;

const DEFAULT_CHAT_MODEL: &str = "gpt-4";
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-large";

/// Process-wide configuration, loaded once before any document I/O.
/// Missing required settings abort the run with every absent name in
/// the message.
#[derive(Debug, Clone)]
pub struct Settings {
    pub openai_api_key: String,
    pub pinecone_api_key: String,
    pub pinecone_environment: String,
    pub pinecone_index_name: String,
    /// Direct index host override; serverless index hosts cannot be
    /// derived from environment + name alone.
    pub pinecone_host: Option<String>,
    pub chat_model: String,
    pub embedding_model: String,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut missing = Vec::new();

        let mut required = |name: &'static str| -> String {
            match get(name).filter(|v| !v.trim().is_empty()) {
                Some(value) => value,
                None => {
                    missing.push(name);
                    String::new()
                }
            }
        };

        let openai_api_key = required("OPENAI_API_KEY");
        let pinecone_api_key = required("PINECONE_API_KEY");
        let pinecone_environment = required("PINECONE_ENVIRONMENT");
        let pinecone_index_name = required("PINECONE_INDEX_NAME");

        if !missing.is_empty() {
            anyhow::bail!("Missing required settings: {}", missing.join(", "));
        }

        Ok(Self {
            openai_api_key,
            pinecone_api_key,
            pinecone_environment,
            pinecone_index_name,
            pinecone_host: get("PINECONE_HOST").filter(|v| !v.trim().is_empty()),
            chat_model: get("OPENAI_CHAT_MODEL").unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            embedding_model: get("OPENAI_EMBEDDING_MODEL")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
        })
    }

    pub fn pinecone_host(&self) -> String {
        match &self.pinecone_host {
            Some(host) => host.clone(),
            None => format!(
                "https://{}.svc.{}.pinecone.io",
                self.pinecone_index_name, self.pinecone_environment
            ),
        }
    }
}
