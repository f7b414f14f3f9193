use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use compose::{LetterComposer, RelevanceFilter, SummarySynthesizer, fill_letter, find_identifiers};
use extract::{CaseFields, CompletionService, FieldExtractor, OpenAiChat};
use index::{EmbeddingService, OpenAiEmbeddings, PineconeIndex, RegulationRetriever, VectorIndex};
use ingest::{ExtractorConfig, OcrEngine, PdfTextExtractor};

use crate::retry::RetryPolicy;
use crate::settings::Settings;

/// The whole document-to-letter run. Owns every stage and threads the
/// case batch through them in order: extract text per document, extract
/// fields, summarize, retrieve and filter regulations, compose the
/// letter, back-fill identifiers.
pub struct Pipeline {
    text_extractor: PdfTextExtractor,
    field_extractor: FieldExtractor,
    summarizer: SummarySynthesizer,
    retriever: RegulationRetriever,
    relevance: RelevanceFilter,
    composer: LetterComposer,
    retry: RetryPolicy,
}

impl Pipeline {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        text_extractor: PdfTextExtractor,
        field_extractor: FieldExtractor,
        summarizer: SummarySynthesizer,
        retriever: RegulationRetriever,
        relevance: RelevanceFilter,
        composer: LetterComposer,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            text_extractor,
            field_extractor,
            summarizer,
            retriever,
            relevance,
            composer,
            retry,
        }
    }

    pub fn from_settings(settings: &Settings, ocr: Arc<dyn OcrEngine>) -> Self {
        let chat: Arc<dyn CompletionService> = Arc::new(OpenAiChat::new(
            settings.openai_api_key.clone(),
            settings.chat_model.clone(),
        ));
        let embeddings: Arc<dyn EmbeddingService> = Arc::new(OpenAiEmbeddings::new(
            settings.openai_api_key.clone(),
            settings.embedding_model.clone(),
        ));
        let regulation_index: Arc<dyn VectorIndex> = Arc::new(PineconeIndex::new(
            settings.pinecone_host(),
            settings.pinecone_api_key.clone(),
        ));

        Self::new(
            PdfTextExtractor::new(ExtractorConfig::default(), ocr),
            FieldExtractor::new(chat.clone()),
            SummarySynthesizer::new(chat.clone()),
            RegulationRetriever::new(embeddings, regulation_index, Default::default()),
            RelevanceFilter::new(Default::default()),
            LetterComposer::new(chat),
            RetryPolicy::default(),
        )
    }

    /// Run the pipeline over one case folder. `Ok(None)` means no
    /// document yielded usable text and no letter was generated.
    pub async fn run(&self, folder: &Path) -> Result<Option<String>> {
        let paths = ingest::list_case_documents(folder).await?;
        info!(documents = paths.len(), folder = %folder.display(), "Processing case folder");

        let mut batch: Vec<CaseFields> = Vec::new();

        for path in &paths {
            let doc = ingest::read_document(path).await?;
            let extracted = self.text_extractor.extract(&doc.file_name, &doc.bytes);

            if extracted.is_empty() {
                info!(document = %doc.file_name, "No extractable text, skipping document");
                continue;
            }

            info!(
                document = %doc.file_name,
                pages = extracted.pages,
                chars = extracted.text.chars().count(),
                truncated = extracted.truncated,
                "Extracting case fields"
            );

            let fields = self
                .retry
                .run("field extraction", || {
                    self.field_extractor.extract(&doc.file_name, &extracted.text)
                })
                .await?;
            batch.push(fields);
        }

        if batch.is_empty() {
            warn!("No data extracted from any document, letter will not be generated");
            return Ok(None);
        }

        let summary = self
            .retry
            .run("case summary", || self.summarizer.summarize(&batch))
            .await?;
        info!(chars = summary.chars().count(), "Case summary generated");

        let candidates = self
            .retry
            .run("regulation retrieval", || self.retriever.retrieve(&summary))
            .await?;

        // Candidates are whole index payloads; citation works at
        // paragraph level, so split on blank lines before filtering.
        let fragments: Vec<String> = candidates
            .iter()
            .flat_map(|c| c.split("\n\n"))
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect();

        let (identifiers, regulation_texts) = self.relevance.filter(&summary, &fragments);
        info!(regulations = ?identifiers, "Relevant regulations selected");

        let draft = self
            .retry
            .run("letter composition", || {
                self.composer.compose(&summary, &regulation_texts)
            })
            .await?;

        let ids = find_identifiers(&batch);
        if !ids.is_complete() {
            warn!("Case identifiers incomplete, sentinel values substituted");
        }

        Ok(Some(fill_letter(&draft, &ids)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compose::{MISSING_VALUE, PLACEHOLDER_DEMAND, PLACEHOLDER_NIP, PLACEHOLDER_PROTOCOL};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Routes on the fixed prompt wording of each stage.
    struct ScriptedLlm {
        extraction_calls: AtomicUsize,
        fields_response: &'static str,
    }

    impl ScriptedLlm {
        fn new(fields_response: &'static str) -> Self {
            Self {
                extraction_calls: AtomicUsize::new(0),
                fields_response,
            }
        }
    }

    #[async_trait::async_trait]
    impl CompletionService for ScriptedLlm {
        async fn complete(&self, _system: &str, user: &str, _temperature: f32) -> Result<String> {
            if user.contains("Extraia do texto") {
                self.extraction_calls.fetch_add(1, Ordering::SeqCst);
                Ok(self.fields_response.to_string())
            } else if user.contains("Resuma as informações") {
                Ok("negativa de cobertura com base em rol taxativo de procedimentos".to_string())
            } else {
                Ok(format!(
                    "ASSUNTO: RESPOSTA À NIP Nº {PLACEHOLDER_NIP} – PROTOCOLO Nº {PLACEHOLDER_PROTOCOL} – DEMANDA Nº {PLACEHOLDER_DEMAND}\n\n\
                     II – DA COBERTURA ASSISTENCIAL\nNos termos da RN 465/2021, a negativa se sustenta."
                ))
            }
        }
    }

    struct FixedEmbedding;

    #[async_trait::async_trait]
    impl EmbeddingService for FixedEmbedding {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![0.0; 8])
        }
    }

    struct FixedIndex;

    #[async_trait::async_trait]
    impl VectorIndex for FixedIndex {
        async fn query(&self, _vector: Vec<f32>, _top_k: usize) -> Result<Vec<String>> {
            Ok(vec![
                "RN 465/2021 cobertura do rol taxativo de procedimentos\n\nsem identificador este trecho"
                    .to_string(),
            ])
        }
    }

    fn pipeline(llm: Arc<ScriptedLlm>) -> Pipeline {
        Pipeline::new(
            PdfTextExtractor::new(ExtractorConfig::default(), Arc::new(ingest::NoopOcr)),
            FieldExtractor::new(llm.clone()),
            SummarySynthesizer::new(llm.clone()),
            RegulationRetriever::new(Arc::new(FixedEmbedding), Arc::new(FixedIndex), Default::default()),
            RelevanceFilter::new(Default::default()),
            LetterComposer::new(llm),
            RetryPolicy::new(0, Duration::from_millis(1), Duration::from_millis(1)),
        )
    }

    /// Minimal single-page PDF whose text layer holds `text`.
    fn make_test_pdf(text: &str) -> Vec<u8> {
        use lopdf::dictionary;
        use lopdf::{Document, Object, Stream};

        let mut doc = Document::with_version("1.4");
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let content = format!("BT /F1 12 Tf 100 700 Td ({text}) Tj ET");
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
        });
        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        });
        if let Ok(Object::Dictionary(dict)) = doc.get_object_mut(page_id) {
            dict.set("Parent", pages_id);
        }
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    const COMPLETE_FIELDS: &str = "Número da NIP: 12345\n\
                                   Protocolo: 98765\n\
                                   Número da demanda: 2024.001\n\
                                   Argumento da reclamante: negativa de cobertura";

    #[tokio::test]
    async fn empty_folder_produces_no_letter() {
        let dir = tempfile::tempdir().unwrap();
        let result = pipeline(Arc::new(ScriptedLlm::new(COMPLETE_FIELDS)))
            .run(dir.path())
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn unreadable_documents_are_excluded_from_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a_scan.pdf"), b"not a pdf").unwrap();
        std::fs::write(dir.path().join("b_nip.pdf"), make_test_pdf("Notificacao NIP 12345")).unwrap();

        let llm = Arc::new(ScriptedLlm::new(COMPLETE_FIELDS));
        let result = pipeline(llm.clone()).run(dir.path()).await.unwrap();

        assert!(result.is_some());
        assert_eq!(llm.extraction_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn end_to_end_backfills_identifiers_into_letter() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("nip.pdf"), make_test_pdf("Notificacao NIP")).unwrap();

        let letter = pipeline(Arc::new(ScriptedLlm::new(COMPLETE_FIELDS)))
            .run(dir.path())
            .await
            .unwrap()
            .expect("letter should be generated");

        assert!(letter.contains("NIP Nº 12345"));
        assert!(letter.contains("PROTOCOLO Nº 98765"));
        assert!(letter.contains("DEMANDA Nº 2024.001"));
        assert!(!letter.contains(PLACEHOLDER_NIP));
        assert!(!letter.contains(PLACEHOLDER_PROTOCOL));
        assert!(!letter.contains(PLACEHOLDER_DEMAND));
        assert!(letter.contains("RN 465/2021"));
    }

    #[tokio::test]
    async fn missing_identifiers_fall_back_to_sentinel() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("nip.pdf"), make_test_pdf("Notificacao NIP")).unwrap();

        let letter = pipeline(Arc::new(ScriptedLlm::new(
            "Número da NIP: Não informado\nArgumento da reclamante: negativa de cobertura",
        )))
        .run(dir.path())
        .await
        .unwrap()
        .expect("letter should still be generated");

        assert!(letter.contains(MISSING_VALUE));
        assert!(!letter.contains(PLACEHOLDER_NIP));
    }
}
