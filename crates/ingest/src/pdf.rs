use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::warn;

use crate::ExtractorConfig;
use crate::ocr::OcrEngine;

/// Text pulled out of one document, after trimming and the length cap.
#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub text: String,
    pub truncated: bool,
    /// Character count of the trimmed text before any truncation.
    pub original_len: usize,
    pub pages: usize,
}

impl ExtractedText {
    pub fn empty() -> Self {
        Self {
            text: String::new(),
            truncated: false,
            original_len: 0,
            pages: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Trim and apply the length cap. Oversized documents keep only the
    /// leading window; the original length is preserved for logging.
    pub fn from_raw(raw: &str, pages: usize, config: &ExtractorConfig, file_name: &str) -> Self {
        let trimmed = raw.trim();
        let original_len = trimmed.chars().count();

        if original_len > config.max_chars {
            warn!(
                document = file_name,
                original_len,
                kept = config.truncate_to,
                "Document too long, keeping leading characters only"
            );
            return Self {
                text: trimmed.chars().take(config.truncate_to).collect(),
                truncated: true,
                original_len,
                pages,
            };
        }

        Self {
            text: trimmed.to_string(),
            truncated: false,
            original_len,
            pages,
        }
    }
}

/// Converts one PDF into plain text. Pages with a text layer are taken
/// as-is; pages without one fall back to OCR over their embedded raster
/// images. A failed page never aborts the document.
pub struct PdfTextExtractor {
    config: ExtractorConfig,
    ocr: Arc<dyn OcrEngine>,
}

impl PdfTextExtractor {
    pub fn new(config: ExtractorConfig, ocr: Arc<dyn OcrEngine>) -> Self {
        Self { config, ocr }
    }

    /// Extract the document's text. An unreadable or image-only document
    /// yields empty text, which the caller treats as "skip".
    pub fn extract(&self, file_name: &str, bytes: &[u8]) -> ExtractedText {
        let page_texts = match pdf_extract::extract_text_from_mem_by_pages(bytes) {
            Ok(pages) => pages,
            Err(e) => {
                warn!(document = file_name, error = %e, "Unreadable PDF, treating as empty");
                return ExtractedText::empty();
            }
        };

        // Page/image structure, needed only for the OCR fallback.
        let raster_doc = lopdf::Document::load_mem(bytes).ok();

        let mut text = String::new();

        for (i, page_text) in page_texts.iter().enumerate() {
            if !page_text.trim().is_empty() {
                text.push_str(page_text);
                continue;
            }

            match self.ocr_page(&raster_doc, i) {
                Ok(ocr_text) => text.push_str(&ocr_text),
                Err(e) => {
                    warn!(
                        document = file_name,
                        page = i + 1,
                        error = %e,
                        "OCR failed for page, continuing with next page"
                    );
                }
            }
        }

        ExtractedText::from_raw(&text, page_texts.len(), &self.config, file_name)
    }

    /// OCR every raster image embedded in the given page.
    fn ocr_page(&self, doc: &Option<lopdf::Document>, page_index: usize) -> Result<String> {
        let doc = doc
            .as_ref()
            .context("PDF page structure unavailable for OCR")?;

        let pages = doc.get_pages();
        let page_id = *pages
            .get(&((page_index + 1) as u32))
            .context("Page not present in PDF page tree")?;

        let mut out = String::new();
        for image in page_images(doc, page_id)? {
            out.push_str(&self.ocr.image_to_text(&image)?);
        }

        Ok(out)
    }
}

/// Raw bytes of each image XObject referenced by a page's resources.
/// Unfiltered streams are returned decompressed; encoded streams (e.g.
/// DCTDecode JPEGs) are handed over as stored, which OCR engines decode
/// themselves.
fn page_images(doc: &lopdf::Document, page_id: lopdf::ObjectId) -> Result<Vec<Vec<u8>>> {
    let page = doc.get_dictionary(page_id)?;

    let resources = match page.get(b"Resources") {
        Ok(obj) => resolve(doc, obj)?.as_dict()?,
        Err(_) => return Ok(Vec::new()),
    };

    let xobjects = match resources.get(b"XObject") {
        Ok(obj) => resolve(doc, obj)?.as_dict()?,
        Err(_) => return Ok(Vec::new()),
    };

    let mut images = Vec::new();

    for (_name, obj) in xobjects.iter() {
        let stream = match resolve(doc, obj)?.as_stream() {
            Ok(s) => s,
            Err(_) => continue,
        };

        let is_image = stream
            .dict
            .get(b"Subtype")
            .ok()
            .and_then(|o| o.as_name().ok())
            .map(|n| n == b"Image")
            .unwrap_or(false);

        if is_image {
            let data = stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone());
            images.push(data);
        }
    }

    Ok(images)
}

fn resolve<'a>(doc: &'a lopdf::Document, obj: &'a lopdf::Object) -> Result<&'a lopdf::Object> {
    Ok(match obj {
        lopdf::Object::Reference(id) => doc.get_object(*id)?,
        other => other,
    })
}
