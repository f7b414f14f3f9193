use anyhow::Result;

/// One operation: turn a single raster image into text. The pipeline
/// only calls this for pages whose text layer came back empty, so an
/// empty result is a normal outcome, not an error.
pub trait OcrEngine: Send + Sync {
    fn image_to_text(&self, image: &[u8]) -> Result<String>;
}

/// Stand-in engine used when the binary is built without the `ocr`
/// feature. Image-only pages then contribute no text and the document
/// may end up skipped.
pub struct NoopOcr;

impl OcrEngine for NoopOcr {
    fn image_to_text(&self, _image: &[u8]) -> Result<String> {
        tracing::debug!("OCR disabled, skipping embedded image");
        Ok(String::new())
    }
}

#[cfg(feature = "ocr")]
pub use self::tess::TesseractOcr;

#[cfg(feature = "ocr")]
mod tess {
    use super::OcrEngine;
    use anyhow::Result;

    /// Tesseract-backed engine. Language packs must be installed on the
    /// host; `por` covers the scanned ANS dossiers.
    pub struct TesseractOcr {
        lang: String,
    }

    impl TesseractOcr {
        pub fn new(lang: impl Into<String>) -> Self {
            Self { lang: lang.into() }
        }
    }

    impl Default for TesseractOcr {
        fn default() -> Self {
            Self::new("por")
        }
    }

    impl OcrEngine for TesseractOcr {
        fn image_to_text(&self, image: &[u8]) -> Result<String> {
            let mut tess = tesseract::Tesseract::new(None, Some(&self.lang))
                .map_err(|e| anyhow::anyhow!("Failed to initialize Tesseract: {e:?}"))?
                .set_image_from_mem(image)
                .map_err(|e| anyhow::anyhow!("Failed to load image for OCR: {e:?}"))?;

            let text = tess
                .get_text()
                .map_err(|e| anyhow::anyhow!("OCR recognition failed: {e:?}"))?;

            Ok(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_engine_returns_empty_text() {
        let engine = NoopOcr;
        assert_eq!(engine.image_to_text(b"raw image bytes").unwrap(), "");
    }
}
