use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tokio::fs;

/// One source document from the case folder. Read once, dropped after
/// text extraction.
pub struct CaseDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// List the `.pdf` files of a case folder, deduplicated and sorted
/// lexicographically by file name. Processing order for the whole run
/// is fixed by this listing.
pub async fn list_case_documents(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)
        .await
        .context(format!("Failed to read case folder: {:?}", dir))?;

    let mut names = BTreeSet::new();

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let is_pdf = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);

        if is_pdf {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.insert(name.to_string());
            }
        }
    }

    Ok(names.into_iter().map(|name| dir.join(name)).collect())
}

pub async fn read_document(path: &Path) -> Result<CaseDocument> {
    let bytes = fs::read(path)
        .await
        .context(format!("Failed to read document: {:?}", path))?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unnamed>")
        .to_string();

    Ok(CaseDocument { file_name, bytes })
}
