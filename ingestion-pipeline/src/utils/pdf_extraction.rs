use std::path::Path;

use common::{error::AppError, types::passage::Passage};

use crate::chunking::split_into_passages;

/// Extracts the text layer of a PDF page by page and chunks each page into
/// passages labelled with its 1-based page number. Parsing runs off the async
/// executor.
pub async fn extract_pdf_passages(path: &Path) -> Result<Vec<Passage>, AppError> {
    let pdf_bytes = tokio::fs::read(path).await?;

    let pages = tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text_from_mem_by_pages(&pdf_bytes)
    })
    .await?
    .map_err(|err| AppError::Document(format!("Failed to extract text from PDF: {err}")))?;

    let mut passages = Vec::new();
    for (idx, page_text) in pages.iter().enumerate() {
        let page_label = (idx + 1).to_string();
        passages.extend(split_into_passages(page_text, Some(page_label))?);
    }

    Ok(passages)
}
