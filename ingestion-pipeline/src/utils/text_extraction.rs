use std::path::Path;

use common::{error::AppError, types::passage::Passage};

use super::pdf_extraction::extract_pdf_passages;
use crate::chunking::split_into_passages;

/// Dispatches extraction on the original file name's extension. Plain-text
/// formats carry no page labels.
pub async fn extract_passages_from_file(
    path: &Path,
    file_name: &str,
) -> Result<Vec<Passage>, AppError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let passages = match extension.as_str() {
        "pdf" => extract_pdf_passages(path).await?,
        "txt" | "md" | "markdown" | "text" => {
            let content = tokio::fs::read_to_string(path).await?;
            split_into_passages(&content, None)?
        }
        _ => {
            return Err(AppError::Document(format!(
                "Unsupported document type for '{file_name}'; expected a PDF or plain-text file"
            )))
        }
    };

    if passages.is_empty() {
        return Err(AppError::Document(format!(
            "No extractable text found in '{file_name}'"
        )));
    }

    Ok(passages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_plain_text_file_is_extracted_without_page_labels() {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(b"The policy covers outpatient treatment after day 30.")
            .expect("write temp file");

        let passages = extract_passages_from_file(file.path(), "policy.txt")
            .await
            .expect("extraction should succeed");

        assert_eq!(passages.len(), 1);
        assert!(passages[0].content.contains("outpatient"));
        assert!(passages[0].page_label.is_none());
    }

    #[tokio::test]
    async fn test_unsupported_extension_is_rejected() {
        let file = NamedTempFile::new().expect("create temp file");

        let result = extract_passages_from_file(file.path(), "report.docx").await;
        assert!(matches!(result, Err(AppError::Document(_))));
    }

    #[tokio::test]
    async fn test_empty_file_is_a_document_error() {
        let file = NamedTempFile::new().expect("create temp file");

        let result = extract_passages_from_file(file.path(), "empty.txt").await;
        assert!(matches!(result, Err(AppError::Document(_))));
    }
}
