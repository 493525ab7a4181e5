use std::io::Write;

use common::{error::AppError, types::passage::Passage};
use reqwest::Client;
use tempfile::NamedTempFile;
use tracing::info;

use crate::utils::text_extraction::extract_passages_from_file;

/// Where the document bytes come from. An upload already sits in a scoped
/// temp file; the file is removed when the source is dropped, on every exit
/// path.
#[derive(Debug)]
pub enum DocumentSource {
    Url(String),
    Upload {
        file: NamedTempFile,
        file_name: String,
    },
}

impl DocumentSource {
    pub fn label(&self) -> &str {
        match self {
            Self::Url(url) => url,
            Self::Upload { file_name, .. } => file_name,
        }
    }
}

/// Fetches the document, extracts its text, and returns the ordered passage
/// sequence. Transient filesystem state never outlives this call.
pub async fn load_document(
    source: DocumentSource,
    client: &Client,
) -> Result<Vec<Passage>, AppError> {
    match source {
        DocumentSource::Upload { file, file_name } => {
            info!(%file_name, "Extracting passages from uploaded file");
            let passages = extract_passages_from_file(file.path(), &file_name).await?;
            drop(file);
            Ok(passages)
        }
        DocumentSource::Url(url) => {
            info!(%url, "Fetching document from URL");
            let response = client.get(&url).send().await.map_err(|e| {
                AppError::Document(format!("Failed to load document from URL: {e}"))
            })?;
            let response = response.error_for_status().map_err(|e| {
                AppError::Document(format!("Failed to load document from URL: {e}"))
            })?;
            let bytes = response.bytes().await.map_err(|e| {
                AppError::Document(format!("Failed to read document body: {e}"))
            })?;

            let file_name = file_name_from_url(&url);
            let mut file = NamedTempFile::new()?;
            file.write_all(&bytes)?;
            file.as_file().sync_all()?;

            let passages = extract_passages_from_file(file.path(), &file_name).await?;
            drop(file);

            info!(%url, passage_count = passages.len(), "Document loaded");
            Ok(passages)
        }
    }
}

/// Derives an extraction file name from the URL path. URLs without a usable
/// extension are treated as PDFs, matching the original service behavior.
fn file_name_from_url(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_owned))
        })
        .filter(|name| name.contains('.'))
        .unwrap_or_else(|| "document.pdf".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_file_name_from_url_keeps_extension() {
        assert_eq!(
            file_name_from_url("https://example.com/assets/policy.pdf?sig=abc"),
            "policy.pdf"
        );
        assert_eq!(
            file_name_from_url("https://example.com/notes.txt"),
            "notes.txt"
        );
    }

    #[test]
    fn test_file_name_from_url_defaults_to_pdf() {
        assert_eq!(file_name_from_url("https://example.com/doc"), "document.pdf");
        assert_eq!(file_name_from_url("not a url"), "document.pdf");
    }

    #[tokio::test]
    async fn test_upload_extraction_failure_removes_temp_file() {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(b"%PDF-garbage that will not parse")
            .expect("write temp file");
        let temp_path = file.path().to_path_buf();

        let source = DocumentSource::Upload {
            file,
            file_name: "broken.pdf".to_string(),
        };
        let client = Client::new();

        let result = load_document(source, &client).await;
        assert!(matches!(result, Err(AppError::Document(_))));
        assert!(
            !temp_path.exists(),
            "temp file must be removed on the failure path"
        );
    }

    #[tokio::test]
    async fn test_upload_extraction_success_removes_temp_file() {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(b"Waiting period for pre-existing conditions is 36 months.")
            .expect("write temp file");
        let temp_path = file.path().to_path_buf();

        let source = DocumentSource::Upload {
            file,
            file_name: "policy.txt".to_string(),
        };
        let client = Client::new();

        let passages = load_document(source, &client)
            .await
            .expect("extraction should succeed");
        assert_eq!(passages.len(), 1);
        assert!(!temp_path.exists(), "temp file must be removed on success");
    }
}
