use common::{error::AppError, types::passage::Passage};
use text_splitter::{ChunkConfig, TextSplitter};

/// Chunk bounds match the original deployment's splitter settings.
pub const CHUNK_MAX_CHARS: usize = 1024;
pub const CHUNK_OVERLAP_CHARS: usize = 200;

/// Splits extracted text into passages, all carrying the same page label.
/// Whitespace-only chunks are dropped.
pub fn split_into_passages(
    text: &str,
    page_label: Option<String>,
) -> Result<Vec<Passage>, AppError> {
    let chunk_config = ChunkConfig::new(CHUNK_MAX_CHARS)
        .with_overlap(CHUNK_OVERLAP_CHARS)
        .map_err(|e| AppError::Document(format!("invalid chunk overlap: {e}")))?;
    let splitter = TextSplitter::new(chunk_config);

    Ok(splitter
        .chunks(text)
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| Passage::new(chunk, page_label.clone()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_yields_single_passage() {
        let passages = split_into_passages("A short policy clause.", None).unwrap();
        assert_eq!(passages.len(), 1);
        assert_eq!(passages[0].content, "A short policy clause.");
    }

    #[test]
    fn test_long_text_is_split_within_bounds() {
        let sentence = "The insurer shall indemnify the policyholder for covered expenses. ";
        let text = sentence.repeat(100);

        let passages = split_into_passages(&text, Some("2".to_string())).unwrap();
        assert!(passages.len() > 1);
        for passage in &passages {
            assert!(passage.content.len() <= CHUNK_MAX_CHARS);
            assert_eq!(passage.page_label.as_deref(), Some("2"));
        }
    }

    #[test]
    fn test_whitespace_only_text_yields_nothing() {
        let passages = split_into_passages("   \n\t  \n", None).unwrap();
        assert!(passages.is_empty());
    }
}
