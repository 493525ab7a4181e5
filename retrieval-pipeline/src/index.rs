use std::cmp::Ordering;

use common::{error::AppError, types::passage::Passage, utils::embedding::EmbeddingProvider};
use tracing::debug;

use crate::RetrievedPassage;

/// A passage paired with its embedding vector.
#[derive(Debug, Clone)]
struct EmbeddedPassage {
    passage: Passage,
    embedding: Vec<f32>,
}

/// Request-scoped semantic index over the full passage set. Built once per
/// request and dropped with the request handler; nothing is shared or reused
/// across requests.
pub struct PassageIndex {
    entries: Vec<EmbeddedPassage>,
}

impl PassageIndex {
    /// Embeds every passage and assembles the index. An empty passage set or
    /// an embedding failure is an index construction error.
    pub async fn build(
        provider: &EmbeddingProvider,
        passages: Vec<Passage>,
    ) -> Result<Self, AppError> {
        if passages.is_empty() {
            return Err(AppError::Index(
                "Cannot build an index from an empty passage set".into(),
            ));
        }

        let texts: Vec<String> = passages.iter().map(|p| p.content.clone()).collect();
        let embeddings = provider
            .embed_batch(texts)
            .await
            .map_err(|e| AppError::Index(format!("Failed to embed passages: {e}")))?;

        if embeddings.len() != passages.len() {
            return Err(AppError::Index(format!(
                "Embedding count mismatch: {} passages, {} vectors",
                passages.len(),
                embeddings.len()
            )));
        }

        let entries = passages
            .into_iter()
            .zip(embeddings)
            .map(|(passage, embedding)| EmbeddedPassage { passage, embedding })
            .collect::<Vec<_>>();

        debug!(entry_count = entries.len(), "Passage index built");
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ranks all passages by cosine similarity against the query vector,
    /// descending, bounded to `top_k`.
    pub fn search(&self, query: &[f32], top_k: usize) -> Vec<RetrievedPassage> {
        let mut scored: Vec<RetrievedPassage> = self
            .entries
            .iter()
            .map(|entry| RetrievedPassage {
                passage: entry.passage.clone(),
                score: cosine_similarity(query, &entry.embedding),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(top_k);
        scored
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
