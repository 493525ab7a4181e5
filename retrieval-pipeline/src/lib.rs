#![allow(clippy::missing_docs_in_private_items)]

pub mod answer_retrieval;
pub mod engine;
pub mod index;

pub use engine::{QueryCapability, QueryEngine};
pub use index::PassageIndex;

use common::types::passage::Passage;

// Captures a supporting passage plus its similarity score for downstream prompts.
#[derive(Debug, Clone)]
pub struct RetrievedPassage {
    pub passage: Passage,
    pub score: f32,
}

// What one question yields: the generated answer and its ranked sources.
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub answer: String,
    pub sources: Vec<RetrievedPassage>,
}
