use std::sync::Arc;

use async_trait::async_trait;
use common::{
    error::AppError,
    types::passage::Passage,
    utils::{config::AppConfig, embedding::EmbeddingProvider},
};
use tracing::debug;

use crate::{
    answer_retrieval::{
        create_chat_request, create_user_message, passages_to_chat_context, process_llm_response,
    },
    index::PassageIndex,
    QueryOutcome,
};

/// Capability boundary consumed by the request orchestrator: build one
/// request-scoped index, then answer questions against it. Tests substitute
/// a deterministic implementation.
#[async_trait]
pub trait QueryCapability: Send + Sync {
    async fn build_index(&self, passages: Vec<Passage>) -> Result<PassageIndex, AppError>;

    async fn query(&self, index: &PassageIndex, question: &str)
        -> Result<QueryOutcome, AppError>;
}

/// Production implementation backed by the configured embedding provider and
/// an OpenAI-compatible chat endpoint.
pub struct QueryEngine {
    embedding: EmbeddingProvider,
    client: Arc<async_openai::Client<async_openai::config::OpenAIConfig>>,
    config: AppConfig,
}

impl QueryEngine {
    pub fn new(
        embedding: EmbeddingProvider,
        client: Arc<async_openai::Client<async_openai::config::OpenAIConfig>>,
        config: AppConfig,
    ) -> Self {
        Self {
            embedding,
            client,
            config,
        }
    }
}

#[async_trait]
impl QueryCapability for QueryEngine {
    async fn build_index(&self, passages: Vec<Passage>) -> Result<PassageIndex, AppError> {
        PassageIndex::build(&self.embedding, passages).await
    }

    async fn query(
        &self,
        index: &PassageIndex,
        question: &str,
    ) -> Result<QueryOutcome, AppError> {
        let query_embedding = self
            .embedding
            .embed(question)
            .await
            .map_err(|e| AppError::Query(format!("Failed to embed question: {e}")))?;

        let sources = index.search(&query_embedding, self.config.answer_top_k);
        debug!(
            source_count = sources.len(),
            top_k = self.config.answer_top_k,
            "Retrieved context passages"
        );

        let user_message = create_user_message(&passages_to_chat_context(&sources), question);
        let request = create_chat_request(user_message, &self.config)
            .map_err(|e| AppError::Query(format!("Failed to build chat request: {e}")))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AppError::Query(format!("Chat completion failed: {e}")))?;

        let answer = process_llm_response(response)?;
        Ok(QueryOutcome { answer, sources })
    }
}
