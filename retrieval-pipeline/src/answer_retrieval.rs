use async_openai::{
    error::OpenAIError,
    types::{
        ChatCompletionRequestSystemMessage, ChatCompletionRequestUserMessage,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs, CreateChatCompletionResponse,
    },
};
use common::{error::AppError, utils::config::AppConfig};
use serde_json::Value;

use crate::RetrievedPassage;

/// Snippet length in the rendered sources block.
const SOURCE_SNIPPET_MAX_CHARS: usize = 500;

/// Convert retrieved passages to JSON format for LLM context
pub fn passages_to_chat_context(sources: &[RetrievedPassage]) -> Value {
    fn round_score(value: f32) -> f64 {
        (f64::from(value) * 1000.0).round() / 1000.0
    }

    serde_json::json!(sources
        .iter()
        .map(|source| {
            serde_json::json!({
                "page": source.passage.page_label,
                "content": source.passage.content,
                "score": round_score(source.score),
            })
        })
        .collect::<Vec<_>>())
}

pub fn create_user_message(context_json: &Value, query: &str) -> String {
    format!(
        r"
        Context Information:
        ==================
        {context_json}

        User Question:
        ==================
        {query}
        "
    )
}

pub fn create_chat_request(
    user_message: String,
    config: &AppConfig,
) -> Result<CreateChatCompletionRequest, OpenAIError> {
    CreateChatCompletionRequestArgs::default()
        .model(&config.query_model)
        .messages([
            ChatCompletionRequestSystemMessage::from(config.query_system_prompt.clone()).into(),
            ChatCompletionRequestUserMessage::from(user_message).into(),
        ])
        .build()
}

pub fn process_llm_response(response: CreateChatCompletionResponse) -> Result<String, AppError> {
    response
        .choices
        .first()
        .and_then(|choice| choice.message.content.clone())
        .ok_or(AppError::LLMParsing(
            "No content found in LLM response".into(),
        ))
}

/// Renders the explainability block appended to an answer when source
/// excerpts are enabled: ordinal, page label, relevance score, and a bounded
/// content snippet per retrieved passage.
pub fn render_sources_block(sources: &[RetrievedPassage]) -> String {
    let mut block = String::from("\n\n--- Sources and Rationale ---\n");

    if sources.is_empty() {
        block.push_str("No specific sources retrieved for this answer.\n");
        return block;
    }

    for (i, source) in sources.iter().enumerate() {
        let page = source.passage.page_label.as_deref().unwrap_or("N/A");
        let content = source.passage.content.trim();
        let snippet: String = content.chars().take(SOURCE_SNIPPET_MAX_CHARS).collect();
        let truncated = content.chars().count() > SOURCE_SNIPPET_MAX_CHARS;

        block.push_str(&format!("\nSource {} (Page {}):\n", i + 1, page));
        block.push_str(&format!("Relevance Score: {:.3}\n", source.score));
        block.push_str(&format!(
            "Content: {snippet}{}\n",
            if truncated { "..." } else { "" }
        ));
        block.push_str(&"-".repeat(50));
        block.push('\n');
    }

    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::types::passage::Passage;

    fn source(content: &str, page: Option<&str>, score: f32) -> RetrievedPassage {
        RetrievedPassage {
            passage: Passage::new(content, page.map(str::to_owned)),
            score,
        }
    }

    #[test]
    fn test_chat_context_rounds_scores() {
        let sources = vec![source("clause text", Some("4"), 0.123_456)];
        let context = passages_to_chat_context(&sources);

        let rendered = context.to_string();
        assert!(rendered.contains("0.123"));
        assert!(rendered.contains("clause text"));
        assert!(rendered.contains("\"4\""));
    }

    #[test]
    fn test_user_message_contains_context_and_question() {
        let context = passages_to_chat_context(&[source("snippet", None, 0.5)]);
        let message = create_user_message(&context, "What is covered?");

        assert!(message.contains("snippet"));
        assert!(message.contains("What is covered?"));
        assert!(message.contains("Context Information:"));
    }

    #[test]
    fn test_sources_block_renders_page_and_score() {
        let block = render_sources_block(&[source("relevant text", Some("7"), 0.87)]);

        assert!(block.starts_with("\n\n--- Sources and Rationale ---"));
        assert!(block.contains("Source 1 (Page 7):"));
        assert!(block.contains("Relevance Score: 0.870"));
        assert!(block.contains("Content: relevant text"));
    }

    #[test]
    fn test_sources_block_uses_na_for_missing_page() {
        let block = render_sources_block(&[source("unlabelled", None, 0.2)]);
        assert!(block.contains("(Page N/A)"));
    }

    #[test]
    fn test_sources_block_truncates_long_content() {
        let long_content = "x".repeat(700);
        let block = render_sources_block(&[source(&long_content, Some("1"), 0.9)]);

        assert!(block.contains(&format!("{}...", "x".repeat(500))));
        assert!(!block.contains(&"x".repeat(501)));
    }

    #[test]
    fn test_sources_block_without_sources() {
        let block = render_sources_block(&[]);
        assert!(block.contains("No specific sources retrieved for this answer."));
    }
}
