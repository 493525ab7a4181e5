use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Clone, Deserialize, Debug)]
pub struct AppConfig {
    pub api_auth_token: String,
    pub openai_api_key: String,
    #[serde(default = "default_base_url")]
    pub openai_base_url: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    #[serde(default = "default_query_model")]
    pub query_model: String,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    #[serde(default = "default_embedding_dimensions")]
    pub embedding_dimensions: u32,
    #[serde(default = "default_embedding_backend")]
    pub embedding_backend: String,
    #[serde(default = "default_answer_top_k")]
    pub answer_top_k: usize,
    #[serde(default)]
    pub include_source_excerpts: bool,
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    #[serde(default = "default_query_system_prompt")]
    pub query_system_prompt: String,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_http_port() -> u16 {
    8000
}

fn default_query_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_embedding_dimensions() -> u32 {
    1536
}

fn default_embedding_backend() -> String {
    "openai".to_string()
}

fn default_answer_top_k() -> usize {
    3
}

fn default_max_body_bytes() -> usize {
    10_000_000
}

fn default_query_system_prompt() -> String {
    "You are a document question-answering assistant. Answer the user's \
     question using only the provided context passages. Be concise and \
     factual. If the context does not contain the answer, say so plainly."
        .to_string()
}

pub fn get_config() -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::with_name("config").required(false))
        .add_source(Environment::default())
        .build()?;

    config.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_optional_fields() {
        let config = Config::builder()
            .set_override("api_auth_token", "secret")
            .unwrap()
            .set_override("openai_api_key", "key")
            .unwrap()
            .build()
            .unwrap();

        let app_config: AppConfig = config.try_deserialize().unwrap();
        assert_eq!(app_config.http_port, 8000);
        assert_eq!(app_config.answer_top_k, 3);
        assert_eq!(app_config.embedding_dimensions, 1536);
        assert_eq!(app_config.embedding_backend, "openai");
        assert!(!app_config.include_source_excerpts);
        assert_eq!(app_config.openai_base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn test_missing_required_fields_is_an_error() {
        let config = Config::builder()
            .set_override("openai_api_key", "key")
            .unwrap()
            .build()
            .unwrap();

        let result: Result<AppConfig, _> = config.try_deserialize();
        assert!(result.is_err());
    }
}
