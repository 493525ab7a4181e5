use std::sync::Arc;

use common::utils::config::AppConfig;
use retrieval_pipeline::QueryCapability;

#[derive(Clone)]
pub struct ApiState {
    pub config: AppConfig,
    pub http_client: reqwest::Client,
    pub query: Arc<dyn QueryCapability>,
}

impl ApiState {
    pub fn new(config: &AppConfig, query: Arc<dyn QueryCapability>) -> Self {
        Self {
            config: config.clone(),
            http_client: reqwest::Client::new(),
            query,
        }
    }
}
