use std::sync::Arc;

use api_router::{api_routes_v1, api_state::ApiState, health_routes};
use axum::Router;
use common::utils::{config::get_config, embedding::EmbeddingProvider};
use retrieval_pipeline::QueryEngine;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set up tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .try_init()
        .ok();

    // Get config
    let config = get_config()?;

    let openai_client = Arc::new(async_openai::Client::with_config(
        async_openai::config::OpenAIConfig::new()
            .with_api_key(&config.openai_api_key)
            .with_api_base(&config.openai_base_url),
    ));

    // Create embedding provider based on config
    let embedding_provider = EmbeddingProvider::from_config(&config, Some(openai_client.clone()))?;
    info!(
        embedding_backend = embedding_provider.backend_label(),
        embedding_dimension = embedding_provider.dimension(),
        query_model = %config.query_model,
        "Query capability initialized"
    );

    let query_engine = Arc::new(QueryEngine::new(
        embedding_provider,
        openai_client,
        config.clone(),
    ));

    let api_state = ApiState::new(&config, query_engine);

    // Create Axum router
    let app = Router::new()
        .merge(health_routes())
        .nest("/api/v1", api_routes_v1(&api_state))
        .layer(CorsLayer::permissive())
        .with_state(api_state);

    info!("Starting server listening on 0.0.0.0:{}", config.http_port);
    let serve_address = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(serve_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
