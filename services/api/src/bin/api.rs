//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{FileStore, OpenAiFitnessAdapter, OpenAiRecommendationAdapter},
    config::Config,
    error::ApiError,
    web::{build_router, ApiDoc, AppState},
};
use async_openai::{config::OpenAIConfig, Client};
use axum::Router;
use moodbite_core::ports::StateStorage;
use moodbite_core::store::FoodStore;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Open Persistent Storage & Load the Store ---
    let file_store = FileStore::new(config.data_dir.clone());
    file_store.init().await?;
    let storage: Arc<dyn StateStorage> = Arc::new(file_store);
    let store = FoodStore::load(storage).await?;
    info!("Persisted state loaded from {}", config.data_dir.display());

    // --- 3. Initialize Service Adapters ---
    let openai_config = OpenAIConfig::new().with_api_key(
        config
            .openai_api_key
            .as_ref()
            .ok_or_else(|| ApiError::Internal("OPENAI_API_KEY is required".to_string()))?,
    );
    let openai_client = Client::with_config(openai_config);

    let recommender = Arc::new(OpenAiRecommendationAdapter::new(
        openai_client.clone(),
        config.recommendation_model.clone(),
        config.temperature,
    ));
    let fitness = Arc::new(OpenAiFitnessAdapter::new(
        openai_client,
        config.fitness_model.clone(),
        config.temperature,
    ));

    // --- 4. Build the Shared AppState & Router ---
    let app_state = Arc::new(AppState::new(config.clone(), store, recommender, fitness));

    let app = Router::new()
        .merge(build_router(app_state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
