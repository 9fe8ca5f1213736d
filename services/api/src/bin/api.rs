//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{
        CannedImageAnalysis, CannedPdfAnalysis, CannedSpreadsheetAnalysis, HeuristicTextAnalysis,
        InMemoryDocumentStore, SystemClipboardAdapter, SystemShareAdapter, TemplateDraftGenerator,
    },
    config::Config,
    error::ApiError,
    web::{build_router, rest::ApiDoc, state::AppState},
};
use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
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

    // --- 2. Initialize Service Adapters ---
    // Analysis and generation are simulated; their adapters only carry the
    // configured delays. Swapping in real backends happens here.
    let image_analyzer = Arc::new(CannedImageAnalysis::new(config.image_analysis_delay));
    let pdf_analyzer = Arc::new(CannedPdfAnalysis::new(config.pdf_analysis_delay));
    let spreadsheet_analyzer = Arc::new(CannedSpreadsheetAnalysis::new(
        config.spreadsheet_analysis_delay,
    ));
    let text_analyzer = Arc::new(HeuristicTextAnalysis::new(config.text_analysis_delay));
    let generator = Arc::new(TemplateDraftGenerator::new(config.generation_delay));
    let store = Arc::new(InMemoryDocumentStore::new());
    let share = Arc::new(SystemShareAdapter::new());
    let clipboard = Arc::new(SystemClipboardAdapter::new());

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState::new(
        config.clone(),
        image_analyzer,
        pdf_analyzer,
        spreadsheet_analyzer,
        text_analyzer,
        generator,
        store,
        share,
        clipboard,
    ));

    let allowed_origin = config
        .allowed_origin
        .parse::<HeaderValue>()
        .map_err(|e| ApiError::Internal(format!("Invalid ALLOWED_ORIGIN: {}", e)))?;
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // --- 4. Create the Web Router ---
    let api_router = build_router(app_state).layer(cors);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
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
