//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{
        db::DbAdapter, language_llm::OpenAiLanguageAdapter, qa_llm::OpenAiQaAdapter,
        summary_llm::OpenAiSummaryAdapter, translation_llm::OpenAiTranslationAdapter,
        vision_llm::OpenAiVisionAdapter,
    },
    config::Config,
    error::ApiError,
    extract::{
        ocr::{OcrConfig, OcrEngine},
        FileDecoder,
    },
    web::{
        chat_handler, extract_document_handler, list_history_handler, middleware::require_auth,
        rest::ApiDoc, save_history_handler, state::AppState, summary_stream_handler,
        translation_stream_handler,
    },
};
use async_openai::{config::OpenAIConfig, Client};
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
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

    // --- 2. Connect to Database & Run Migrations ---
    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let db_adapter = Arc::new(DbAdapter::new(db_pool.clone()));
    info!("Running database migrations...");
    db_adapter.run_migrations().await?;
    info!("Database migrations complete.");

    // --- 3. Initialize Service Adapters ---
    let openai_config = OpenAIConfig::new().with_api_key(
        config
            .openai_api_key
            .as_ref()
            .ok_or_else(|| ApiError::Internal("OPENAI_API_KEY is required".to_string()))?,
    );
    let openai_client = Client::with_config(openai_config);

    let summary_adapter = Arc::new(OpenAiSummaryAdapter::new(
        openai_client.clone(),
        config.summary_model.clone(),
    ));
    let translation_adapter = Arc::new(OpenAiTranslationAdapter::new(
        openai_client.clone(),
        config.translation_model.clone(),
    ));
    let qa_adapter = Arc::new(OpenAiQaAdapter::new(
        openai_client.clone(),
        config.qa_model.clone(),
    ));
    let language_adapter = Arc::new(OpenAiLanguageAdapter::new(
        openai_client.clone(),
        config.qa_model.clone(),
    ));
    let vision_adapter = Arc::new(OpenAiVisionAdapter::new(
        openai_client.clone(),
        config.vision_model.clone(),
    ));

    let ocr_engine = OcrEngine::new(OcrConfig {
        tesseract_cmd: config.tesseract_cmd.clone(),
        language: config.ocr_language.clone(),
    });
    let decoder = Arc::new(FileDecoder::new(ocr_engine, Some(vision_adapter)));

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        config: config.clone(),
        db: db_adapter,
        summary_adapter,
        translation_adapter,
        qa_adapter,
        language_adapter,
        decoder,
    });

    let cors_origin = config
        .cors_origin
        .parse::<HeaderValue>()
        .map_err(|e| ApiError::Internal(format!("Invalid CORS_ORIGIN: {}", e)))?;
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // --- 5. Create the Web Router ---
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/api/summary/stream", post(summary_stream_handler))
        .route("/api/translation/stream", post(translation_stream_handler))
        .route("/api/documents/extract", post(extract_document_handler))
        .route("/api/chat", post(chat_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route(
            "/api/history",
            post(save_history_handler).get(list_history_handler),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    // Combine API routes
    let api_router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
