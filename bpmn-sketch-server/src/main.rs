use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use bpmn_sketch_core::extract::{ClaudeExtractor, HeuristicExtractor, ModelExtractor};
use bpmn_sketch_core::{compile, validate, ProcessModel, ValidationResult};

mod explain;

// Application state
#[derive(Clone)]
pub struct AppState {
    /// Language-model extractor; None when no API key is configured.
    pub llm: Option<Arc<dyn ModelExtractor>>,
    pub heuristic: Arc<HeuristicExtractor>,
}

// API types
#[derive(Deserialize)]
pub struct ProcessDescription {
    pub text: String,
}

#[derive(Serialize)]
pub struct GenerateResponse {
    pub bpmn_xml: String,
    pub validation: ValidationResult,
    pub explanation: String,
    pub process_info: ProcessModel,
    /// Which extractor produced `process_info`.
    pub ai_provider: String,
    /// True when the compiler substituted its static fallback document.
    pub used_fallback: bool,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub extractor: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("bpmn_sketch_server=info,tower_http=debug")
            }),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let llm: Option<Arc<dyn ModelExtractor>> = match ClaudeExtractor::from_env() {
        Ok(extractor) => {
            info!("using Anthropic extractor, model {}", extractor.model_name());
            Some(Arc::new(extractor))
        }
        Err(err) => {
            warn!("no language model configured ({}), heuristic extraction only", err);
            None
        }
    };

    let state = AppState {
        llm,
        heuristic: Arc::new(HeuristicExtractor::new()),
    };

    let app = create_router(state);

    // Determine port
    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse::<u16>()
        .unwrap_or(3000);

    let addr = format!("0.0.0.0:{}", port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health_check))
        .route("/api/generate-bpmn", post(generate_bpmn))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "bpmn-sketch BPMN generator API" }))
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let extractor = state
        .llm
        .as_ref()
        .map(|llm| llm.provider_name().to_string())
        .unwrap_or_else(|| state.heuristic.provider_name().to_string());
    Json(HealthResponse {
        status: "healthy",
        extractor,
    })
}

// Turn a free-text description into a BPMN document plus validation verdict
// and explanation. Extraction falls back to the heuristic when the language
// model fails; the compiler itself never fails the request.
async fn generate_bpmn(
    State(state): State<AppState>,
    Json(description): Json<ProcessDescription>,
) -> Result<Json<GenerateResponse>, StatusCode> {
    let text = description.text.trim();
    if text.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let (process_info, ai_provider) = match &state.llm {
        Some(llm) => match llm.extract(text).await {
            Ok(model) => (model, llm.provider_name().to_string()),
            Err(err) => {
                warn!("model extraction failed, using heuristic: {:?}", err);
                (
                    state.heuristic.extract_model(text),
                    state.heuristic.provider_name().to_string(),
                )
            }
        },
        None => (
            state.heuristic.extract_model(text),
            state.heuristic.provider_name().to_string(),
        ),
    };

    let compiled = compile(&process_info);
    let validation = validate(&compiled.xml);
    let explanation = explain::explain_process(&process_info);

    Ok(Json(GenerateResponse {
        bpmn_xml: compiled.xml,
        validation,
        explanation,
        process_info,
        ai_provider,
        used_fallback: compiled.used_fallback,
    }))
}
