use axum::{
    body::Bytes,
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use oracle_models::{epoch_seconds, parse_sequence_body, Odds};
use oracle_services::{SequencePredictor, StateStore, SubscriberRegistry, DEFAULT_SUBSCRIBER_BUFFER};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::websocket::live_feed;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<StateStore>,
    pub registry: Arc<SubscriberRegistry>,
    pub predictor: SequencePredictor,
    /// Queue depth given to each live subscriber.
    pub subscriber_buffer: usize,
}

impl AppState {
    pub fn new(store: Arc<StateStore>, registry: Arc<SubscriberRegistry>) -> Self {
        Self {
            store,
            registry,
            predictor: SequencePredictor::new(),
            subscriber_buffer: DEFAULT_SUBSCRIBER_BUFFER,
        }
    }

    pub fn with_subscriber_buffer(mut self, buffer: usize) -> Self {
        self.subscriber_buffer = buffer;
        self
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub ts: f64,
}

#[derive(Serialize)]
pub struct OddsResponse {
    pub status: &'static str,
    pub data: Vec<Odds>,
    pub ts: f64,
}

#[derive(Serialize)]
pub struct PredictResponse {
    pub status: &'static str,
    pub prediction: Option<f64>,
    pub confidence: f64,
    pub reason: String,
}

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/odds", get(get_odds))
        .route("/predict", post(predict))
        .route("/ws", get(live_feed))
}

/// Full application: routes, state, CORS and request tracing.
pub fn create_app(state: AppState) -> Router {
    create_routes()
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        ts: epoch_seconds(),
    })
}

async fn get_odds(State(state): State<AppState>) -> Json<OddsResponse> {
    Json(OddsResponse {
        status: "success",
        data: state.store.snapshot_odds(),
        ts: epoch_seconds(),
    })
}

async fn predict(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PredictResponse>, ApiError> {
    let sequence = parse_sequence_body(&body)?;
    let result = state.predictor.predict(&sequence);

    Ok(Json(PredictResponse {
        status: "success",
        prediction: result.prediction,
        confidence: result.confidence,
        reason: result.reason,
    }))
}
