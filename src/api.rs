use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::assets::EngineAssets;
use crate::config::EngineConfig;
use crate::engine::PredictionEngine;
use crate::history::History;
use crate::prediction::Prediction;
use crate::similarity;

/// Shared state behind every handler. The engine is an immutable snapshot
/// behind an `RwLock<Arc<…>>`: a reload swaps the `Arc` atomically while
/// in-flight predictions keep the snapshot they started with.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<RwLock<Arc<PredictionEngine>>>,
    history: Arc<History>,
    config: Arc<EngineConfig>,
}

impl AppState {
    /// Build the initial engine snapshot from config-resolved assets.
    pub fn from_config(config: EngineConfig) -> anyhow::Result<Self> {
        let assets = EngineAssets::load(&config)?;
        let engine = PredictionEngine::new(assets, config.tuning);
        Ok(Self {
            engine: Arc::new(RwLock::new(Arc::new(engine))),
            history: Arc::new(History::with_capacity(2000)),
            config: Arc::new(config),
        })
    }

    fn snapshot(&self) -> Arc<PredictionEngine> {
        self.engine.read().expect("engine rwlock poisoned").clone()
    }

    pub fn disease_count(&self) -> usize {
        self.snapshot().disease_count()
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/predict", post(predict))
        .route("/debug/history", get(debug_history))
        .route("/debug/last-prediction", get(debug_last_prediction))
        .route("/debug/similarity", get(debug_similarity))
        .route("/admin/reload-assets", get(admin_reload_assets))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Deserialize)]
struct PredictReq {
    symptoms: Vec<String>,
}

async fn predict(
    State(state): State<AppState>,
    Json(body): Json<PredictReq>,
) -> Json<Vec<Prediction>> {
    let engine = state.snapshot();
    let results = engine.predict(&body.symptoms);
    state.history.push(body.symptoms.len(), &results);
    Json(results)
}

#[derive(serde::Serialize)]
struct HistoryOut {
    ts_unix: u64,
    disease: Option<String>,
    score: f32,
    confidence: Option<String>,
    symptoms: usize,
}

impl From<crate::history::HistoryEntry> for HistoryOut {
    fn from(h: crate::history::HistoryEntry) -> Self {
        Self {
            ts_unix: h.ts_unix,
            disease: h.top_disease,
            score: h.top_score,
            confidence: h.confidence.map(|c| format!("{c:?}")),
            symptoms: h.symptom_count,
        }
    }
}

async fn debug_history(State(state): State<AppState>) -> Json<Vec<HistoryOut>> {
    let rows = state.history.snapshot_last_n(10);
    Json(rows.into_iter().map(HistoryOut::from).collect())
}

async fn debug_last_prediction(State(state): State<AppState>) -> Json<Option<HistoryOut>> {
    let mut rows = state.history.snapshot_last_n(1);
    Json(rows.pop().map(HistoryOut::from))
}

async fn debug_similarity(Query(q): Query<HashMap<String, String>>) -> String {
    let a = q.get("a").cloned().unwrap_or_default();
    let b = q.get("b").cloned().unwrap_or_default();
    format!(
        "similarity('{}', '{}') = {:.3}",
        a,
        b,
        similarity::ratio(&a, &b)
    )
}

async fn admin_reload_assets(State(state): State<AppState>) -> String {
    let fresh = match EngineAssets::load(&state.config) {
        Ok(assets) => Arc::new(PredictionEngine::new(assets, state.config.tuning)),
        Err(e) => return format!("failed: {e}"),
    };
    match state.engine.write() {
        Ok(mut engine) => {
            *engine = fresh;
            "reloaded".to_string()
        }
        Err(_) => "failed: lock poisoned".to_string(),
    }
}
