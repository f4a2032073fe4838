//! API Handlers
//!
//! HTTP request handlers for each cache endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use crate::cache::{CacheCoordinator, TtlPolicy};
use crate::config::{CacheConfiguration, Config};
use crate::error::Result;
use crate::models::{
    DeleteResponse, ErrorResponse, ExistsResponse, GetResponse, HealthResponse, SetRequest,
    SetResponse, SlidingToggleRequest, SlidingToggleResponse, StatsResponse, TtlResponse,
};
use crate::store::MemoryStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<CacheCoordinator>,
    /// Same store the coordinator writes to, kept for stats and the sweep task
    pub store: Arc<MemoryStore>,
}

impl AppState {
    pub fn new(store: Arc<MemoryStore>, config: Arc<CacheConfiguration>) -> Self {
        let cache = Arc::new(CacheCoordinator::new(store.clone(), config));
        Self { cache, store }
    }

    /// Builds the store and coordinator from process configuration.
    pub fn from_config(config: &Config) -> Self {
        let store = Arc::new(MemoryStore::from_settings(&config.store));
        let cache_config = Arc::new(CacheConfiguration::new(config.cache.clone()));
        Self::new(store, cache_config)
    }
}

/// Handler for PUT /set
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    let value = req.value.into_bytes();
    match req.expiration {
        Some(expiration) => {
            state
                .cache
                .set(&req.key, value, TtlPolicy::from(expiration))
                .await?
        }
        None => state.cache.set_default(&req.key, value).await?,
    }

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /get/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response> {
    let response = match state.cache.get(&key).await? {
        Some(value) => Json(GetResponse::new(key, &value)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!("Key not found: {}", key))),
        )
            .into_response(),
    };
    Ok(response)
}

/// Handler for DELETE /del/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let removed = state.cache.remove(&key).await?;
    Ok(Json(DeleteResponse { key, removed }))
}

/// Handler for GET /exists/:key
pub async fn exists_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ExistsResponse>> {
    let exists = state.cache.exists(&key).await?;
    Ok(Json(ExistsResponse { key, exists }))
}

/// Handler for GET /ttl/:key
pub async fn ttl_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<TtlResponse>> {
    let status = state.cache.time_to_live(&key).await?;
    Ok(Json(TtlResponse::new(key, status)))
}

/// Handler for GET /config/sliding
pub async fn get_sliding_handler(State(state): State<AppState>) -> Json<SlidingToggleResponse> {
    Json(SlidingToggleResponse {
        enabled: state.cache.config().is_sliding_expiration_enabled(),
    })
}

/// Handler for PUT /config/sliding
pub async fn put_sliding_handler(
    State(state): State<AppState>,
    Json(req): Json<SlidingToggleRequest>,
) -> Json<SlidingToggleResponse> {
    let previous = state.cache.config().set_sliding_expiration(req.enabled);
    if previous != req.enabled {
        info!("Sliding expiration switched {}", if req.enabled { "on" } else { "off" });
    }
    Json(SlidingToggleResponse {
        enabled: req.enabled,
    })
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.stats();
    Json(StatsResponse::new(
        &stats,
        state.store.evictions().await,
        state.store.len().await,
        state.cache.config().is_sliding_expiration_enabled(),
    ))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
