use crate::state::AppState;
use axum::Router;
use axum::routing::{get, put};
use std::sync::{Arc, RwLock};

pub mod handlers;
pub mod responses;

pub fn router(state: Arc<RwLock<AppState>>) -> Router {
    Router::new()
        .route("/api/health", get(handlers::get_health))
        .route("/api/grid", get(handlers::get_grid))
        .route("/api/index", get(handlers::get_index))
        .route("/api/index/export.geojson", get(handlers::get_index_geojson))
        .route("/api/index/export.csv", get(handlers::get_index_csv))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/venues", get(handlers::get_venues))
        .route("/api/time", put(handlers::put_time))
        .route("/api/playback", put(handlers::put_playback))
        .with_state(state)
}
