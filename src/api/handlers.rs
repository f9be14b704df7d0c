use crate::api::responses::{
    ControlErrorCode, ControlErrorResponse, GridErrorCode, GridErrorResponse, HealthErrorCode,
    HealthErrorResponse, HealthStatus, HealthSuccessResponse, IndexCell, IndexErrorCode,
    IndexErrorResponse, IndexSuccessResponse, StatsErrorCode, StatsErrorResponse,
    StatsSuccessResponse, VenueWeight, VenuesErrorCode, VenuesErrorResponse,
    VenuesSuccessResponse, ViewResponse,
};
use crate::controls::ControlEvent;
use crate::export;
use crate::state::AppState;
use crate::timekey::TimeKey;
use axum::Json;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::SystemTime;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::error;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";
const NO_GRID_MESSAGE: &str = "No grid available";

#[derive(Debug)]
enum TimestampError {
    Format(time::error::Format),
}

impl fmt::Display for TimestampError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimestampError::Format(err) => write!(f, "timestamp format error: {err}"),
        }
    }
}

fn format_timestamp(timestamp: SystemTime) -> Result<String, TimestampError> {
    let datetime = OffsetDateTime::from(timestamp);
    datetime.format(&Rfc3339).map_err(TimestampError::Format)
}

fn now_timestamp() -> String {
    format_timestamp(SystemTime::now()).unwrap_or_else(|err| {
        error!(error = %err, "Failed to format error timestamp");
        OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
    })
}

/// Optional day/hour override; omitted fields fall back to the current view.
#[derive(Debug, Deserialize)]
pub struct TimeQuery {
    pub day: Option<u8>,
    pub hour: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub struct TimeRequest {
    pub day: u8,
    pub hour: u8,
}

#[derive(Debug, Deserialize)]
pub struct PlaybackRequest {
    pub playing: bool,
    pub interval_ms: Option<u64>,
}

// /api/health

pub enum HealthResponse {
    Success {
        status: StatusCode,
        body: HealthSuccessResponse,
    },
    Error {
        status: StatusCode,
        body: HealthErrorResponse,
    },
}

impl IntoResponse for HealthResponse {
    fn into_response(self) -> Response {
        match self {
            HealthResponse::Success { status, body } => (status, Json(body)).into_response(),
            HealthResponse::Error { status, body } => (status, Json(body)).into_response(),
        }
    }
}

pub async fn get_health(State(state): State<Arc<RwLock<AppState>>>) -> impl IntoResponse {
    build_health_response(state, SystemTime::now())
}

fn build_health_response(state: Arc<RwLock<AppState>>, now: SystemTime) -> HealthResponse {
    let guard = match state.read() {
        Ok(guard) => guard,
        Err(_) => {
            return health_internal_error("state lock poisoned while reading health");
        }
    };
    let summary = guard.summary();
    let has_grid = guard.engine().is_some();
    drop(guard);

    let status = if !has_grid {
        HealthStatus::Ko
    } else if summary.skipped > 0 {
        HealthStatus::Degraded
    } else {
        HealthStatus::Ok
    };

    let timestamp = match format_timestamp(now) {
        Ok(formatted) => formatted,
        Err(_) => {
            return health_internal_error("timestamp formatting failure");
        }
    };

    let status_code = match status {
        HealthStatus::Ko => StatusCode::SERVICE_UNAVAILABLE,
        HealthStatus::Ok | HealthStatus::Degraded => StatusCode::OK,
    };

    HealthResponse::Success {
        status: status_code,
        body: HealthSuccessResponse {
            status,
            venues: summary.venues,
            skipped_features: summary.skipped,
            timestamp,
        },
    }
}

fn health_internal_error(message: &str) -> HealthResponse {
    error!(message = message, "Internal error while handling /api/health");
    HealthResponse::Error {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: HealthErrorResponse {
            error_code: HealthErrorCode::InternalError,
            error_message: INTERNAL_ERROR_MESSAGE.to_string(),
            timestamp: now_timestamp(),
        },
    }
}

// /api/grid and the export endpoints

pub enum GridResponse {
    Success(Value),
    Csv(String),
    Error {
        status: StatusCode,
        body: GridErrorResponse,
    },
}

impl IntoResponse for GridResponse {
    fn into_response(self) -> Response {
        match self {
            GridResponse::Success(body) => (StatusCode::OK, Json(body)).into_response(),
            GridResponse::Csv(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/csv")],
                body,
            )
                .into_response(),
            GridResponse::Error { status, body } => (status, Json(body)).into_response(),
        }
    }
}

pub async fn get_grid(State(state): State<Arc<RwLock<AppState>>>) -> impl IntoResponse {
    build_grid_response(state)
}

fn build_grid_response(state: Arc<RwLock<AppState>>) -> GridResponse {
    let guard = match state.read() {
        Ok(guard) => guard,
        Err(_) => {
            return grid_internal_error("state lock poisoned while reading grid");
        }
    };
    match guard.engine() {
        Some(engine) => GridResponse::Success(export::grid_feature_collection(engine.grid(), None)),
        None => grid_no_data(),
    }
}

pub async fn get_index_geojson(State(state): State<Arc<RwLock<AppState>>>) -> impl IntoResponse {
    build_index_geojson_response(state)
}

fn build_index_geojson_response(state: Arc<RwLock<AppState>>) -> GridResponse {
    let mut guard = match state.write() {
        Ok(guard) => guard,
        Err(_) => {
            return grid_internal_error("state lock poisoned while exporting GeoJSON");
        }
    };
    let key = guard.view().time_key();
    match guard.engine_mut() {
        Some(engine) => {
            let result = engine.index_at(key);
            GridResponse::Success(export::grid_feature_collection(
                engine.grid(),
                Some(&result.index),
            ))
        }
        None => grid_no_data(),
    }
}

pub async fn get_index_csv(State(state): State<Arc<RwLock<AppState>>>) -> impl IntoResponse {
    build_index_csv_response(state)
}

fn build_index_csv_response(state: Arc<RwLock<AppState>>) -> GridResponse {
    let mut guard = match state.write() {
        Ok(guard) => guard,
        Err(_) => {
            return grid_internal_error("state lock poisoned while exporting CSV");
        }
    };
    let key = guard.view().time_key();
    match guard.engine_mut() {
        Some(engine) => {
            let result = engine.index_at(key);
            GridResponse::Csv(export::index_csv(&result.index))
        }
        None => grid_no_data(),
    }
}

fn grid_no_data() -> GridResponse {
    GridResponse::Error {
        status: StatusCode::SERVICE_UNAVAILABLE,
        body: GridErrorResponse {
            error_code: GridErrorCode::NoData,
            error_message: NO_GRID_MESSAGE.to_string(),
            timestamp: now_timestamp(),
        },
    }
}

fn grid_internal_error(message: &str) -> GridResponse {
    error!(message = message, "Internal error while handling a grid endpoint");
    GridResponse::Error {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: GridErrorResponse {
            error_code: GridErrorCode::InternalError,
            error_message: INTERNAL_ERROR_MESSAGE.to_string(),
            timestamp: now_timestamp(),
        },
    }
}

// /api/index

pub enum IndexResponse {
    Success(IndexSuccessResponse),
    Error {
        status: StatusCode,
        body: IndexErrorResponse,
    },
}

impl IntoResponse for IndexResponse {
    fn into_response(self) -> Response {
        match self {
            IndexResponse::Success(body) => (StatusCode::OK, Json(body)).into_response(),
            IndexResponse::Error { status, body } => (status, Json(body)).into_response(),
        }
    }
}

pub async fn get_index(
    State(state): State<Arc<RwLock<AppState>>>,
    Query(query): Query<TimeQuery>,
) -> impl IntoResponse {
    build_index_response(state, query, SystemTime::now())
}

fn build_index_response(
    state: Arc<RwLock<AppState>>,
    query: TimeQuery,
    now: SystemTime,
) -> IndexResponse {
    let mut guard = match state.write() {
        Ok(guard) => guard,
        Err(_) => {
            return index_internal_error("state lock poisoned while computing index");
        }
    };
    let view = guard.view();
    let key = TimeKey::new(
        query.day.unwrap_or(view.day),
        query.hour.unwrap_or(view.hour),
    );
    let Some(engine) = guard.engine_mut() else {
        return IndexResponse::Error {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: IndexErrorResponse {
                error_code: IndexErrorCode::NoData,
                error_message: NO_GRID_MESSAGE.to_string(),
                timestamp: now_timestamp(),
            },
        };
    };
    let result = engine.index_at(key);
    drop(guard);

    let timestamp = match format_timestamp(now) {
        Ok(formatted) => formatted,
        Err(_) => {
            return index_internal_error("timestamp formatting failure");
        }
    };

    let cells = result
        .index
        .iter()
        .enumerate()
        .map(|(id, &hunger01)| IndexCell { id, hunger01 })
        .collect();
    let non_empty_cells = result.counts.iter().filter(|&&count| count > 0.0).count();

    IndexResponse::Success(IndexSuccessResponse {
        day: key.day(),
        hour: key.hour(),
        time_index: key.index(),
        cells,
        non_empty_cells,
        timestamp,
    })
}

fn index_internal_error(message: &str) -> IndexResponse {
    error!(message = message, "Internal error while handling /api/index");
    IndexResponse::Error {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: IndexErrorResponse {
            error_code: IndexErrorCode::InternalError,
            error_message: INTERNAL_ERROR_MESSAGE.to_string(),
            timestamp: now_timestamp(),
        },
    }
}

// /api/stats

pub enum StatsResponse {
    Success(StatsSuccessResponse),
    Error {
        status: StatusCode,
        body: StatsErrorResponse,
    },
}

impl IntoResponse for StatsResponse {
    fn into_response(self) -> Response {
        match self {
            StatsResponse::Success(body) => (StatusCode::OK, Json(body)).into_response(),
            StatsResponse::Error { status, body } => (status, Json(body)).into_response(),
        }
    }
}

pub async fn get_stats(State(state): State<Arc<RwLock<AppState>>>) -> impl IntoResponse {
    build_stats_response(state, SystemTime::now())
}

fn build_stats_response(state: Arc<RwLock<AppState>>, now: SystemTime) -> StatsResponse {
    let mut guard = match state.write() {
        Ok(guard) => guard,
        Err(_) => {
            return stats_internal_error("state lock poisoned while reading stats");
        }
    };
    let summary = guard.summary();
    let key = guard.view().time_key();
    let (cells, non_empty_cells, cell_area_km2) = match guard.engine_mut() {
        Some(engine) => {
            let result = engine.index_at(key);
            let grid = engine.grid();
            let non_empty = result.counts.iter().filter(|&&count| count > 0.0).count();
            (grid.len(), non_empty, Some(grid.cell_area_km2()))
        }
        None => (0, 0, None),
    };
    drop(guard);

    let timestamp = match format_timestamp(now) {
        Ok(formatted) => formatted,
        Err(_) => {
            return stats_internal_error("timestamp formatting failure");
        }
    };

    StatsResponse::Success(StatsSuccessResponse {
        venues: summary.venues,
        skipped_features: summary.skipped,
        cells,
        non_empty_cells,
        cell_area_km2,
        timestamp,
    })
}

fn stats_internal_error(message: &str) -> StatsResponse {
    error!(message = message, "Internal error while handling /api/stats");
    StatsResponse::Error {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: StatsErrorResponse {
            error_code: StatsErrorCode::InternalError,
            error_message: INTERNAL_ERROR_MESSAGE.to_string(),
            timestamp: now_timestamp(),
        },
    }
}

// /api/venues

pub enum VenuesResponse {
    Success(VenuesSuccessResponse),
    Error {
        status: StatusCode,
        body: VenuesErrorResponse,
    },
}

impl IntoResponse for VenuesResponse {
    fn into_response(self) -> Response {
        match self {
            VenuesResponse::Success(body) => (StatusCode::OK, Json(body)).into_response(),
            VenuesResponse::Error { status, body } => (status, Json(body)).into_response(),
        }
    }
}

pub async fn get_venues(
    State(state): State<Arc<RwLock<AppState>>>,
    Query(query): Query<TimeQuery>,
) -> impl IntoResponse {
    build_venues_response(state, query, SystemTime::now())
}

fn build_venues_response(
    state: Arc<RwLock<AppState>>,
    query: TimeQuery,
    now: SystemTime,
) -> VenuesResponse {
    let mut guard = match state.write() {
        Ok(guard) => guard,
        Err(_) => {
            return venues_internal_error("state lock poisoned while reading venues");
        }
    };
    let view = guard.view();
    let key = TimeKey::new(
        query.day.unwrap_or(view.day),
        query.hour.unwrap_or(view.hour),
    );
    let Some(engine) = guard.engine_mut() else {
        return VenuesResponse::Error {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: VenuesErrorResponse {
                error_code: VenuesErrorCode::NoData,
                error_message: NO_GRID_MESSAGE.to_string(),
                timestamp: now_timestamp(),
            },
        };
    };
    let weights = engine.weights_at(key);
    let venues: Vec<VenueWeight> = engine
        .venues()
        .iter()
        .enumerate()
        .map(|(index, venue)| VenueWeight {
            id: venue.venue_id.unwrap_or(index as u64),
            name: venue.name.clone(),
            lon: venue.lon,
            lat: venue.lat,
            w: weights.get(index).copied().unwrap_or(0.0),
        })
        .collect();
    drop(guard);

    let timestamp = match format_timestamp(now) {
        Ok(formatted) => formatted,
        Err(_) => {
            return venues_internal_error("timestamp formatting failure");
        }
    };

    VenuesResponse::Success(VenuesSuccessResponse {
        day: key.day(),
        hour: key.hour(),
        venues,
        timestamp,
    })
}

fn venues_internal_error(message: &str) -> VenuesResponse {
    error!(message = message, "Internal error while handling /api/venues");
    VenuesResponse::Error {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: VenuesErrorResponse {
            error_code: VenuesErrorCode::InternalError,
            error_message: INTERNAL_ERROR_MESSAGE.to_string(),
            timestamp: now_timestamp(),
        },
    }
}

// /api/time and /api/playback

pub enum ControlResponse {
    Success(ViewResponse),
    Error {
        status: StatusCode,
        body: ControlErrorResponse,
    },
}

impl IntoResponse for ControlResponse {
    fn into_response(self) -> Response {
        match self {
            ControlResponse::Success(body) => (StatusCode::OK, Json(body)).into_response(),
            ControlResponse::Error { status, body } => (status, Json(body)).into_response(),
        }
    }
}

pub async fn put_time(
    State(state): State<Arc<RwLock<AppState>>>,
    Json(request): Json<TimeRequest>,
) -> impl IntoResponse {
    apply_control_events(
        state,
        vec![ControlEvent::SetTime {
            day: request.day,
            hour: request.hour,
        }],
        SystemTime::now(),
    )
}

pub async fn put_playback(
    State(state): State<Arc<RwLock<AppState>>>,
    Json(request): Json<PlaybackRequest>,
) -> impl IntoResponse {
    let mut events = Vec::new();
    if let Some(interval_ms) = request.interval_ms {
        events.push(ControlEvent::SetSpeed(interval_ms));
    }
    events.push(if request.playing {
        ControlEvent::Play
    } else {
        ControlEvent::Pause
    });
    apply_control_events(state, events, SystemTime::now())
}

fn apply_control_events(
    state: Arc<RwLock<AppState>>,
    events: Vec<ControlEvent>,
    now: SystemTime,
) -> ControlResponse {
    let mut guard = match state.write() {
        Ok(guard) => guard,
        Err(_) => {
            return control_internal_error("state lock poisoned while applying controls");
        }
    };
    let mut view = guard.view();
    for event in events {
        view = match guard.apply_control(event) {
            Ok(next) => next,
            Err(_) => {
                return control_internal_error("view watch channel closed");
            }
        };
    }
    drop(guard);

    let timestamp = match format_timestamp(now) {
        Ok(formatted) => formatted,
        Err(_) => {
            return control_internal_error("timestamp formatting failure");
        }
    };

    ControlResponse::Success(ViewResponse {
        day: view.day,
        hour: view.hour,
        playing: view.playing,
        interval_ms: view.interval_ms,
        timestamp,
    })
}

fn control_internal_error(message: &str) -> ControlResponse {
    error!(message = message, "Internal error while applying controls");
    ControlResponse::Error {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: ControlErrorResponse {
            error_code: ControlErrorCode::InternalError,
            error_message: INTERNAL_ERROR_MESSAGE.to_string(),
            timestamp: now_timestamp(),
        },
    }
}
