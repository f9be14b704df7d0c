use hunger_grid::controls::ViewState;
use hunger_grid::dataset::Dataset;
use hunger_grid::state::{AppState, DatasetSummary};
use hunger_grid::{api, config, dataset, index, playback};
use std::net::SocketAddr;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, RwLock};
use time::OffsetDateTime;

fn init_tracing() {
    let subscriber = tracing_subscriber::fmt().with_target(false).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Start the view on the current weekday/hour, like the report does.
fn initial_view(interval_ms: u64) -> ViewState {
    let now = OffsetDateTime::now_utc();
    let mut view = ViewState::new(now.weekday().number_days_from_sunday(), now.hour());
    view.interval_ms = interval_ms;
    view
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    tracing::info!(
        config_path = config::DEFAULT_CONFIG_PATH,
        "hunger-grid starting"
    );
    let config = config::load_default()?;

    // Load the venue dataset
    let dataset = match config.dataset_path() {
        Some(path) => match dataset::geojson::load_from_path(path) {
            Ok(dataset) => {
                tracing::info!(
                    path = %path.display(),
                    venues = dataset.len(),
                    skipped = dataset.skipped,
                    "Dataset loaded"
                );
                dataset
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load dataset, starting empty");
                Dataset::default()
            }
        },
        None => {
            tracing::warn!("No dataset path configured in [dataset].path");
            Dataset::default()
        }
    };
    let summary = DatasetSummary {
        venues: dataset.len(),
        skipped: dataset.skipped,
    };

    // A misconfigured strategy is a startup error, not a silent fallback
    let normalizer = index::create_normalizer(&config.normalization())?;

    let grid_config = config.grid_config();
    let engine = index::HungerEngine::build(&dataset, &grid_config, normalizer);
    match &engine {
        Some(engine) => {
            let grid = engine.grid();
            tracing::info!(
                rows = grid.rows,
                cols = grid.cols,
                cells = grid.len(),
                cell_area_km2 = grid.cell_area_km2(),
                "Grid built"
            );
        }
        None => tracing::warn!("No valid venues in dataset; nothing to render"),
    }

    let state = Arc::new(RwLock::new(AppState::new(initial_view(
        config.playback_interval_ms(),
    ))));
    if let Ok(mut guard) = state.write() {
        guard.set_summary(summary);
        guard.set_engine(engine);
    } else {
        tracing::warn!("State lock poisoned while applying engine");
    }

    // Worker threads: throttled recompute + playback ticker
    let stop_flag = Arc::new(AtomicBool::new(false));
    tracing::info!(
        throttle_ms = config.throttle_window().as_millis(),
        "Starting recompute worker"
    );
    let _recompute_handle = index::spawn_recompute_thread(
        Arc::clone(&state),
        config.throttle_window(),
        Arc::clone(&stop_flag),
    );
    let _playback_handle =
        playback::spawn_playback_thread(Arc::clone(&state), Arc::clone(&stop_flag));

    let app = api::router(Arc::clone(&state));
    let port = config.server_port();
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, app).await?;

    // Signal worker threads to stop
    stop_flag.store(true, std::sync::atomic::Ordering::Relaxed);

    Ok(())
}
