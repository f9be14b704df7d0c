use crate::controls::{self, ControlEvent, ViewState};
use crate::error::AppError;
use crate::index::{AggregationResult, HungerEngine};
use crate::timekey::TimeKey;
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::watch;

/// Outcome of the boundary parse, kept for health reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatasetSummary {
    pub venues: usize,
    pub skipped: usize,
}

/// The most recently published per-cell result.
#[derive(Debug, Clone)]
pub struct IndexSnapshot {
    pub time_key: TimeKey,
    pub result: Arc<AggregationResult>,
    pub computed_at: SystemTime,
}

#[derive(Debug)]
pub struct AppState {
    engine: Option<HungerEngine>,
    summary: DatasetSummary,
    view: ViewState,
    view_tx: watch::Sender<ViewState>,
    snapshot: Option<IndexSnapshot>,
    snapshot_tx: watch::Sender<Option<IndexSnapshot>>,
}

impl AppState {
    pub fn new(view: ViewState) -> Self {
        let (view_tx, _view_rx) = watch::channel(view);
        let (snapshot_tx, _snapshot_rx) = watch::channel(None);
        Self {
            engine: None,
            summary: DatasetSummary::default(),
            view,
            view_tx,
            snapshot: None,
            snapshot_tx,
        }
    }

    pub fn engine(&self) -> Option<&HungerEngine> {
        self.engine.as_ref()
    }

    pub fn engine_mut(&mut self) -> Option<&mut HungerEngine> {
        self.engine.as_mut()
    }

    pub fn set_engine(&mut self, engine: Option<HungerEngine>) {
        self.engine = engine;
    }

    pub fn summary(&self) -> DatasetSummary {
        self.summary
    }

    pub fn set_summary(&mut self, summary: DatasetSummary) {
        self.summary = summary;
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn subscribe_view(&self) -> watch::Receiver<ViewState> {
        self.view_tx.subscribe()
    }

    /// Apply a control event through the pure transition and publish the
    /// new view.
    pub fn apply_control(&mut self, event: ControlEvent) -> Result<ViewState, AppError> {
        let next = controls::apply(self.view, event);
        self.view = next;
        self.view_tx.send(next).map_err(|_| AppError::WatchSend)?;
        Ok(next)
    }

    pub fn snapshot(&self) -> Option<&IndexSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn subscribe_snapshot(&self) -> watch::Receiver<Option<IndexSnapshot>> {
        self.snapshot_tx.subscribe()
    }

    pub fn set_snapshot(&mut self, snapshot: IndexSnapshot) -> Result<(), AppError> {
        self.snapshot = Some(snapshot.clone());
        self.snapshot_tx
            .send(Some(snapshot))
            .map_err(|_| AppError::WatchSend)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ViewState::default())
    }
}
