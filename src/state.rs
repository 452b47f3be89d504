use crate::errors::TrackerError;
use crate::models::SaveResponse;
use crate::storage::Gateway;
use crate::tracker::Tracker;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub gateway: Gateway,
    pub tracker: Arc<Mutex<Tracker>>,
}

impl AppState {
    pub fn new(gateway: Gateway, tracker: Tracker) -> Self {
        Self {
            gateway,
            tracker: Arc::new(Mutex::new(tracker)),
        }
    }

    pub async fn load(gateway: Gateway, today: &str) -> Result<Self, TrackerError> {
        let records = gateway.load_records().await;
        let medications = gateway.load_medications().await;
        let mut tracker = Tracker::new();
        tracker.finish_loading(records, medications, today)?;
        Ok(Self::new(gateway, tracker))
    }

    // The commit and the write run on their own task, so a caller that goes
    // away mid-write cannot leave the tracker in `Saving`.
    pub async fn save_draft(&self) -> Result<SaveResponse, TrackerError> {
        let state = self.clone();
        let task = tokio::spawn(async move {
            let mut tracker = state.tracker.lock().await;
            let snapshot = tracker.begin_save()?;
            let persisted = state.gateway.save_records(&snapshot).await.is_ok();
            Ok::<_, TrackerError>(tracker.finish_save(persisted))
        });
        task.await.map_err(|err| TrackerError::SaveAborted(err.to_string()))?
    }
}
