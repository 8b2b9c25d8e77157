use crate::store::TabularStore;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared handler state. The mutex is the single-writer boundary for the CSV
/// files: every load/append holds it, so overlapping appends serialize
/// instead of racing on the read-modify-write.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<TabularStore>>,
}

impl AppState {
    pub fn new(store: TabularStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }
}
