use pqc_scan_core::{Result, ScanOutcome};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// Persistence contract: everything a scan produced lands in one
/// transaction with replace-all semantics per scan, so readers never see a
/// partially written snapshot.
pub trait ScanStore: Send + Sync {
    fn replace_scan(&self, scan_id: Uuid, outcome: &ScanOutcome) -> Result<()>;
}

/// In-memory store backing the CLI and the test suites.
#[derive(Default)]
pub struct InMemoryScanStore {
    scans: Mutex<HashMap<Uuid, ScanOutcome>>,
}

impl InMemoryScanStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, scan_id: Uuid) -> Option<ScanOutcome> {
        self.scans.lock().unwrap().get(&scan_id).cloned()
    }
}

impl ScanStore for InMemoryScanStore {
    fn replace_scan(&self, scan_id: Uuid, outcome: &ScanOutcome) -> Result<()> {
        self.scans.lock().unwrap().insert(scan_id, outcome.clone());
        Ok(())
    }
}
