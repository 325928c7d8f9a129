use chrono::{DateTime, Utc};
use pqc_scan_core::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// Fixed progress checkpoints published by the pipeline.
pub mod checkpoint {
    pub const CLONE: f64 = 0.10;
    pub const LANGUAGE_ANALYSIS: f64 = 0.25;
    pub const SAST: f64 = 0.40;
    pub const SCA: f64 = 0.55;
    pub const CONFIG: f64 = 0.70;
    pub const PROCESSING: f64 = 0.85;
    pub const FINALIZING: f64 = 0.95;
    pub const COMPLETE: f64 = 1.0;
}

const MAX_MESSAGE_LEN: usize = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Queued,
    InProgress,
    Completed,
    Failed,
}

/// The mutable job record the HTTP façade reads while a scan runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub scan_id: Uuid,
    pub status: JobStatus,
    pub progress: f64,
    pub message: String,
    pub error_log: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl JobRecord {
    pub fn queued(scan_id: Uuid) -> Self {
        Self {
            scan_id,
            status: JobStatus::Queued,
            progress: 0.0,
            message: "Queued".to_string(),
            error_log: None,
            updated_at: Utc::now(),
        }
    }
}

/// Write-side contract against the external job store. The core only ever
/// writes; readers live behind the HTTP façade.
pub trait JobStore: Send + Sync {
    fn update_progress(&self, scan_id: Uuid, progress: f64, message: &str) -> Result<()>;
    fn complete(&self, scan_id: Uuid, message: &str) -> Result<()>;
    fn fail(&self, scan_id: Uuid, message: &str, error_log: Option<&str>) -> Result<()>;
}

fn clip_message(message: &str) -> String {
    if message.len() <= MAX_MESSAGE_LEN {
        message.to_string()
    } else {
        message.chars().take(MAX_MESSAGE_LEN).collect()
    }
}

/// In-memory job store backing the CLI and the test suites.
#[derive(Default)]
pub struct InMemoryJobStore {
    records: Mutex<HashMap<Uuid, JobRecord>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, scan_id: Uuid) -> Option<JobRecord> {
        self.records.lock().unwrap().get(&scan_id).cloned()
    }

    fn upsert(&self, scan_id: Uuid, update: impl FnOnce(&mut JobRecord)) {
        let mut records = self.records.lock().unwrap();
        let record = records
            .entry(scan_id)
            .or_insert_with(|| JobRecord::queued(scan_id));
        update(record);
        record.updated_at = Utc::now();
    }
}

impl JobStore for InMemoryJobStore {
    fn update_progress(&self, scan_id: Uuid, progress: f64, message: &str) -> Result<()> {
        self.upsert(scan_id, |record| {
            record.status = JobStatus::InProgress;
            record.progress = progress;
            record.message = clip_message(message);
        });
        Ok(())
    }

    fn complete(&self, scan_id: Uuid, message: &str) -> Result<()> {
        self.upsert(scan_id, |record| {
            record.status = JobStatus::Completed;
            record.progress = checkpoint::COMPLETE;
            record.message = clip_message(message);
        });
        Ok(())
    }

    fn fail(&self, scan_id: Uuid, message: &str, error_log: Option<&str>) -> Result<()> {
        self.upsert(scan_id, |record| {
            record.status = JobStatus::Failed;
            record.message = clip_message(message);
            record.error_log = error_log.map(|log| log.to_string());
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_updates_move_to_in_progress() {
        let store = InMemoryJobStore::new();
        let id = Uuid::new_v4();
        store
            .update_progress(id, checkpoint::CLONE, "Cloning repository...")
            .unwrap();

        let record = store.get(id).unwrap();
        assert_eq!(record.status, JobStatus::InProgress);
        assert_eq!(record.progress, 0.10);
        assert_eq!(record.message, "Cloning repository...");
    }

    #[test]
    fn complete_pins_progress_to_one() {
        let store = InMemoryJobStore::new();
        let id = Uuid::new_v4();
        store.update_progress(id, checkpoint::SAST, "SAST").unwrap();
        store.complete(id, "Completed").unwrap();

        let record = store.get(id).unwrap();
        assert_eq!(record.status, JobStatus::Completed);
        assert_eq!(record.progress, 1.0);
    }

    #[test]
    fn fail_keeps_last_progress_and_records_error_log() {
        let store = InMemoryJobStore::new();
        let id = Uuid::new_v4();
        store
            .update_progress(id, checkpoint::SCA, "Running SCA scanner...")
            .unwrap();
        store
            .fail(id, "Error: clone failed", Some("stderr output"))
            .unwrap();

        let record = store.get(id).unwrap();
        assert_eq!(record.status, JobStatus::Failed);
        assert_eq!(record.progress, checkpoint::SCA);
        assert_eq!(record.error_log.as_deref(), Some("stderr output"));
    }

    #[test]
    fn messages_are_clipped_to_record_capacity() {
        let store = InMemoryJobStore::new();
        let id = Uuid::new_v4();
        let long = "x".repeat(500);
        store.update_progress(id, 0.5, &long).unwrap();
        assert_eq!(store.get(id).unwrap().message.len(), 300);
    }

    #[test]
    fn status_serializes_screaming_case() {
        assert_eq!(
            serde_json::to_string(&JobStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
    }
}
