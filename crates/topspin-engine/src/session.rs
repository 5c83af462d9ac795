//! In-memory session tracking.
//!
//! The engine owns one `SessionStore` and callers query it for the state
//! of in-flight and finished analyses. Records live in an explicit shared
//! map rather than any process-global registry, so two engines in one
//! process never observe each other's sessions.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use topspin_models::{AnalysisId, AnalysisRecord, AnalysisRequest, AnalysisState};

/// Shared store of analysis lifecycle records.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    records: Arc<RwLock<HashMap<AnalysisId, AnalysisRecord>>>,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a request as queued and return the created record.
    pub async fn insert(&self, request: &AnalysisRequest) -> AnalysisRecord {
        let record = AnalysisRecord::new(request);
        self.records
            .write()
            .await
            .insert(record.id.clone(), record.clone());
        record
    }

    /// Advance a session to `state`. Unknown ids are ignored.
    pub async fn advance(&self, id: &AnalysisId, state: AnalysisState) {
        if let Some(record) = self.records.write().await.get_mut(id) {
            record.advance(state);
        }
    }

    /// Mark a session failed with a message. Unknown ids are ignored.
    pub async fn fail(&self, id: &AnalysisId, message: impl Into<String>) {
        if let Some(record) = self.records.write().await.get_mut(id) {
            record.fail(message);
        }
    }

    /// Snapshot of one session's record.
    pub async fn get(&self, id: &AnalysisId) -> Option<AnalysisRecord> {
        self.records.read().await.get(id).cloned()
    }

    /// Drop a finished session's record, returning it if present.
    pub async fn remove(&self, id: &AnalysisId) -> Option<AnalysisRecord> {
        self.records.write().await.remove(id)
    }
}
