use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use moka::sync::Cache;
use serde::Serialize;
use uuid::Uuid;

use crate::screening::AnalysisResult;

const MAX_STORED_ANALYSES: u64 = 1_000;

/// A completed analysis kept for later retrieval.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAnalysis {
    pub id: Uuid,
    pub stored_at: DateTime<Utc>,
    pub result: AnalysisResult,
}

/// Ephemeral in-process store of finished analyses. Entries expire after the TTL
/// and are lost on restart.
#[derive(Clone)]
pub struct AnalysisStore {
    cache: Cache<Uuid, Arc<StoredAnalysis>>,
}

impl AnalysisStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(MAX_STORED_ANALYSES)
                .time_to_live(ttl)
                .build(),
        }
    }

    pub fn save(&self, result: AnalysisResult) -> Uuid {
        let id = Uuid::new_v4();
        let stored = StoredAnalysis {
            id,
            stored_at: Utc::now(),
            result,
        };
        self.cache.insert(id, Arc::new(stored));
        id
    }

    pub fn get(&self, id: &Uuid) -> Option<Arc<StoredAnalysis>> {
        self.cache.get(id)
    }
}
