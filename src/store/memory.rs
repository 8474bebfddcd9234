use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{ListOrder, SurveyStore};
use crate::survey::SurveyRecord;

/// Keeps records in a vector for the lifetime of the process.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Vec<SurveyRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SurveyStore for MemoryStore {
    async fn insert(&self, record: SurveyRecord) -> Result<SurveyRecord> {
        let mut records = self.records.write().await;
        records.push(record.clone());
        debug!(record_count = records.len(), "Survey stored in memory");
        Ok(record)
    }

    async fn list(&self, order: ListOrder) -> Result<Vec<SurveyRecord>> {
        let records = self.records.read().await;
        match order {
            ListOrder::Stored => Ok(records.clone()),
            ListOrder::NewestFirst => {
                let mut sorted: Vec<_> = records.iter().rev().cloned().collect();
                sorted.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
                Ok(sorted)
            }
        }
    }

    async fn get(&self, id: &str) -> Result<Option<SurveyRecord>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .find(|r| r.id.as_deref() == Some(id))
            .cloned())
    }
}
