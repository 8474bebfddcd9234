//! Survey persistence.
//!
//! [`SurveyStore`] is the async trait the service layer talks to.
//! [`MemoryStore`] keeps records in process memory; [`SqliteStore`] persists
//! them through a `sqlx` SQLite pool.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::survey::SurveyRecord;

/// Database URL that selects the in-memory store.
pub const MEMORY_URL: &str = "memory";

/// Order in which [`SurveyStore::list`] returns records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOrder {
    /// Insertion order.
    Stored,
    /// Most recent `submitted_at` first; later inserts win ties and records
    /// without a timestamp come last.
    NewestFirst,
}

#[async_trait]
pub trait SurveyStore: Send + Sync {
    /// Persists a record that already carries its id and timestamp.
    async fn insert(&self, record: SurveyRecord) -> Result<SurveyRecord>;

    /// Loads every stored record.
    async fn list(&self, order: ListOrder) -> Result<Vec<SurveyRecord>>;

    /// Loads a single record by id.
    async fn get(&self, id: &str) -> Result<Option<SurveyRecord>>;
}

/// Opens the store named by `database_url`.
pub async fn open(database_url: &str) -> Result<Arc<dyn SurveyStore>> {
    if database_url == MEMORY_URL {
        return Ok(Arc::new(MemoryStore::new()));
    }
    Ok(Arc::new(SqliteStore::connect(database_url).await?))
}
