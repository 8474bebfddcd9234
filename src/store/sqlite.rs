use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::DateTime;
use sqlx::{
    Pool, Sqlite,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::str::FromStr;
use tracing::{debug, info};

use super::{ListOrder, SurveyStore};
use crate::survey::{Choice, SurveyRecord};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS surveys (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL DEFAULT '',
    contact TEXT NOT NULL DEFAULT '',
    address TEXT NOT NULL DEFAULT '',
    preferred_party TEXT NOT NULL DEFAULT '',
    aap_candidate TEXT NOT NULL DEFAULT '',
    bjp_candidate TEXT NOT NULL DEFAULT '',
    congress_candidate TEXT NOT NULL DEFAULT '',
    other_party_candidate TEXT NOT NULL DEFAULT '',
    custom_preferred_party TEXT NOT NULL DEFAULT '',
    custom_aap_candidate TEXT NOT NULL DEFAULT '',
    custom_bjp_candidate TEXT NOT NULL DEFAULT '',
    submitted_at_ms INTEGER
)";

const SELECT_COLUMNS: &str = "SELECT id, name, contact, address, preferred_party, aap_candidate,
    bjp_candidate, congress_candidate, other_party_candidate, custom_preferred_party,
    custom_aap_candidate, custom_bjp_candidate, submitted_at_ms FROM surveys";

/// Persists surveys in a SQLite database.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Connects to `database_url` (e.g. `sqlite://survey.db` or
    /// `sqlite::memory:`), creating the file and table when missing.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid database url '{database_url}'"))?
            .create_if_missing(true);

        // Every connection to `:memory:` is its own database, so keep exactly
        // one alive for the lifetime of the pool.
        let pool_options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .with_context(|| format!("failed to connect to '{database_url}'"))?;

        sqlx::query(CREATE_TABLE)
            .execute(&pool)
            .await
            .context("failed to create surveys table")?;

        info!(database_url, "SQLite survey store ready");
        Ok(Self { pool })
    }
}

#[async_trait]
impl SurveyStore for SqliteStore {
    #[tracing::instrument(skip_all, fields(id = record.id.as_deref()))]
    async fn insert(&self, record: SurveyRecord) -> Result<SurveyRecord> {
        let id = record
            .id
            .as_deref()
            .ok_or_else(|| anyhow!("survey record has no id"))?;

        sqlx::query(
            "INSERT INTO surveys (id, name, contact, address, preferred_party, aap_candidate,
                bjp_candidate, congress_candidate, other_party_candidate, custom_preferred_party,
                custom_aap_candidate, custom_bjp_candidate, submitted_at_ms)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(&record.name)
        .bind(&record.contact)
        .bind(&record.address)
        .bind(record.preferred_party.raw())
        .bind(record.aap_candidate.raw())
        .bind(record.bjp_candidate.raw())
        .bind(&record.congress_candidate)
        .bind(&record.other_party_candidate)
        .bind(record.preferred_party.custom())
        .bind(record.aap_candidate.custom())
        .bind(record.bjp_candidate.custom())
        .bind(record.submitted_at.map(|at| at.timestamp_millis()))
        .execute(&self.pool)
        .await
        .context("failed to insert survey")?;

        debug!("Survey inserted");
        Ok(record)
    }

    #[tracing::instrument(skip(self))]
    async fn list(&self, order: ListOrder) -> Result<Vec<SurveyRecord>> {
        let order_by = match order {
            ListOrder::Stored => "ORDER BY rowid",
            ListOrder::NewestFirst => "ORDER BY submitted_at_ms DESC, rowid DESC",
        };

        let rows = sqlx::query_as::<_, SurveyRow>(&format!("{SELECT_COLUMNS} {order_by}"))
            .fetch_all(&self.pool)
            .await
            .context("failed to list surveys")?;

        debug!(record_count = rows.len(), "Surveys loaded");
        Ok(rows.into_iter().map(SurveyRecord::from).collect())
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, id: &str) -> Result<Option<SurveyRecord>> {
        let row = sqlx::query_as::<_, SurveyRow>(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("failed to load survey")?;

        Ok(row.map(SurveyRecord::from))
    }
}

// Internal entity for database mapping
#[derive(sqlx::FromRow)]
struct SurveyRow {
    id: String,
    name: String,
    contact: String,
    address: String,
    preferred_party: String,
    aap_candidate: String,
    bjp_candidate: String,
    congress_candidate: String,
    other_party_candidate: String,
    custom_preferred_party: String,
    custom_aap_candidate: String,
    custom_bjp_candidate: String,
    submitted_at_ms: Option<i64>,
}

impl From<SurveyRow> for SurveyRecord {
    fn from(row: SurveyRow) -> Self {
        Self {
            id: Some(row.id),
            name: row.name,
            contact: row.contact,
            address: row.address,
            preferred_party: Choice::from_raw(row.preferred_party, Some(row.custom_preferred_party)),
            aap_candidate: Choice::from_raw(row.aap_candidate, Some(row.custom_aap_candidate)),
            bjp_candidate: Choice::from_raw(row.bjp_candidate, Some(row.custom_bjp_candidate)),
            congress_candidate: row.congress_candidate,
            other_party_candidate: row.other_party_candidate,
            submitted_at: row.submitted_at_ms.and_then(DateTime::from_timestamp_millis),
        }
    }
}
