//! Survey use cases: submit, browse, tabulate and export.

use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::analysis::{Tabulation, aggregate};
use crate::export::project_to_csv;
use crate::store::{ListOrder, SurveyStore};
use crate::survey::{SurveyRecord, SurveySubmission};

/// Wires the record store to the tabulation and export routines.
#[derive(Clone)]
pub struct SurveyService {
    store: Arc<dyn SurveyStore>,
}

impl SurveyService {
    pub fn new(store: Arc<dyn SurveyStore>) -> Self {
        Self { store }
    }

    /// Stores a new submission under a fresh id, stamped with the current time.
    #[tracing::instrument(skip_all)]
    pub async fn submit(&self, submission: SurveySubmission) -> Result<SurveyRecord> {
        let record = SurveyRecord::create(submission, Uuid::new_v4().to_string(), Utc::now());
        let record = self.store.insert(record).await?;
        info!(id = record.id.as_deref(), "Survey submitted");
        Ok(record)
    }

    /// All surveys, newest first.
    pub async fn list(&self) -> Result<Vec<SurveyRecord>> {
        self.store.list(ListOrder::NewestFirst).await
    }

    pub async fn get(&self, id: &str) -> Result<Option<SurveyRecord>> {
        self.store.get(id).await
    }

    /// Tabulates every stored survey.
    #[tracing::instrument(skip_all)]
    pub async fn analysis(&self) -> Result<Tabulation> {
        let records = self.store.list(ListOrder::Stored).await?;
        let tabulation = aggregate(&records);
        info!(total_responses = tabulation.total_responses, "Analysis generated");
        Ok(tabulation)
    }

    /// CSV export of every stored survey, newest first.
    #[tracing::instrument(skip_all)]
    pub async fn export_csv(&self) -> Result<String> {
        let records = self.store.list(ListOrder::NewestFirst).await?;
        let csv = project_to_csv(&records)?;
        info!(rows = records.len(), "CSV export generated");
        Ok(csv)
    }
}
