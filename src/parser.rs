//! JSON parser for survey submissions.

use anyhow::{Context, Result, bail};
use serde_json::Value;

use crate::survey::SurveySubmission;

/// Decodes a survey submission from a JSON request body.
///
/// Every answer must be a string, `null`, or absent. Unknown keys are
/// ignored, including any client-supplied `id`, `submittedAt` or `createdAt`.
///
/// # Errors
///
/// Returns an error if the body is not a JSON object or any answer has a
/// non-string type.
pub fn parse_submission(bytes: &[u8]) -> Result<SurveySubmission> {
    let value: Value = serde_json::from_slice(bytes).context("invalid survey submission")?;
    if !value.is_object() {
        bail!("invalid survey submission: expected a JSON object");
    }
    serde_json::from_value(value).context("invalid survey submission")
}
