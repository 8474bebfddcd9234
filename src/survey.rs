//! Survey record model.
//!
//! [`SurveyDocument`] is the wire/storage shape: every field optional, the
//! "Other" selections still encoded as a sentinel string plus a side table of
//! overrides. [`SurveyRecord`] is the shape the rest of the crate works with,
//! where each overridable field has already been resolved into a [`Choice`].
//! [`SurveySubmission`] is what a client may send: answers only, since the id
//! and timestamp are always assigned server-side.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw value a categorical field holds when the respondent picked "Other".
pub const OTHER_SENTINEL: &str = "Other / अन्य";

/// A categorical answer that may defer to a free-text override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    /// One of the listed options (possibly empty when unanswered).
    Fixed(String),
    /// "Other" was selected; holds the override text, possibly empty.
    Other(String),
}

impl Default for Choice {
    fn default() -> Self {
        Choice::Fixed(String::new())
    }
}

impl Choice {
    /// Builds a choice from the raw field and its (optional) override.
    pub fn from_raw(raw: String, custom: Option<String>) -> Self {
        if raw == OTHER_SENTINEL {
            Choice::Other(custom.unwrap_or_default())
        } else {
            Choice::Fixed(raw)
        }
    }

    /// Effective value of the answer. `fallback` is used when "Other" was
    /// selected without any override text.
    pub fn resolve<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self {
            Choice::Fixed(label) => label,
            Choice::Other(custom) if custom.is_empty() => fallback,
            Choice::Other(custom) => custom,
        }
    }

    /// The raw field value as submitted.
    pub fn raw(&self) -> &str {
        match self {
            Choice::Fixed(label) => label,
            Choice::Other(_) => OTHER_SENTINEL,
        }
    }

    /// The override text, if "Other" was selected.
    pub fn custom(&self) -> &str {
        match self {
            Choice::Fixed(_) => "",
            Choice::Other(custom) => custom,
        }
    }
}

/// Free-text overrides for the "Other" selections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomOverrides {
    pub preferred_party: Option<String>,
    pub aap_candidate: Option<String>,
    pub bjp_candidate: Option<String>,
}

/// Wire and storage form of a survey.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub preferred_party: Option<String>,
    #[serde(default)]
    pub aap_candidate: Option<String>,
    #[serde(default)]
    pub bjp_candidate: Option<String>,
    #[serde(default)]
    pub congress_candidate: Option<String>,
    #[serde(default)]
    pub other_party_candidate: Option<String>,
    #[serde(default, alias = "customInputs")]
    pub custom_overrides: Option<CustomOverrides>,
    #[serde(default, alias = "createdAt")]
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Answers posted by a respondent.
///
/// Has no id or timestamp fields, so any `id`, `submittedAt` or `createdAt`
/// key in a request body is skipped like every other unknown key.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveySubmission {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub preferred_party: Option<String>,
    #[serde(default)]
    pub aap_candidate: Option<String>,
    #[serde(default)]
    pub bjp_candidate: Option<String>,
    #[serde(default)]
    pub congress_candidate: Option<String>,
    #[serde(default)]
    pub other_party_candidate: Option<String>,
    #[serde(default, alias = "customInputs")]
    pub custom_overrides: Option<CustomOverrides>,
}

impl From<SurveySubmission> for SurveyDocument {
    fn from(submission: SurveySubmission) -> Self {
        SurveyDocument {
            id: None,
            name: submission.name,
            contact: submission.contact,
            address: submission.address,
            preferred_party: submission.preferred_party,
            aap_candidate: submission.aap_candidate,
            bjp_candidate: submission.bjp_candidate,
            congress_candidate: submission.congress_candidate,
            other_party_candidate: submission.other_party_candidate,
            custom_overrides: submission.custom_overrides,
            submitted_at: None,
        }
    }
}

/// One respondent's answers plus the submission timestamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "SurveyDocument", into = "SurveyDocument")]
pub struct SurveyRecord {
    pub id: Option<String>,
    pub name: String,
    pub contact: String,
    pub address: String,
    pub preferred_party: Choice,
    pub aap_candidate: Choice,
    pub bjp_candidate: Choice,
    pub congress_candidate: String,
    pub other_party_candidate: String,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl SurveyRecord {
    /// Stamps a freshly parsed submission with its id and creation time.
    ///
    /// The timestamp is truncated to whole milliseconds so every store keeps
    /// the same value.
    pub fn create(submission: SurveySubmission, id: String, now: DateTime<Utc>) -> Self {
        let submitted_at = DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now);
        SurveyRecord {
            id: Some(id),
            submitted_at: Some(submitted_at),
            ..SurveyRecord::from(SurveyDocument::from(submission))
        }
    }
}

impl From<SurveyDocument> for SurveyRecord {
    fn from(doc: SurveyDocument) -> Self {
        let custom = doc.custom_overrides.unwrap_or_default();
        SurveyRecord {
            id: doc.id,
            name: doc.name.unwrap_or_default(),
            contact: doc.contact.unwrap_or_default(),
            address: doc.address.unwrap_or_default(),
            preferred_party: Choice::from_raw(
                doc.preferred_party.unwrap_or_default(),
                custom.preferred_party,
            ),
            aap_candidate: Choice::from_raw(
                doc.aap_candidate.unwrap_or_default(),
                custom.aap_candidate,
            ),
            bjp_candidate: Choice::from_raw(
                doc.bjp_candidate.unwrap_or_default(),
                custom.bjp_candidate,
            ),
            congress_candidate: doc.congress_candidate.unwrap_or_default(),
            other_party_candidate: doc.other_party_candidate.unwrap_or_default(),
            submitted_at: doc.submitted_at,
        }
    }
}

impl From<SurveyRecord> for SurveyDocument {
    fn from(record: SurveyRecord) -> Self {
        SurveyDocument {
            id: record.id,
            name: Some(record.name),
            contact: Some(record.contact),
            address: Some(record.address),
            preferred_party: Some(record.preferred_party.raw().to_string()),
            aap_candidate: Some(record.aap_candidate.raw().to_string()),
            bjp_candidate: Some(record.bjp_candidate.raw().to_string()),
            congress_candidate: Some(record.congress_candidate),
            other_party_candidate: Some(record.other_party_candidate),
            custom_overrides: Some(CustomOverrides {
                preferred_party: Some(record.preferred_party.custom().to_string()),
                aap_candidate: Some(record.aap_candidate.custom().to_string()),
                bjp_candidate: Some(record.bjp_candidate.custom().to_string()),
            }),
            submitted_at: record.submitted_at,
        }
    }
}
