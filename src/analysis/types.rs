//! Result types produced by the tabulation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::analysis::utility::calculate_percentage;

/// A count and its share of all responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountShare {
    pub count: usize,
    pub percentage: String,
}

impl CountShare {
    /// `count` paired with its percentage of `total`.
    pub fn of(count: usize, total: usize) -> Self {
        CountShare {
            count,
            percentage: calculate_percentage(count, total),
        }
    }
}

/// How many respondents left their personal details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Demographics {
    #[serde(rename = "totalWithName")]
    pub with_name: CountShare,
    #[serde(rename = "totalWithContact")]
    pub with_contact: CountShare,
    #[serde(rename = "totalWithAddress")]
    pub with_address: CountShare,
}

/// Complete breakdown of a set of survey responses.
///
/// The category maps are keyed by effective answer. Their iteration order
/// carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tabulation {
    pub total_responses: usize,
    pub demographics: Demographics,
    pub party_preference: HashMap<String, CountShare>,
    pub aap_candidates: HashMap<String, CountShare>,
    pub bjp_candidates: HashMap<String, CountShare>,
    pub congress_candidates: HashMap<String, CountShare>,
    pub other_party_candidates: HashMap<String, CountShare>,
}
