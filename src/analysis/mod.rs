//! Survey tabulation.
//!
//! Counts how often each answer was given across a snapshot of records and
//! expresses every count as a percentage of the total responses.

pub mod aggregate;
pub mod types;
pub mod utility;

pub use aggregate::{ANALYSIS_OTHER_LABEL, aggregate};
pub use types::{CountShare, Demographics, Tabulation};
pub use utility::calculate_percentage;
