use crate::analysis::types::{CountShare, Demographics, Tabulation};
use crate::analysis::utility::tally;
use crate::survey::SurveyRecord;
use std::collections::HashMap;

/// Label counted when "Other" was selected without any override text.
pub const ANALYSIS_OTHER_LABEL: &str = "Other (Unspecified)";

/// Tabulates a snapshot of survey records into a [`Tabulation`].
///
/// Counts every answer first, then converts each final count into a
/// percentage of the total number of records. Records whose effective answer
/// is empty are left out of that category's map but still count towards the
/// total.
pub fn aggregate(records: &[SurveyRecord]) -> Tabulation {
    let total = records.len();

    let mut with_name = 0usize;
    let mut with_contact = 0usize;
    let mut with_address = 0usize;

    let mut party_preference = HashMap::new();
    let mut aap_candidates = HashMap::new();
    let mut bjp_candidates = HashMap::new();
    let mut congress_candidates = HashMap::new();
    let mut other_party_candidates = HashMap::new();

    for record in records {
        macro_rules! count_filled {
            ($counter:ident, $field:expr) => {
                if !$field.is_empty() {
                    $counter += 1;
                }
            };
        }

        count_filled!(with_name, record.name);
        count_filled!(with_contact, record.contact);
        count_filled!(with_address, record.address);

        tally(
            &mut party_preference,
            record.preferred_party.resolve(ANALYSIS_OTHER_LABEL),
        );
        tally(
            &mut aap_candidates,
            record.aap_candidate.resolve(ANALYSIS_OTHER_LABEL),
        );
        tally(
            &mut bjp_candidates,
            record.bjp_candidate.resolve(ANALYSIS_OTHER_LABEL),
        );
        tally(&mut congress_candidates, &record.congress_candidate);
        tally(&mut other_party_candidates, &record.other_party_candidate);
    }

    let shares = |counts: HashMap<String, usize>| -> HashMap<String, CountShare> {
        counts
            .into_iter()
            .map(|(label, count)| (label, CountShare::of(count, total)))
            .collect()
    };

    Tabulation {
        total_responses: total,
        demographics: Demographics {
            with_name: CountShare::of(with_name, total),
            with_contact: CountShare::of(with_contact, total),
            with_address: CountShare::of(with_address, total),
        },
        party_preference: shares(party_preference),
        aap_candidates: shares(aap_candidates),
        bjp_candidates: shares(bjp_candidates),
        congress_candidates: shares(congress_candidates),
        other_party_candidates: shares(other_party_candidates),
    }
}
