use std::cmp::{Ordering, Reverse};

use chrono::{DateTime, Utc};

use crate::models::trip::{normalize_key, MatchCandidate, MatchReference, Trip};

use super::overlap::overlap_days;

/// Every trip in `snapshot` that another owner posted for the same place and
/// purpose with at least one shared day, best overlap first.
///
/// The store may already have pre-filtered the snapshot; the checks here are
/// applied regardless so the result never depends on how it was loaded.
pub fn candidates(reference: &MatchReference, snapshot: &[Trip]) -> Vec<MatchCandidate> {
    let location_key = normalize_key(&reference.location);
    let purpose_key = normalize_key(&reference.purpose);

    let mut found: Vec<MatchCandidate> = snapshot
        .iter()
        .filter(|trip| trip.owner_id != reference.owner_id)
        .filter(|trip| trip.location_key() == location_key)
        .filter(|trip| trip.purpose_key() == purpose_key)
        .filter_map(|trip| {
            let days = overlap_days(&trip.date_range, &reference.date_range);
            (days > 0).then(|| MatchCandidate {
                trip: trip.clone(),
                overlap_days: days,
            })
        })
        .collect();

    found.sort_by(compare);
    found
}

/// Position of a candidate in the deck: most shared days, then earliest
/// posted, then trip id.
pub(crate) fn sort_key(candidate: &MatchCandidate) -> (Reverse<i64>, DateTime<Utc>, &str) {
    (
        Reverse(candidate.overlap_days),
        candidate.trip.created_at,
        candidate.trip.id.as_str(),
    )
}

fn compare(a: &MatchCandidate, b: &MatchCandidate) -> Ordering {
    sort_key(a).cmp(&sort_key(b))
}
