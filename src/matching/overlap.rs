use crate::models::trip::DateRange;

/// Closed-interval intersection test. Touching endpoints overlap; a
/// malformed range overlaps nothing.
pub fn overlaps(a: &DateRange, b: &DateRange) -> bool {
    a.is_well_formed() && b.is_well_formed() && a.start <= b.end && b.start <= a.end
}

/// Number of calendar days both ranges share, 0 when they are disjoint.
pub fn overlap_days(a: &DateRange, b: &DateRange) -> i64 {
    if !overlaps(a, b) {
        return 0;
    }
    let start = a.start.max(b.start);
    let end = a.end.min(b.end);
    (end - start).num_days() + 1
}
