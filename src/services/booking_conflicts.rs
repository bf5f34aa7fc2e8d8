use chrono::NaiveDate;

/// Inclusive date range of an existing booking: `(start_date, end_date)`.
pub type DateRange = (NaiveDate, NaiveDate);

/// Returns true when the candidate range collides with any existing range.
///
/// Comparisons are boundary inclusive, so a stay ending on the day another
/// begins is a conflict. When editing a booking, its own range must be removed
/// from `existing` before calling this.
pub fn has_conflict(
    candidate_start: NaiveDate,
    candidate_end: NaiveDate,
    existing: &[DateRange],
) -> bool {
    existing
        .iter()
        .any(|&(start, end)| conflicts(candidate_start, candidate_end, start, end))
}

fn conflicts(
    candidate_start: NaiveDate,
    candidate_end: NaiveDate,
    start: NaiveDate,
    end: NaiveDate,
) -> bool {
    // existing booking sits inside the candidate
    (start >= candidate_start && end <= candidate_end)
        // existing booking starts during the candidate
        || (start >= candidate_start && start <= candidate_end)
        // existing booking ends during the candidate
        || (end >= candidate_start && end <= candidate_end)
        // candidate sits inside the existing booking
        || (start <= candidate_start && end >= candidate_end)
}
