use std::collections::HashSet;

use tracing::debug;

use super::SourceRow;

/// Keep the first row seen for each id, preserving input order.
/// Returns the surviving rows and the number of dropped duplicates.
pub fn dedup_by_id<R: SourceRow>(rows: impl IntoIterator<Item = R>) -> (Vec<R>, usize) {
    let mut seen = HashSet::new();
    let mut kept = Vec::new();
    let mut dropped = 0usize;

    for row in rows {
        let id = row.id();
        if seen.insert(id) {
            kept.push(row);
        } else {
            debug!(id, "dropping duplicate listing");
            dropped += 1;
        }
    }

    (kept, dropped)
}
