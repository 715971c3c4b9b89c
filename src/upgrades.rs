//! Upgrade candidate collection and ordering.

use std::collections::HashSet;

use crate::types::{PackageRecord, UpgradeCandidate};

/// Build the upgrade candidate list from the installed snapshot.
///
/// `best_available` answers with the new version's record when an update
/// exists. Packages that are up to date, or whose name is in `excluded`
/// (the keep list's dependency closure), are silently skipped; that is
/// filtering, not an error. Order is unspecified until [`sort_candidates`].
pub fn collect_candidates(
    installed: &[PackageRecord],
    mut best_available: impl FnMut(&PackageRecord) -> Option<PackageRecord>,
    excluded: &HashSet<String>,
) -> Vec<UpgradeCandidate> {
    let mut candidates = Vec::new();
    for record in installed {
        if excluded.contains(&record.name) {
            continue;
        }
        if let Some(newer) = best_available(record) {
            candidates.push(UpgradeCandidate::new(newer));
        }
    }
    candidates
}

/// Stable total order: installed size descending, name ascending on ties.
///
/// Negative sizes order as zero; the stored value is never touched. The tie
/// break makes runs over identical inputs reproducible.
pub fn sort_candidates(candidates: &mut [UpgradeCandidate]) {
    candidates.sort_by(|a, b| {
        b.record
            .installed_size
            .max(0)
            .cmp(&a.record.installed_size.max(0))
            .then_with(|| a.record.name.cmp(&b.record.name))
    });
}
