//! Incremental filter: new candidate units against the processed set.

use std::collections::HashSet;

use tracing::debug;

use crate::types::AnnouncementUnit;

/// Keep only units whose document has not been processed, preserving input
/// order. Order determines downstream processing order, which determines
/// request pacing and report ordering.
///
/// Also dedups within the batch itself (first occurrence wins), so a
/// listing that repeats a document link can never produce two records with
/// the same identity in one run.
pub fn filter_new(
    units: Vec<AnnouncementUnit>,
    processed: &HashSet<&str>,
) -> Vec<AnnouncementUnit> {
    let mut seen_in_batch: HashSet<String> = HashSet::new();
    let mut fresh = Vec::new();

    for unit in units {
        if processed.contains(unit.document_ref.as_str()) {
            debug!(document = %unit.document_ref, "Skipping already processed document");
            continue;
        }
        if !seen_in_batch.insert(unit.document_ref.clone()) {
            debug!(document = %unit.document_ref, "Skipping duplicate within batch");
            continue;
        }
        fresh.push(unit);
    }

    fresh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(doc: &str) -> AnnouncementUnit {
        AnnouncementUnit::new("/company/ABC/", doc)
    }

    #[test]
    fn test_filters_processed_and_preserves_order() {
        let processed: HashSet<&str> = ["https://x/b.pdf"].into_iter().collect();
        let units = vec![
            unit("https://x/a.pdf"),
            unit("https://x/b.pdf"),
            unit("https://x/c.pdf"),
        ];

        let fresh = filter_new(units, &processed);

        assert_eq!(fresh.len(), 2);
        assert_eq!(fresh[0].document_ref, "https://x/a.pdf");
        assert_eq!(fresh[1].document_ref, "https://x/c.pdf");
    }

    #[test]
    fn test_filter_is_idempotent() {
        let processed: HashSet<&str> = ["https://x/b.pdf"].into_iter().collect();
        let units = vec![unit("https://x/a.pdf"), unit("https://x/b.pdf")];

        let once = filter_new(units.clone(), &processed);
        let twice = filter_new(once.clone(), &processed);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_all_processed_yields_empty() {
        let processed: HashSet<&str> = ["https://x/a.pdf"].into_iter().collect();
        let fresh = filter_new(vec![unit("https://x/a.pdf")], &processed);
        assert!(fresh.is_empty());
    }

    #[test]
    fn test_batch_internal_duplicates_collapse() {
        let processed = HashSet::new();
        let units = vec![unit("https://x/a.pdf"), unit("https://x/a.pdf")];

        let fresh = filter_new(units, &processed);
        assert_eq!(fresh.len(), 1);
    }
}
