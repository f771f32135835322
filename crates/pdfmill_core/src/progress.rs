use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Normalized progress state derived from unstructured engine output.
/// Reset to zero at the start of every operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub current: u32,
    pub total: u32,
    pub current_page: u32,
}

static TOTAL_PAGES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Processing pages \d+ through (\d+)").expect("total regex"));
static CURRENT_PAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Page (\d+)$").expect("current page regex"));

/// Classify one raw output chunk from the transform engine.
///
/// Two independent patterns are tried, both optional: a page-range
/// announcement sets `total` (later announcements overwrite it, since
/// the engine re-announces ranges across sub-phases), and a current-page
/// line sets both `current` and `current_page`. Returns whether either
/// pattern matched; unmatched chunks belong in the raw log, and progress
/// is never inferred from them.
pub fn interpret_line(snapshot: &mut ProgressSnapshot, chunk: &str) -> bool {
    let mut matched = false;

    if let Some(caps) = TOTAL_PAGES.captures(chunk) {
        if let Ok(total) = caps[1].parse() {
            snapshot.total = total;
            matched = true;
        }
    }

    if let Some(caps) = CURRENT_PAGE.captures(chunk.trim_end()) {
        if let Ok(page) = caps[1].parse() {
            snapshot.current_page = page;
            snapshot.current = page;
            matched = true;
        }
    }

    matched
}

#[cfg(test)]
mod tests {
    use super::{interpret_line, ProgressSnapshot};

    #[test]
    fn total_pages_line_sets_total() {
        let mut snapshot = ProgressSnapshot::default();
        assert!(interpret_line(
            &mut snapshot,
            "Processing pages 1 through 12."
        ));
        assert_eq!(snapshot.total, 12);
        assert_eq!(snapshot.current, 0);
    }

    #[test]
    fn reannounced_range_overwrites_total() {
        let mut snapshot = ProgressSnapshot::default();
        interpret_line(&mut snapshot, "Processing pages 1 through 12.");
        interpret_line(&mut snapshot, "Processing pages 1 through 7.");
        assert_eq!(snapshot.total, 7);
    }

    #[test]
    fn page_line_sets_current_and_current_page() {
        let mut snapshot = ProgressSnapshot::default();
        assert!(interpret_line(&mut snapshot, "Page 3"));
        assert_eq!(snapshot.current, 3);
        assert_eq!(snapshot.current_page, 3);
    }

    #[test]
    fn page_pattern_is_anchored() {
        let mut snapshot = ProgressSnapshot::default();
        assert!(!interpret_line(&mut snapshot, "Loading Page 3 resources"));
        assert_eq!(snapshot, ProgressSnapshot::default());
    }

    #[test]
    fn unmatched_chunk_leaves_progress_unchanged() {
        let mut snapshot = ProgressSnapshot {
            current: 2,
            total: 5,
            current_page: 2,
        };
        assert!(!interpret_line(&mut snapshot, "GPL Ghostscript 10.02.1"));
        assert_eq!(snapshot.current, 2);
        assert_eq!(snapshot.total, 5);
    }
}
