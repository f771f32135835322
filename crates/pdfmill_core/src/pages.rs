use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

static RANGE_TERM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)-(\d+)$").expect("range term regex"));

/// Parse a page selection string like "1,3-5,7" into an ascending,
/// duplicate-free list of page numbers bounded by `[1, total_pages]`.
///
/// An empty or whitespace-only selection means "all pages" and returns
/// `1..=total_pages`. Malformed terms (non-numeric, reversed or
/// out-of-bounds ranges) are dropped, so a selection in which every term
/// is malformed returns an empty list. Callers must treat that empty
/// result as a validation failure, never as "all pages".
pub fn parse_page_selection(selection: &str, total_pages: u32) -> Vec<u32> {
    if selection.trim().is_empty() {
        return (1..=total_pages).collect();
    }

    let mut pages = BTreeSet::new();
    for part in selection.split(',') {
        let term = part.trim();
        if term.is_empty() {
            continue;
        }

        if let Some(caps) = RANGE_TERM.captures(term) {
            let start: u32 = match caps[1].parse() {
                Ok(n) => n,
                Err(_) => continue,
            };
            let end: u32 = match caps[2].parse() {
                Ok(n) => n,
                Err(_) => continue,
            };
            if start >= 1 && start <= end && end <= total_pages {
                pages.extend(start..=end);
            }
        } else if let Ok(page) = term.parse::<u32>() {
            if page >= 1 && page <= total_pages {
                pages.insert(page);
            }
        }
    }

    pages.into_iter().collect()
}
