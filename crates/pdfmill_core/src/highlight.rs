//! Bidirectional highlight synchronization between the rendered page
//! overlay and the plain-text listing of the same runs.
//!
//! Both surfaces share one index space: the per-page run order returned
//! by the rendering collaborator. A selection gesture on either surface
//! resolves to a set of run indices, which replaces that page's entry in
//! the [`HighlightMap`]; both surfaces then re-derive their visual state
//! from the shared map, so they can never disagree.

use std::collections::{BTreeMap, BTreeSet};

use crate::document::{compose, display_transform, ParsedPage};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Strict overlap: touching edges do not intersect, matching the
    /// boundary-point comparison the selection gesture is derived from.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}

/// A selection event reported by one of the two surfaces, already
/// translated into that surface's coordinate space.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionEvent {
    /// Rectangle over the overlay surface, in display coordinates at the
    /// current overlay scale.
    Overlay { rect: Rect },
    /// Character interval over the listing surface's page text.
    Listing { start: usize, end: usize },
    /// The selection collapsed to nothing.
    Cleared,
    /// The selection's anchor and focus both fell outside either surface.
    OutsideSurfaces,
}

/// Per-page run-index highlight state, shared by both surfaces.
///
/// An entry holding an empty set is an explicit "nothing highlighted"
/// and renders identically to an absent entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HighlightMap {
    pages: BTreeMap<u32, BTreeSet<usize>>,
}

impl HighlightMap {
    /// Replace (never merge) the highlight set for a page.
    pub fn set_page(&mut self, page: u32, indices: BTreeSet<usize>) {
        self.pages.insert(page, indices);
    }

    /// Store an explicit empty set for the page.
    pub fn clear_page(&mut self, page: u32) {
        self.pages.insert(page, BTreeSet::new());
    }

    /// The highlighted run indices for a page; absent entries read as
    /// empty.
    pub fn highlighted(&self, page: u32) -> BTreeSet<usize> {
        self.pages.get(&page).cloned().unwrap_or_default()
    }

    pub fn entry(&self, page: u32) -> Option<&BTreeSet<usize>> {
        self.pages.get(&page)
    }

    /// Drop every page's entry (document reset).
    pub fn reset(&mut self) {
        self.pages.clear();
    }
}

/// Rendered bounding box of every run on the overlay surface at the
/// given display scale. The box index equals the run index.
pub fn overlay_boxes(page: &ParsedPage, scale: f64) -> Vec<Rect> {
    let viewport = display_transform(scale, page.height);
    page.runs
        .iter()
        .map(|run| {
            let m = compose(&viewport, &run.transform);
            let font_size = (m[2] * m[2] + m[3] * m[3]).sqrt();
            Rect::new(m[4], m[5] - font_size, run.width * scale, font_size)
        })
        .collect()
}

/// Character interval of every run within the page's joined text. The
/// span index equals the run index.
pub fn listing_spans(page: &ParsedPage) -> Vec<(usize, usize)> {
    let mut spans = Vec::with_capacity(page.runs.len());
    let mut offset = 0usize;
    for (i, run) in page.runs.iter().enumerate() {
        if i > 0 {
            offset += 1; // joining space
        }
        let len = run.text.chars().count();
        spans.push((offset, offset + len));
        offset += len;
    }
    spans
}

/// Run indices whose overlay boxes intersect the selection rectangle.
pub fn runs_in_rect(boxes: &[Rect], selection: &Rect) -> BTreeSet<usize> {
    boxes
        .iter()
        .enumerate()
        .filter(|(_, b)| b.intersects(selection))
        .map(|(i, _)| i)
        .collect()
}

/// Run indices whose listing spans overlap the `[start, end)` character
/// interval. Overlap is strict, so a collapsed interval selects nothing.
pub fn runs_in_span(spans: &[(usize, usize)], start: usize, end: usize) -> BTreeSet<usize> {
    spans
        .iter()
        .enumerate()
        .filter(|(_, (s, e))| *s < end && *e > start)
        .map(|(i, _)| i)
        .collect()
}
