use std::collections::BTreeSet;

use crate::files::{FileCategory, HandleId};
use crate::highlight::{listing_spans, overlay_boxes, Rect};
use crate::progress::ProgressSnapshot;
use crate::settings::{supported_targets, OperationKind, TargetFormat};
use crate::state::{AppState, DownloadResult, OperationState};

/// Read-only snapshot of the session for a presentation shell.
#[derive(Debug, Clone, PartialEq)]
pub struct AppViewModel {
    pub operation: OperationKind,
    pub op_state: OperationState,
    pub files: Vec<FileRowView>,
    pub reorder_enabled: bool,
    /// Target formats offered for the current homogeneous batch.
    pub supported_targets: Vec<TargetFormat>,
    pub downloads: Vec<DownloadResult>,
    pub error_message: String,
    pub validation_warning: String,
    /// Present only while progress display is enabled.
    pub progress: Option<ProgressSnapshot>,
    /// Present only while raw terminal output is enabled.
    pub terminal: Option<String>,
    pub parse: Option<ParseView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRowView {
    pub handle: HandleId,
    pub filename: String,
    pub category: FileCategory,
}

/// The parse view's two surfaces, both derived from the one shared
/// highlight map so they can never disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseView {
    pub current_page: u32,
    pub page_count: u32,
    /// Plain text of the current page (the listing surface's content).
    pub page_text: String,
    /// Highlighted run indices of the current page.
    pub highlighted: BTreeSet<usize>,
    /// Overlay surface: rendered boxes of the highlighted runs at the
    /// current display scale.
    pub overlay_highlight_boxes: Vec<Rect>,
    /// Listing surface: character spans of the highlighted runs.
    pub listing_highlight_spans: Vec<(usize, usize)>,
}

impl AppState {
    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            operation: self.operation,
            op_state: self.op_state,
            files: self
                .files
                .iter()
                .map(|f| FileRowView {
                    handle: f.handle,
                    filename: f.filename.clone(),
                    category: f.category,
                })
                .collect(),
            reorder_enabled: self.reorder_enabled(),
            supported_targets: self
                .batch_category()
                .map(|category| supported_targets(category).to_vec())
                .unwrap_or_default(),
            downloads: self.downloads.clone(),
            error_message: self.error_message.clone(),
            validation_warning: self.validation_warning.clone(),
            progress: self.settings.show_progress_bar.then_some(self.progress),
            terminal: self
                .settings
                .show_terminal_output
                .then(|| self.terminal.clone()),
            parse: self.parse_view(),
        }
    }

    fn parse_view(&self) -> Option<ParseView> {
        if self.op_state != OperationState::Parsed {
            return None;
        }
        let parsed = self.parsed.as_ref()?;
        let page = parsed.page(self.current_page)?;
        let highlighted = self.highlights.highlighted(self.current_page);

        let boxes = overlay_boxes(page, self.overlay_scale);
        let spans = listing_spans(page);
        let overlay_highlight_boxes = highlighted
            .iter()
            .filter_map(|&i| boxes.get(i).copied())
            .collect();
        let listing_highlight_spans = highlighted
            .iter()
            .filter_map(|&i| spans.get(i).copied())
            .collect();

        Some(ParseView {
            current_page: self.current_page,
            page_count: parsed.page_count(),
            page_text: page.text(),
            highlighted,
            overlay_highlight_boxes,
            listing_highlight_spans,
        })
    }
}
