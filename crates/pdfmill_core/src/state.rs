use serde::{Deserialize, Serialize};

use crate::document::ParsedDocument;
use crate::files::{FileCategory, FileEntry, HandleId};
use crate::highlight::HighlightMap;
use crate::progress::ProgressSnapshot;
use crate::settings::{OperationKind, OperationSettings};

/// Orchestrator state. Exactly one value at any time; `Init` is the only
/// state reachable with an empty file list, and `Loading` the only state
/// in which an external engine is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationState {
    #[default]
    Init,
    Selected,
    Loading,
    Parsed,
    ToBeDownloaded,
    Error,
}

/// One downloadable result, produced on reaching `ToBeDownloaded`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadResult {
    pub handle: HandleId,
    pub filename: String,
    pub operation: OperationKind,
    pub page: Option<u32>,
    pub total_pages: Option<u32>,
    pub byte_len: u64,
}

/// Session state owned by the orchestrator: the file list, settings,
/// progress, results, and the parse view. All mutation goes through
/// [`crate::update`]; observers read via [`AppState::view`].
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub(crate) operation: OperationKind,
    pub(crate) op_state: OperationState,
    pub(crate) files: Vec<FileEntry>,
    pub(crate) settings: OperationSettings,
    pub(crate) downloads: Vec<DownloadResult>,
    pub(crate) error_message: String,
    /// Blocking warning from a failed validation gate. Does not change
    /// the operation state.
    pub(crate) validation_warning: String,
    pub(crate) terminal: String,
    pub(crate) progress: ProgressSnapshot,
    /// Validated (start, end) pair of the dispatched split, captured at
    /// submit time. Output naming reads this, never the live settings,
    /// so edits made while `Loading` cannot mislabel the result.
    pub(crate) active_split: Option<(u32, u32)>,
    pub(crate) parsed: Option<ParsedDocument>,
    /// 1-based page shown by the parse view.
    pub(crate) current_page: u32,
    pub(crate) overlay_scale: f64,
    pub(crate) highlights: HighlightMap,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(OperationKind::Compress)
    }
}

impl AppState {
    pub fn new(operation: OperationKind) -> Self {
        Self {
            operation,
            op_state: OperationState::Init,
            files: Vec::new(),
            settings: OperationSettings::default(),
            downloads: Vec::new(),
            error_message: String::new(),
            validation_warning: String::new(),
            terminal: String::new(),
            progress: ProgressSnapshot::default(),
            active_split: None,
            parsed: None,
            current_page: 1,
            overlay_scale: 1.0,
            highlights: HighlightMap::default(),
        }
    }

    pub fn operation(&self) -> OperationKind {
        self.operation
    }

    pub fn op_state(&self) -> OperationState {
        self.op_state
    }

    pub(crate) fn file_handles(&self) -> Vec<HandleId> {
        self.files.iter().map(|f| f.handle).collect()
    }

    pub(crate) fn download_handles(&self) -> Vec<HandleId> {
        self.downloads.iter().map(|d| d.handle).collect()
    }

    /// Whether every file in the current list is an image.
    pub(crate) fn all_images(&self) -> bool {
        !self.files.is_empty()
            && self
                .files
                .iter()
                .all(|f| f.category == FileCategory::Image)
    }

    /// Category of a homogeneous batch, if the list is homogeneous.
    pub(crate) fn batch_category(&self) -> Option<FileCategory> {
        let first = self.files.first()?.category;
        self.files
            .iter()
            .all(|f| f.category == first)
            .then_some(first)
    }

    /// Reordering is permitted only where order feeds an order-sensitive
    /// operation: a merge batch, or an all-image convert batch.
    pub(crate) fn reorder_enabled(&self) -> bool {
        match self.operation {
            OperationKind::Merge => self.files.len() > 1,
            OperationKind::Convert => self.files.len() > 1 && self.all_images(),
            _ => false,
        }
    }

    /// Clear the per-operation inputs that become meaningless once the
    /// file list empties.
    pub(crate) fn clear_selection_settings(&mut self) {
        self.settings.target_format = None;
        self.settings.page_selection.clear();
        self.settings.page_count = 0;
    }

    /// Enter `Loading`: zero the progress snapshot, drop the previous
    /// log and warning. The caller emits the release effect for any
    /// prior downloads before forgetting them.
    pub(crate) fn enter_loading(&mut self) {
        self.op_state = OperationState::Loading;
        self.progress = ProgressSnapshot::default();
        self.terminal.clear();
        self.error_message.clear();
        self.validation_warning.clear();
        self.downloads.clear();
    }

    /// Terminal failure: surface the message, stop any streaming display.
    pub(crate) fn enter_error(&mut self, message: String) {
        self.op_state = OperationState::Error;
        self.error_message = message;
        self.terminal.clear();
        self.progress = ProgressSnapshot::default();
    }

    /// Successful non-parse completion.
    pub(crate) fn enter_downloaded(&mut self, downloads: Vec<DownloadResult>) {
        self.downloads = downloads;
        self.op_state = OperationState::ToBeDownloaded;
        self.terminal.clear();
        self.progress = ProgressSnapshot::default();
    }

    /// Successful parse completion.
    pub(crate) fn enter_parsed(&mut self, parsed: ParsedDocument) {
        self.parsed = Some(parsed);
        self.current_page = 1;
        self.highlights.reset();
        self.op_state = OperationState::Parsed;
        self.terminal.clear();
        self.progress = ProgressSnapshot::default();
    }

    /// Full reset back to `Init`, keeping the active operation kind.
    pub(crate) fn reset(&mut self) {
        let operation = self.operation;
        let overlay_scale = self.overlay_scale;
        *self = Self::new(operation);
        self.overlay_scale = overlay_scale;
    }
}
