use crate::document::ParsedPage;
use crate::files::{FileEntry, HandleId};
use crate::highlight::SelectionEvent;
use crate::settings::{AdvancedSettings, OperationKind, QualityPreset, TargetFormat};

/// Binary result of a completed transform or authoring step: the handle
/// under which the shell stored the produced bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformPayload {
    pub handle: HandleId,
    pub byte_len: u64,
}

/// One rendered page produced by a document-to-raster conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterPayload {
    pub handle: HandleId,
    pub byte_len: u64,
    pub page: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User switched the operation tab. Forces a full session reset.
    OperationSelected(OperationKind),
    /// New selection batch, replacing the current file list.
    FilesSelected(Vec<FileEntry>),
    /// Additional files appended to the current list.
    MoreFilesAdded(Vec<FileEntry>),
    FileRemoved(usize),
    FilesCleared,
    /// Drag-and-drop reorder request.
    FileMoved { source: usize, target: usize },
    QualityChanged(QualityPreset),
    CustomCommandToggled(bool),
    CustomCommandChanged(String),
    AdvancedToggled(bool),
    AdvancedChanged(AdvancedSettings),
    SplitRangeChanged { start: String, end: String },
    TargetFormatChanged(TargetFormat),
    PageSelectionChanged(String),
    TerminalToggled(bool),
    ProgressToggled(bool),
    /// User submitted the current operation.
    SubmitRequested,
    /// Reprocess with the same files from a terminal result state.
    ProcessAgainRequested,
    /// Full reset back to `Init`.
    ResetRequested,
    /// Page count of the first selected document, resolved by the shell.
    ProbeDone { page_count: u32 },
    /// One raw output chunk streamed by the transform engine.
    EngineLine(String),
    /// Structured per-page progress from a convert or parse walk.
    OperationProgress { current: u32, total: u32, page: u32 },
    /// Transform engine completion. `completed_ms` is the shell's clock,
    /// used for merge output naming.
    TransformDone {
        result: Result<TransformPayload, String>,
        completed_ms: u64,
    },
    /// Document-to-raster conversion completion.
    ConvertPagesDone {
        result: Result<Vec<RasterPayload>, String>,
    },
    /// Images-to-document authoring completion.
    BuildDone {
        result: Result<TransformPayload, String>,
    },
    /// Text extraction completion for the parse operation.
    ParseDone {
        result: Result<Vec<ParsedPage>, String>,
    },
    /// Parse view: switch the displayed page (1-based).
    PageSelected(u32),
    /// Parse view: overlay surface display scale changed.
    OverlayScaleChanged(f64),
    /// Parse view: selection gesture on either surface.
    TextSelected(SelectionEvent),
    /// Fallback for placeholder wiring.
    NoOp,
}
