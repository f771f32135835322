//! Pdfmill core: pure state machine and document-operation helpers.
mod document;
mod effect;
mod filename;
mod files;
mod highlight;
mod msg;
mod pages;
mod progress;
mod reorder;
mod settings;
mod state;
mod update;
mod validate;
mod view_model;

pub use document::{compose, display_transform, Matrix, ParsedDocument, ParsedPage, TextRun};
pub use effect::{Effect, TransformPlan};
pub use filename::{output_filename, OutputNaming};
pub use files::{file_category, FileCategory, FileEntry, HandleId};
pub use highlight::{
    listing_spans, overlay_boxes, runs_in_rect, runs_in_span, HighlightMap, Rect, SelectionEvent,
};
pub use msg::{Msg, RasterPayload, TransformPayload};
pub use pages::parse_page_selection;
pub use progress::{interpret_line, ProgressSnapshot};
pub use reorder::move_item;
pub use settings::{
    supported_targets, AdvancedSettings, OperationKind, OperationSettings, QualityPreset,
    SplitRange, TargetFormat,
};
pub use state::{AppState, DownloadResult, OperationState};
pub use update::update;
pub use validate::ValidationError;
pub use view_model::{AppViewModel, FileRowView, ParseView};
