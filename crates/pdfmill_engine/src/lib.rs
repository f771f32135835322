//! Pdfmill engine: Ghostscript process plumbing, the resource store, and
//! the collaborator seams behind the document operations.
mod author;
mod command;
mod engine;
mod render;
mod store;
mod transform;
mod types;

pub use author::{DocumentAuthor, ImagePage};
pub use command::{raster_args, transform_args};
pub use engine::EngineHandle;
pub use render::{DocumentRenderer, ExtractedRun, PageContent};
pub use store::{BlobStore, StoreError};
pub use transform::{
    ChannelProgressSink, GhostscriptTransformer, ProgressSink, TransformSettings, Transformer,
};
pub use types::{
    AdvancedOptions, EngineEvent, InputDocument, JobId, RasterFormat, RasterJob, RenderedPage,
    TransformError, TransformJob,
};
