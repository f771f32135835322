use thiserror::Error;

pub type JobId = u64;

/// One source document handed to the engine, bytes plus the name used
/// for workspace files and log lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Advanced pdfwrite options, forwarded verbatim as `-d` switches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvancedOptions {
    pub compatibility_level: String,
    pub downsample_color_images: bool,
    pub color_image_resolution: u32,
}

/// A document-to-document transform: compress, merge, or split,
/// depending on the input count and the page window.
///
/// `quality` carries the `/ebook`-style preset token and is absent when
/// `custom_command` overrides the whole argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformJob {
    pub job_id: JobId,
    pub inputs: Vec<InputDocument>,
    pub quality: Option<String>,
    pub custom_command: Option<String>,
    pub advanced: Option<AdvancedOptions>,
    /// Inclusive (first, last) page window for split.
    pub split: Option<(u32, u32)>,
}

/// Page rasterization: render the listed pages of one document, one
/// output image per page, in the listed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterJob {
    pub job_id: JobId,
    pub input: InputDocument,
    pub format: RasterFormat,
    pub pages: Vec<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    Jpeg,
    Png,
    Bmp,
}

impl RasterFormat {
    /// Ghostscript output device for this format.
    pub fn device(self) -> &'static str {
        match self {
            RasterFormat::Jpeg => "jpeg",
            RasterFormat::Png => "png16m",
            RasterFormat::Bmp => "bmp16m",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            RasterFormat::Jpeg => "jpg",
            RasterFormat::Png => "png",
            RasterFormat::Bmp => "bmp",
        }
    }
}

/// One rendered page of a [`RasterJob`], in the job's page order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub page: u32,
    pub bytes: Vec<u8>,
}

/// Events streamed from the engine worker back to the caller. `Line`
/// events arrive in output order, strictly before the job's completion
/// event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// One raw output line from the transform process.
    Line { job_id: JobId, chunk: String },
    /// One page of a raster walk finished. `current` counts completed
    /// pages out of `total` requested; `page` is the page number just
    /// rendered.
    RenderProgress {
        job_id: JobId,
        current: u32,
        total: u32,
        page: u32,
    },
    TransformCompleted {
        job_id: JobId,
        result: Result<Vec<u8>, TransformError>,
    },
    PagesRendered {
        job_id: JobId,
        result: Result<Vec<RenderedPage>, TransformError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("could not start the transform process: {0}")]
    Spawn(String),
    #[error("{0}")]
    Failed(String),
    #[error("the operation timed out")]
    Timeout,
    #[error("workspace error: {0}")]
    Workspace(String),
    #[error("the transform produced no output")]
    EmptyOutput,
}

impl From<std::io::Error> for TransformError {
    fn from(err: std::io::Error) -> Self {
        TransformError::Workspace(err.to_string())
    }
}
