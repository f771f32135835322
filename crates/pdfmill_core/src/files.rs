use serde::{Deserialize, Serialize};

/// Opaque reference to transient binary content held by the shell's blob
/// store. Must be released exactly once.
pub type HandleId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileCategory {
    Document,
    Image,
    Other,
}

/// Classify a selected file by MIME type first, falling back to the
/// filename extension.
pub fn file_category(filename: &str, mime: Option<&str>) -> FileCategory {
    if let Some(mime) = mime {
        if mime == "application/pdf" {
            return FileCategory::Document;
        }
        if mime.starts_with("image/") {
            return FileCategory::Image;
        }
    }
    let lower = filename.to_ascii_lowercase();
    if lower.ends_with(".pdf") {
        FileCategory::Document
    } else if [".jpg", ".jpeg", ".png", ".bmp"]
        .iter()
        .any(|ext| lower.ends_with(ext))
    {
        FileCategory::Image
    } else {
        FileCategory::Other
    }
}

/// One entry in the orchestrator's ordered file list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub handle: HandleId,
    pub filename: String,
    pub category: FileCategory,
}

impl FileEntry {
    pub fn new(handle: HandleId, filename: impl Into<String>, mime: Option<&str>) -> Self {
        let filename = filename.into();
        let category = file_category(&filename, mime);
        Self {
            handle,
            filename,
            category,
        }
    }
}
