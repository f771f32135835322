//! Seam for the image-to-document authoring collaborator.

use crate::types::TransformError;

/// One source image for document authoring, placed on its own page in
/// list order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePage {
    pub filename: String,
    pub bytes: Vec<u8>,
}

pub trait DocumentAuthor: Send + Sync {
    /// Build a single document with one page per input image, preserving
    /// the input order.
    fn build(&self, images: &[ImagePage]) -> Result<Vec<u8>, TransformError>;
}
