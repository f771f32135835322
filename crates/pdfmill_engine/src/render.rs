//! Seam for the page-rendering collaborator that backs the parse view.
//! Text geometry comes from the embedder's PDF renderer, not from the
//! transform process, so the engine only defines the contract.

use crate::types::TransformError;

/// One positioned text fragment, in page coordinates with the origin at
/// the bottom-left. The per-page fragment order is the index space the
/// highlight surfaces share.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedRun {
    pub text: String,
    /// `[a, b, c, d, e, f]` placement matrix.
    pub transform: [f64; 6],
    /// Advance width in page units.
    pub width: f64,
}

/// Text content and geometry of one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageContent {
    pub width: f64,
    pub height: f64,
    pub runs: Vec<ExtractedRun>,
}

/// Read-side collaborator for parsed documents.
pub trait DocumentRenderer: Send + Sync {
    /// Number of pages in the document, or why it could not be opened.
    fn page_count(&self, bytes: &[u8]) -> Result<u32, TransformError>;

    /// Extract the ordered text runs of a 1-based page.
    fn page_content(&self, bytes: &[u8], page: u32) -> Result<PageContent, TransformError>;
}
