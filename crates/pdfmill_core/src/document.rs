//! Parsed-document model shared by the two parse-view surfaces.

/// Row-major 2D affine matrix `[a, b, c, d, e, f]`, the rendering
/// collaborator's convention (origin at the page's bottom-left).
pub type Matrix = [f64; 6];

/// One positioned fragment of extracted text, as returned by the
/// rendering collaborator. The per-page run order, not geometry, is the
/// index space shared between the overlay and the listing surface.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub transform: Matrix,
    /// Advance width in page units (unscaled by the display transform).
    pub width: f64,
}

/// One page of a parsed document: geometry plus its ordered text runs.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPage {
    pub width: f64,
    pub height: f64,
    pub runs: Vec<TextRun>,
}

impl ParsedPage {
    /// Plain-text rendition of the page, runs joined with single spaces.
    /// This is the text shown by the listing surface.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for (i, run) in self.runs.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(&run.text);
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedDocument {
    pub pages: Vec<ParsedPage>,
}

impl ParsedDocument {
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Page lookup by 1-based page number.
    pub fn page(&self, number: u32) -> Option<&ParsedPage> {
        if number == 0 {
            return None;
        }
        self.pages.get(number as usize - 1)
    }
}

/// `result = m1 ∘ m2` (apply `m2`, then `m1`).
pub fn compose(m1: &Matrix, m2: &Matrix) -> Matrix {
    [
        m1[0] * m2[0] + m1[2] * m2[1],
        m1[1] * m2[0] + m1[3] * m2[1],
        m1[0] * m2[2] + m1[2] * m2[3],
        m1[1] * m2[2] + m1[3] * m2[3],
        m1[0] * m2[4] + m1[2] * m2[5] + m1[4],
        m1[1] * m2[4] + m1[3] * m2[5] + m1[5],
    ]
}

/// Display transform mapping page space (origin bottom-left) onto a
/// surface of the given scale (origin top-left, y growing downward).
pub fn display_transform(scale: f64, page_height: f64) -> Matrix {
    [scale, 0.0, 0.0, -scale, 0.0, page_height * scale]
}
