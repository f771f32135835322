use serde::{Deserialize, Serialize};

use crate::files::FileCategory;

/// The five document operations. Exactly one is active at a time;
/// switching forces a full session reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Compress,
    Merge,
    Split,
    Convert,
    Parse,
}

impl OperationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::Compress => "compress",
            OperationKind::Merge => "merge",
            OperationKind::Split => "split",
            OperationKind::Convert => "convert",
            OperationKind::Parse => "parse",
        }
    }

    /// File categories accepted at selection time for this operation.
    pub fn accepts(self, category: FileCategory) -> bool {
        match self {
            OperationKind::Convert => {
                matches!(category, FileCategory::Document | FileCategory::Image)
            }
            _ => category == FileCategory::Document,
        }
    }
}

/// Compression quality preset, serialized as the transform engine's
/// `/screen`-style tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    Screen,
    #[default]
    Ebook,
    Printer,
    Prepress,
    Default,
}

impl QualityPreset {
    pub fn token(self) -> &'static str {
        match self {
            QualityPreset::Screen => "/screen",
            QualityPreset::Ebook => "/ebook",
            QualityPreset::Printer => "/printer",
            QualityPreset::Prepress => "/prepress",
            QualityPreset::Default => "/default",
        }
    }
}

/// Conversion target. Raster targets apply to document sources; the
/// `Pdf` target applies to image sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    Jpg,
    Jpeg,
    Png,
    Bmp,
    Pdf,
}

impl TargetFormat {
    pub fn extension(self) -> &'static str {
        match self {
            TargetFormat::Jpg => "jpg",
            TargetFormat::Jpeg => "jpeg",
            TargetFormat::Png => "png",
            TargetFormat::Bmp => "bmp",
            TargetFormat::Pdf => "pdf",
        }
    }

    pub fn is_raster(self) -> bool {
        !matches!(self, TargetFormat::Pdf)
    }
}

/// Target formats offered for a homogeneous batch of the given category.
pub fn supported_targets(category: FileCategory) -> &'static [TargetFormat] {
    match category {
        FileCategory::Document => &[
            TargetFormat::Jpg,
            TargetFormat::Jpeg,
            TargetFormat::Png,
            TargetFormat::Bmp,
        ],
        FileCategory::Image => &[TargetFormat::Pdf],
        FileCategory::Other => &[],
    }
}

/// Advanced compression options forwarded to the transform engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancedSettings {
    pub compatibility_level: String,
    pub downsample_color_images: bool,
    pub color_image_resolution: u32,
}

impl Default for AdvancedSettings {
    fn default() -> Self {
        Self {
            compatibility_level: "1.4".to_string(),
            downsample_color_images: true,
            color_image_resolution: 300,
        }
    }
}

/// Split page range as entered by the user. Kept as raw strings so the
/// validation gate can reject non-integer input.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SplitRange {
    pub start: String,
    pub end: String,
}

/// Per-session operation settings.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationSettings {
    pub quality: QualityPreset,
    pub use_custom_command: bool,
    pub custom_command: String,
    pub use_advanced: bool,
    pub advanced: AdvancedSettings,
    pub split_range: SplitRange,
    pub target_format: Option<TargetFormat>,
    pub page_selection: String,
    /// Page count of the first selected document, resolved by a probe
    /// effect after selection. Zero while unknown.
    pub page_count: u32,
    pub show_terminal_output: bool,
    pub show_progress_bar: bool,
}

impl Default for OperationSettings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::default(),
            use_custom_command: false,
            custom_command: String::new(),
            use_advanced: false,
            advanced: AdvancedSettings::default(),
            split_range: SplitRange::default(),
            target_format: None,
            page_selection: String::new(),
            page_count: 0,
            show_terminal_output: false,
            show_progress_bar: false,
        }
    }
}
