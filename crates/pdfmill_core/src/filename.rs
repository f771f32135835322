use crate::settings::TargetFormat;

/// Naming parameters for a produced download, one variant per operation
/// shape. Merge output is named from a caller-supplied timestamp so the
/// derivation stays a pure function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputNaming {
    Compress,
    Merge { timestamp_ms: u64 },
    Split { start: u32, end: u32 },
    Convert { format: TargetFormat },
    ConvertPage { format: TargetFormat, page: u32 },
}

/// Derive the output filename for a download produced from `original`.
pub fn output_filename(original: &str, naming: OutputNaming) -> String {
    let stem = file_stem(original);
    match naming {
        OutputNaming::Compress => format!("{stem}-compressed.pdf"),
        OutputNaming::Merge { timestamp_ms } => format!("merged-{timestamp_ms}.pdf"),
        OutputNaming::Split { start, end } => format!("{stem}-split-{start}-{end}.pdf"),
        OutputNaming::Convert { format } => format!("{stem}.{}", format.extension()),
        OutputNaming::ConvertPage { format, page } => {
            format!("{stem}-page-{page}.{}", format.extension())
        }
    }
}

/// Strip the final extension, if any. A leading dot is not an extension
/// separator.
fn file_stem(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}
