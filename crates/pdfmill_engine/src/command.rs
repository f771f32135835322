//! Pure argument construction for the Ghostscript process. Kept free of
//! IO so every shape the engine can invoke is unit-testable.

use std::path::Path;

use crate::types::{RasterFormat, TransformJob};

const BASE_ARGS: [&str; 3] = ["-dNOPAUSE", "-dBATCH", "-dSAFER"];

/// Argument list for a document-to-document transform. `input_paths`
/// follow the job's input order; for merge that order is the page order
/// of the result.
pub fn transform_args(job: &TransformJob, input_paths: &[&Path], output: &Path) -> Vec<String> {
    if let Some(command) = job.custom_command.as_deref() {
        return custom_args(command, input_paths, output);
    }

    let mut args: Vec<String> = BASE_ARGS.iter().map(|s| s.to_string()).collect();
    args.push("-sDEVICE=pdfwrite".to_string());
    if let Some(quality) = job.quality.as_deref() {
        args.push(format!("-dPDFSETTINGS={quality}"));
    }
    if let Some(advanced) = &job.advanced {
        args.push(format!(
            "-dCompatibilityLevel={}",
            advanced.compatibility_level
        ));
        args.push(format!(
            "-dDownsampleColorImages={}",
            advanced.downsample_color_images
        ));
        args.push(format!(
            "-dColorImageResolution={}",
            advanced.color_image_resolution
        ));
    }
    if let Some((first, last)) = job.split {
        args.push(format!("-dFirstPage={first}"));
        args.push(format!("-dLastPage={last}"));
    }
    args.push(format!("-sOutputFile={}", output.display()));
    args.extend(input_paths.iter().map(|p| p.display().to_string()));
    args
}

/// Argument list for rendering a single page to a raster image.
pub fn raster_args(
    format: RasterFormat,
    resolution: u32,
    page: u32,
    input: &Path,
    output: &Path,
) -> Vec<String> {
    let mut args: Vec<String> = BASE_ARGS.iter().map(|s| s.to_string()).collect();
    args.push(format!("-sDEVICE={}", format.device()));
    args.push(format!("-r{resolution}"));
    args.push(format!("-dFirstPage={page}"));
    args.push(format!("-dLastPage={page}"));
    args.push(format!("-sOutputFile={}", output.display()));
    args.push(input.display().to_string());
    args
}

/// A validated custom command replaces the whole argument list. The
/// caller guarantees it names `-sOutputFile=`; that token is rewritten
/// to the engine's workspace path, and the workspace input paths are
/// appended so the command operates on the submitted documents.
fn custom_args(command: &str, input_paths: &[&Path], output: &Path) -> Vec<String> {
    let mut args: Vec<String> = command
        .split_whitespace()
        .map(|token| {
            if token.starts_with("-sOutputFile=") {
                format!("-sOutputFile={}", output.display())
            } else {
                token.to_string()
            }
        })
        .collect();
    args.extend(input_paths.iter().map(|p| p.display().to_string()));
    args
}
