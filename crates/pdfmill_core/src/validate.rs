use thiserror::Error;

use crate::effect::{Effect, TransformPlan};
use crate::files::FileCategory;
use crate::pages::parse_page_selection;
use crate::settings::{supported_targets, OperationKind, OperationSettings, TargetFormat};
use crate::state::AppState;

/// Pre-flight validation failure. Caught before `Loading` is entered,
/// keeps the state machine where it is, and never reaches an engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Select a file to process first.")]
    NoFiles,
    #[error("Enter a custom command or disable the custom command option.")]
    CustomCommandMissing,
    #[error("Custom command must name both -sDEVICE= and -sOutputFile=.")]
    CustomCommandIncomplete,
    #[error("Select at least two files to merge.")]
    MergeNeedsTwoFiles,
    #[error("Specify both a start and an end page for the split.")]
    SplitRangeMissing,
    #[error("Page numbers must be positive integers, with the end page not before the start.")]
    SplitRangeInvalid,
    #[error("Choose a target format for the conversion.")]
    TargetFormatMissing,
    #[error("Mixed file types cannot be converted together; select only documents or only images.")]
    MixedConvertBatch,
    #[error("The selected target format does not apply to this file type.")]
    TargetFormatUnsupported,
    #[error("The page selection matches no pages in the document.")]
    PageSelectionEmpty,
}

/// Validate the current state for submission and shape the dispatch
/// effect for the active operation. Evaluated once, synchronously,
/// before `Loading` may be entered.
pub(crate) fn plan_submission(state: &AppState) -> Result<Effect, ValidationError> {
    if state.files.is_empty() {
        return Err(ValidationError::NoFiles);
    }

    let settings = &state.settings;
    if settings.use_custom_command {
        let trimmed = settings.custom_command.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::CustomCommandMissing);
        }
        // An override without a device and an output destination would be
        // unusable; reject it here rather than forwarding it.
        if !trimmed.contains("-sDEVICE=") || !trimmed.contains("-sOutputFile=") {
            return Err(ValidationError::CustomCommandIncomplete);
        }
    }

    match state.operation {
        OperationKind::Compress => Ok(Effect::RunTransform(transform_plan(state, None))),
        OperationKind::Merge => {
            if state.files.len() < 2 {
                return Err(ValidationError::MergeNeedsTwoFiles);
            }
            Ok(Effect::RunTransform(transform_plan(state, None)))
        }
        OperationKind::Split => {
            let split = split_pair(settings)?;
            Ok(Effect::RunTransform(transform_plan(state, Some(split))))
        }
        OperationKind::Parse => Ok(Effect::ParseDocument {
            handle: state.files[0].handle,
        }),
        OperationKind::Convert => plan_convert(state),
    }
}

fn plan_convert(state: &AppState) -> Result<Effect, ValidationError> {
    let settings = &state.settings;
    let format = settings
        .target_format
        .ok_or(ValidationError::TargetFormatMissing)?;
    let category = state
        .batch_category()
        .ok_or(ValidationError::MixedConvertBatch)?;
    if !supported_targets(category).contains(&format) {
        return Err(ValidationError::TargetFormatUnsupported);
    }

    match category {
        FileCategory::Document => {
            let pages = parse_page_selection(&settings.page_selection, settings.page_count);
            if pages.is_empty() {
                return Err(ValidationError::PageSelectionEmpty);
            }
            Ok(Effect::ConvertPages {
                handle: state.files[0].handle,
                format,
                pages,
            })
        }
        FileCategory::Image => {
            debug_assert_eq!(format, TargetFormat::Pdf);
            Ok(Effect::BuildDocument {
                handles: state.file_handles(),
            })
        }
        FileCategory::Other => Err(ValidationError::TargetFormatUnsupported),
    }
}

/// Validated (start, end) page pair for split.
pub(crate) fn split_pair(settings: &OperationSettings) -> Result<(u32, u32), ValidationError> {
    let start = settings.split_range.start.trim();
    let end = settings.split_range.end.trim();
    if start.is_empty() || end.is_empty() {
        return Err(ValidationError::SplitRangeMissing);
    }
    let start: u32 = start
        .parse()
        .map_err(|_| ValidationError::SplitRangeInvalid)?;
    let end: u32 = end.parse().map_err(|_| ValidationError::SplitRangeInvalid)?;
    if start < 1 || end < start {
        return Err(ValidationError::SplitRangeInvalid);
    }
    Ok((start, end))
}

fn transform_plan(state: &AppState, split: Option<(u32, u32)>) -> TransformPlan {
    let settings = &state.settings;
    let inputs = match state.operation {
        OperationKind::Merge => state.file_handles(),
        _ => vec![state.files[0].handle],
    };
    TransformPlan {
        operation: state.operation,
        inputs,
        quality: (!settings.use_custom_command).then_some(settings.quality),
        custom_command: settings
            .use_custom_command
            .then(|| settings.custom_command.trim().to_string()),
        advanced: settings.use_advanced.then(|| settings.advanced.clone()),
        split,
    }
}
