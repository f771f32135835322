use std::collections::BTreeSet;

use crate::document::ParsedDocument;
use crate::effect::Effect;
use crate::filename::{output_filename, OutputNaming};
use crate::files::{FileCategory, FileEntry, HandleId};
use crate::highlight::{listing_spans, overlay_boxes, runs_in_rect, runs_in_span, SelectionEvent};
use crate::msg::Msg;
use crate::progress::{interpret_line, ProgressSnapshot};
use crate::settings::{OperationKind, TargetFormat};
use crate::state::{AppState, DownloadResult, OperationState};
use crate::validate::plan_submission;

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::OperationSelected(kind) => {
            if kind == state.operation {
                Vec::new()
            } else {
                // Switching kind discards everything, including any
                // result that already settled.
                let mut released = state.file_handles();
                released.extend(state.download_handles());
                state.reset();
                state.operation = kind;
                release_effects(released)
            }
        }
        Msg::FilesSelected(entries) => {
            if intake_allowed(state.op_state) {
                let old = state.file_handles();
                replace_files(&mut state, entries, old)
            } else {
                // The batch arrived outside a form state; its handles
                // would otherwise leak.
                release_effects(entries.into_iter().map(|e| e.handle).collect())
            }
        }
        Msg::MoreFilesAdded(entries) => {
            if intake_allowed(state.op_state) {
                let mut kept = state.files.clone();
                let was_empty = kept.is_empty();
                let mut rejected = Vec::new();
                for entry in entries {
                    if state.operation.accepts(entry.category) {
                        kept.push(entry);
                    } else {
                        rejected.push(entry.handle);
                    }
                }
                state.files = kept;
                let mut effects = release_effects(rejected);
                if !state.files.is_empty() {
                    state.op_state = OperationState::Selected;
                    state.validation_warning.clear();
                    if was_empty {
                        effects.extend(probe_effect(&mut state));
                    }
                }
                effects
            } else {
                release_effects(entries.into_iter().map(|e| e.handle).collect())
            }
        }
        Msg::FileRemoved(index) => {
            if intake_allowed(state.op_state) && index < state.files.len() {
                let removed = state.files.remove(index);
                let mut effects = release_effects(vec![removed.handle]);
                if state.files.is_empty() {
                    state.op_state = OperationState::Init;
                    state.clear_selection_settings();
                } else if index == 0 {
                    // The primary document changed; its page count must
                    // be resolved again.
                    effects.extend(probe_effect(&mut state));
                }
                effects
            } else {
                Vec::new()
            }
        }
        Msg::FilesCleared => {
            if intake_allowed(state.op_state) {
                let released = state.file_handles();
                state.files.clear();
                state.op_state = OperationState::Init;
                state.clear_selection_settings();
                state.validation_warning.clear();
                release_effects(released)
            } else {
                Vec::new()
            }
        }
        Msg::FileMoved { source, target } => {
            if state.reorder_enabled()
                && source < state.files.len()
                && target < state.files.len()
            {
                state.files = crate::reorder::move_item(&state.files, source, target);
            }
            Vec::new()
        }
        Msg::QualityChanged(preset) => {
            state.settings.quality = preset;
            Vec::new()
        }
        Msg::CustomCommandToggled(enabled) => {
            state.settings.use_custom_command = enabled;
            Vec::new()
        }
        Msg::CustomCommandChanged(command) => {
            state.settings.custom_command = command;
            Vec::new()
        }
        Msg::AdvancedToggled(enabled) => {
            state.settings.use_advanced = enabled;
            Vec::new()
        }
        Msg::AdvancedChanged(advanced) => {
            state.settings.advanced = advanced;
            Vec::new()
        }
        Msg::SplitRangeChanged { start, end } => {
            state.settings.split_range.start = start;
            state.settings.split_range.end = end;
            Vec::new()
        }
        Msg::TargetFormatChanged(format) => {
            state.settings.target_format = Some(format);
            Vec::new()
        }
        Msg::PageSelectionChanged(selection) => {
            state.settings.page_selection = selection;
            Vec::new()
        }
        Msg::TerminalToggled(enabled) => {
            state.settings.show_terminal_output = enabled;
            Vec::new()
        }
        Msg::ProgressToggled(enabled) => {
            state.settings.show_progress_bar = enabled;
            Vec::new()
        }
        Msg::SubmitRequested => submit(&mut state, false),
        Msg::ProcessAgainRequested => submit(&mut state, true),
        Msg::ResetRequested => {
            let mut released = state.file_handles();
            released.extend(state.download_handles());
            state.reset();
            release_effects(released)
        }
        Msg::ProbeDone { page_count } => {
            state.settings.page_count = page_count;
            Vec::new()
        }
        Msg::EngineLine(line) => {
            if state.op_state == OperationState::Loading {
                let matched = interpret_line(&mut state.progress, &line);
                // The raw log is always kept; the view gates its display.
                if !matched {
                    state.terminal.push_str(&line);
                    state.terminal.push('\n');
                }
            }
            Vec::new()
        }
        Msg::OperationProgress {
            current,
            total,
            page,
        } => {
            if state.op_state == OperationState::Loading {
                state.progress = ProgressSnapshot {
                    current,
                    total,
                    current_page: page,
                };
            }
            Vec::new()
        }
        Msg::TransformDone {
            result,
            completed_ms,
        } => {
            if state.op_state == OperationState::Loading {
                match result {
                    Ok(payload) => {
                        let naming = match state.operation {
                            OperationKind::Merge => OutputNaming::Merge {
                                timestamp_ms: completed_ms,
                            },
                            // Naming reads the pair captured at submit
                            // time; the live split fields may have been
                            // edited since.
                            OperationKind::Split => match state.active_split {
                                Some((start, end)) => OutputNaming::Split { start, end },
                                None => OutputNaming::Compress,
                            },
                            _ => OutputNaming::Compress,
                        };
                        let download = DownloadResult {
                            handle: payload.handle,
                            filename: output_filename(&base_filename(&state), naming),
                            operation: state.operation,
                            page: None,
                            total_pages: None,
                            byte_len: payload.byte_len,
                        };
                        state.enter_downloaded(vec![download]);
                    }
                    Err(message) => state.enter_error(message),
                }
            }
            Vec::new()
        }
        Msg::ConvertPagesDone { result } => {
            if state.op_state == OperationState::Loading {
                match result {
                    Ok(rasters) => {
                        let format = state
                            .settings
                            .target_format
                            .unwrap_or(TargetFormat::Png);
                        let total = state.settings.page_count;
                        let base = base_filename(&state);
                        let downloads = rasters
                            .into_iter()
                            .map(|raster| {
                                let naming = if total > 1 {
                                    OutputNaming::ConvertPage {
                                        format,
                                        page: raster.page,
                                    }
                                } else {
                                    OutputNaming::Convert { format }
                                };
                                DownloadResult {
                                    handle: raster.handle,
                                    filename: output_filename(&base, naming),
                                    operation: OperationKind::Convert,
                                    page: Some(raster.page),
                                    total_pages: Some(total),
                                    byte_len: raster.byte_len,
                                }
                            })
                            .collect();
                        state.enter_downloaded(downloads);
                    }
                    Err(message) => state.enter_error(message),
                }
            }
            Vec::new()
        }
        Msg::BuildDone { result } => {
            if state.op_state == OperationState::Loading {
                match result {
                    Ok(payload) => {
                        let download = DownloadResult {
                            handle: payload.handle,
                            filename: output_filename(
                                &base_filename(&state),
                                OutputNaming::Convert {
                                    format: TargetFormat::Pdf,
                                },
                            ),
                            operation: OperationKind::Convert,
                            page: None,
                            total_pages: None,
                            byte_len: payload.byte_len,
                        };
                        state.enter_downloaded(vec![download]);
                    }
                    Err(message) => state.enter_error(message),
                }
            }
            Vec::new()
        }
        Msg::ParseDone { result } => {
            if state.op_state == OperationState::Loading {
                match result {
                    Ok(pages) => state.enter_parsed(ParsedDocument { pages }),
                    Err(message) => state.enter_error(message),
                }
            }
            Vec::new()
        }
        Msg::PageSelected(page) => {
            if state.op_state == OperationState::Parsed {
                let exists = state
                    .parsed
                    .as_ref()
                    .is_some_and(|doc| doc.page(page).is_some());
                if exists {
                    state.current_page = page;
                }
            }
            Vec::new()
        }
        Msg::OverlayScaleChanged(scale) => {
            if scale > 0.0 {
                state.overlay_scale = scale;
            }
            Vec::new()
        }
        Msg::TextSelected(event) => {
            apply_selection(&mut state, event);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn intake_allowed(op_state: OperationState) -> bool {
    matches!(op_state, OperationState::Init | OperationState::Selected)
}

fn release_effects(handles: Vec<HandleId>) -> Vec<Effect> {
    if handles.is_empty() {
        Vec::new()
    } else {
        vec![Effect::ReleaseHandles(handles)]
    }
}

fn base_filename(state: &AppState) -> String {
    state
        .files
        .first()
        .map(|f| f.filename.clone())
        .unwrap_or_else(|| "output.pdf".to_string())
}

fn replace_files(
    state: &mut AppState,
    entries: Vec<FileEntry>,
    old_handles: Vec<HandleId>,
) -> Vec<Effect> {
    let mut released = old_handles;
    let mut accepted = Vec::new();
    for entry in entries {
        if state.operation.accepts(entry.category) {
            accepted.push(entry);
        } else {
            released.push(entry.handle);
        }
    }

    state.files = accepted;
    state.clear_selection_settings();
    state.validation_warning.clear();
    state.error_message.clear();

    let mut effects = release_effects(released);
    if state.files.is_empty() {
        state.op_state = OperationState::Init;
    } else {
        state.op_state = OperationState::Selected;
        effects.extend(probe_effect(state));
    }
    effects
}

/// Resolve the primary document's page count after selection, where the
/// active operation needs it.
fn probe_effect(state: &mut AppState) -> Option<Effect> {
    if !matches!(
        state.operation,
        OperationKind::Convert | OperationKind::Parse
    ) {
        return None;
    }
    let first = state.files.first()?;
    if first.category != FileCategory::Document {
        return None;
    }
    state.settings.page_count = 0;
    Some(Effect::ProbeDocument {
        handle: first.handle,
    })
}

fn submit(state: &mut AppState, again: bool) -> Vec<Effect> {
    let allowed = if again {
        matches!(
            state.op_state,
            OperationState::Parsed | OperationState::ToBeDownloaded
        ) && !state.files.is_empty()
    } else {
        state.op_state == OperationState::Selected
    };
    if !allowed {
        return Vec::new();
    }

    match plan_submission(state) {
        Err(error) => {
            // Validation failures block the submit but never leave the
            // current state or touch an engine.
            state.validation_warning = error.to_string();
            Vec::new()
        }
        Ok(dispatch) => {
            let released = state.download_handles();
            state.enter_loading();
            state.active_split = match &dispatch {
                Effect::RunTransform(plan) => plan.split,
                _ => None,
            };
            if state.operation == OperationKind::Parse {
                state.parsed = None;
                state.highlights.reset();
                state.current_page = 1;
            }
            let mut effects = release_effects(released);
            effects.push(dispatch);
            effects
        }
    }
}

fn apply_selection(state: &mut AppState, event: SelectionEvent) {
    if state.op_state != OperationState::Parsed {
        return;
    }
    let page_number = state.current_page;
    let Some(parsed) = state.parsed.as_ref() else {
        return;
    };
    let Some(page) = parsed.page(page_number) else {
        return;
    };

    let indices = match event {
        SelectionEvent::Overlay { rect } => {
            runs_in_rect(&overlay_boxes(page, state.overlay_scale), &rect)
        }
        SelectionEvent::Listing { start, end } => runs_in_span(&listing_spans(page), start, end),
        SelectionEvent::Cleared | SelectionEvent::OutsideSurfaces => BTreeSet::new(),
    };
    // Replace, never merge; an empty set is stored explicitly so both
    // surfaces re-derive "nothing highlighted".
    state.highlights.set_page(page_number, indices);
}
