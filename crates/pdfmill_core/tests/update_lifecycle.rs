use std::sync::Once;

use pdfmill_core::{
    update, AppState, Effect, FileEntry, Msg, OperationKind, OperationState, ProgressSnapshot,
    QualityPreset, RasterPayload, TargetFormat, TransformPayload,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(mill_logging::initialize_for_tests);
}

fn doc(handle: u64, name: &str) -> FileEntry {
    FileEntry::new(handle, name, Some("application/pdf"))
}

fn image(handle: u64, name: &str) -> FileEntry {
    FileEntry::new(handle, name, Some("image/png"))
}

fn select(state: AppState, entries: Vec<FileEntry>) -> (AppState, Vec<Effect>) {
    update(state, Msg::FilesSelected(entries))
}

#[test]
fn compress_flow_reaches_to_be_downloaded() {
    init_logging();
    let state = AppState::new(OperationKind::Compress);
    assert_eq!(state.op_state(), OperationState::Init);

    let (state, effects) = select(state, vec![doc(1, "report.pdf")]);
    assert_eq!(state.op_state(), OperationState::Selected);
    assert!(effects.is_empty());

    let (state, effects) = update(state, Msg::SubmitRequested);
    assert_eq!(state.op_state(), OperationState::Loading);
    assert_eq!(effects.len(), 1);
    match &effects[0] {
        Effect::RunTransform(plan) => {
            assert_eq!(plan.operation, OperationKind::Compress);
            assert_eq!(plan.inputs, vec![1]);
            assert_eq!(plan.quality, Some(QualityPreset::Ebook));
            assert_eq!(plan.custom_command, None);
            assert_eq!(plan.split, None);
        }
        other => panic!("expected RunTransform, got {other:?}"),
    }

    let (state, _effects) = update(
        state,
        Msg::TransformDone {
            result: Ok(TransformPayload {
                handle: 50,
                byte_len: 1024,
            }),
            completed_ms: 0,
        },
    );
    assert_eq!(state.op_state(), OperationState::ToBeDownloaded);
    let view = state.view();
    assert_eq!(view.downloads.len(), 1);
    assert_eq!(view.downloads[0].filename, "report-compressed.pdf");
    assert_eq!(view.downloads[0].handle, 50);
    assert_eq!(view.downloads[0].byte_len, 1024);
}

#[test]
fn progress_snapshot_is_zero_after_entering_loading() {
    init_logging();
    let state = AppState::new(OperationKind::Compress);
    let (state, _) = select(state, vec![doc(1, "a.pdf")]);
    let (state, _) = update(state, Msg::ProgressToggled(true));
    let (state, _) = update(state, Msg::SubmitRequested);

    let (state, _) = update(
        state,
        Msg::EngineLine("Processing pages 1 through 9.".into()),
    );
    let (state, _) = update(state, Msg::EngineLine("Page 4".into()));
    assert_eq!(
        state.view().progress,
        Some(ProgressSnapshot {
            current: 4,
            total: 9,
            current_page: 4
        })
    );

    let (state, _) = update(
        state,
        Msg::TransformDone {
            result: Ok(TransformPayload {
                handle: 51,
                byte_len: 10,
            }),
            completed_ms: 0,
        },
    );
    // Reprocess with the same file: progress must re-zero on loading.
    let (state, effects) = update(state, Msg::ProcessAgainRequested);
    assert_eq!(state.op_state(), OperationState::Loading);
    assert_eq!(state.view().progress, Some(ProgressSnapshot::default()));
    // The superseded download's handle is released before the new run.
    assert!(effects.contains(&Effect::ReleaseHandles(vec![51])));
}

#[test]
fn unmatched_engine_lines_feed_the_raw_log() {
    init_logging();
    let state = AppState::new(OperationKind::Compress);
    let (state, _) = select(state, vec![doc(1, "a.pdf")]);
    let (state, _) = update(state, Msg::SubmitRequested);

    let (state, _) = update(state, Msg::EngineLine("GPL Ghostscript".into()));
    let (state, _) = update(state, Msg::EngineLine("Page 2".into()));

    // The log display is opt-in, but the matched progress line is never
    // mixed into it.
    assert_eq!(state.view().terminal, None);
    let (state, _) = update(state, Msg::TerminalToggled(true));
    assert_eq!(
        state.view().terminal.as_deref(),
        Some("GPL Ghostscript\n")
    );
}

#[test]
fn merge_with_one_file_is_rejected_without_entering_loading() {
    init_logging();
    let state = AppState::new(OperationKind::Merge);
    let (state, _) = select(state, vec![doc(1, "only.pdf")]);

    let (state, effects) = update(state, Msg::SubmitRequested);
    assert_eq!(state.op_state(), OperationState::Selected);
    assert!(effects.is_empty());
    assert!(!state.view().validation_warning.is_empty());
}

#[test]
fn merge_dispatches_inputs_in_list_order() {
    init_logging();
    let state = AppState::new(OperationKind::Merge);
    let (state, _) = select(state, vec![doc(1, "a.pdf"), doc(2, "b.pdf"), doc(3, "c.pdf")]);
    assert!(state.view().reorder_enabled);

    let (state, _) = update(state, Msg::FileMoved { source: 0, target: 2 });
    let (state, effects) = update(state, Msg::SubmitRequested);
    match &effects[0] {
        Effect::RunTransform(plan) => assert_eq!(plan.inputs, vec![2, 3, 1]),
        other => panic!("expected RunTransform, got {other:?}"),
    }
    assert_eq!(state.op_state(), OperationState::Loading);
}

#[test]
fn merge_filename_is_synthesized_from_timestamp() {
    init_logging();
    let state = AppState::new(OperationKind::Merge);
    let (state, _) = select(state, vec![doc(1, "a.pdf"), doc(2, "b.pdf")]);
    let (state, _) = update(state, Msg::SubmitRequested);
    let (state, _) = update(
        state,
        Msg::TransformDone {
            result: Ok(TransformPayload {
                handle: 9,
                byte_len: 5,
            }),
            completed_ms: 1700000000000,
        },
    );
    assert_eq!(state.view().downloads[0].filename, "merged-1700000000000.pdf");
}

#[test]
fn reorder_is_rejected_outside_order_sensitive_contexts() {
    init_logging();
    let state = AppState::new(OperationKind::Compress);
    let (state, _) = select(state, vec![doc(1, "a.pdf")]);
    assert!(!state.view().reorder_enabled);

    let before = state.view().files.clone();
    let (state, _) = update(state, Msg::FileMoved { source: 0, target: 0 });
    assert_eq!(state.view().files, before);
}

#[test]
fn split_range_is_validated_before_dispatch() {
    init_logging();
    let state = AppState::new(OperationKind::Split);
    let (state, _) = select(state, vec![doc(1, "book.pdf")]);

    // Missing range.
    let (state, effects) = update(state, Msg::SubmitRequested);
    assert!(effects.is_empty());
    assert!(!state.view().validation_warning.is_empty());

    // Non-numeric range.
    let (state, _) = update(
        state,
        Msg::SplitRangeChanged {
            start: "two".into(),
            end: "9".into(),
        },
    );
    let (state, effects) = update(state, Msg::SubmitRequested);
    assert!(effects.is_empty());
    assert_eq!(state.op_state(), OperationState::Selected);

    // Reversed range.
    let (state, _) = update(
        state,
        Msg::SplitRangeChanged {
            start: "9".into(),
            end: "2".into(),
        },
    );
    let (state, effects) = update(state, Msg::SubmitRequested);
    assert!(effects.is_empty());

    // Valid range dispatches and names the output from it.
    let (state, _) = update(
        state,
        Msg::SplitRangeChanged {
            start: "2".into(),
            end: "9".into(),
        },
    );
    let (state, effects) = update(state, Msg::SubmitRequested);
    match &effects[0] {
        Effect::RunTransform(plan) => assert_eq!(plan.split, Some((2, 9))),
        other => panic!("expected RunTransform, got {other:?}"),
    }
    let (state, _) = update(
        state,
        Msg::TransformDone {
            result: Ok(TransformPayload {
                handle: 7,
                byte_len: 3,
            }),
            completed_ms: 0,
        },
    );
    assert_eq!(state.view().downloads[0].filename, "book-split-2-9.pdf");
}

#[test]
fn split_name_keeps_the_dispatched_range_despite_later_edits() {
    init_logging();
    let state = AppState::new(OperationKind::Split);
    let (state, _) = select(state, vec![doc(1, "book.pdf")]);
    let (state, _) = update(
        state,
        Msg::SplitRangeChanged {
            start: "2".into(),
            end: "9".into(),
        },
    );
    let (state, _) = update(state, Msg::SubmitRequested);
    assert_eq!(state.op_state(), OperationState::Loading);

    // Range edits made while the engine runs do not affect the job that
    // is already in flight, so they must not rename its result either.
    let (state, _) = update(
        state,
        Msg::SplitRangeChanged {
            start: "7".into(),
            end: "8".into(),
        },
    );
    let (state, _) = update(
        state,
        Msg::TransformDone {
            result: Ok(TransformPayload {
                handle: 7,
                byte_len: 3,
            }),
            completed_ms: 0,
        },
    );
    assert_eq!(state.view().downloads[0].filename, "book-split-2-9.pdf");
}

#[test]
fn convert_document_resolves_pages_and_names_per_page() {
    init_logging();
    let state = AppState::new(OperationKind::Convert);
    let (state, effects) = select(state, vec![doc(1, "scan.pdf")]);
    assert_eq!(effects, vec![Effect::ProbeDocument { handle: 1 }]);
    assert_eq!(
        state.view().supported_targets,
        vec![
            TargetFormat::Jpg,
            TargetFormat::Jpeg,
            TargetFormat::Png,
            TargetFormat::Bmp
        ]
    );

    let (state, _) = update(state, Msg::ProbeDone { page_count: 3 });
    let (state, _) = update(state, Msg::TargetFormatChanged(TargetFormat::Png));
    let (state, _) = update(state, Msg::PageSelectionChanged("2,3".into()));
    let (state, effects) = update(state, Msg::SubmitRequested);
    assert_eq!(
        effects,
        vec![Effect::ConvertPages {
            handle: 1,
            format: TargetFormat::Png,
            pages: vec![2, 3],
        }]
    );

    // Structured per-page progress from the render walk.
    let (state, _) = update(state, Msg::ProgressToggled(true));
    let (state, _) = update(
        state,
        Msg::OperationProgress {
            current: 1,
            total: 2,
            page: 2,
        },
    );
    assert_eq!(
        state.view().progress,
        Some(ProgressSnapshot {
            current: 1,
            total: 2,
            current_page: 2
        })
    );

    let (state, _) = update(
        state,
        Msg::ConvertPagesDone {
            result: Ok(vec![
                RasterPayload {
                    handle: 20,
                    byte_len: 100,
                    page: 2,
                },
                RasterPayload {
                    handle: 21,
                    byte_len: 110,
                    page: 3,
                },
            ]),
        },
    );
    let view = state.view();
    assert_eq!(view.op_state, OperationState::ToBeDownloaded);
    assert_eq!(view.downloads[0].filename, "scan-page-2.png");
    assert_eq!(view.downloads[1].filename, "scan-page-3.png");
    assert_eq!(view.downloads[0].page, Some(2));
    assert_eq!(view.downloads[0].total_pages, Some(3));
}

#[test]
fn convert_single_page_document_keeps_plain_name() {
    init_logging();
    let state = AppState::new(OperationKind::Convert);
    let (state, _) = select(state, vec![doc(1, "scan.pdf")]);
    let (state, _) = update(state, Msg::ProbeDone { page_count: 1 });
    let (state, _) = update(state, Msg::TargetFormatChanged(TargetFormat::Jpg));
    let (state, _) = update(state, Msg::SubmitRequested);
    let (state, _) = update(
        state,
        Msg::ConvertPagesDone {
            result: Ok(vec![RasterPayload {
                handle: 30,
                byte_len: 42,
                page: 1,
            }]),
        },
    );
    assert_eq!(state.view().downloads[0].filename, "scan.jpg");
}

#[test]
fn convert_rejects_mixed_batch_with_descriptive_error() {
    init_logging();
    let state = AppState::new(OperationKind::Convert);
    let (state, _) = select(state, vec![doc(1, "scan.pdf"), image(2, "photo.png")]);
    let (state, _) = update(state, Msg::TargetFormatChanged(TargetFormat::Png));
    let (state, effects) = update(state, Msg::SubmitRequested);
    assert!(effects.is_empty());
    assert_eq!(state.op_state(), OperationState::Selected);
    assert!(state.view().validation_warning.contains("Mixed file types"));
}

#[test]
fn convert_empty_page_selection_after_parsing_is_a_validation_error() {
    init_logging();
    let state = AppState::new(OperationKind::Convert);
    let (state, _) = select(state, vec![doc(1, "scan.pdf")]);
    let (state, _) = update(state, Msg::ProbeDone { page_count: 5 });
    let (state, _) = update(state, Msg::TargetFormatChanged(TargetFormat::Png));
    let (state, _) = update(state, Msg::PageSelectionChanged("abc".into()));
    let (state, effects) = update(state, Msg::SubmitRequested);
    assert!(effects.is_empty());
    assert_eq!(state.op_state(), OperationState::Selected);
    assert!(state
        .view()
        .validation_warning
        .contains("matches no pages"));

    // An empty selection string still means all pages.
    let (state, _) = update(state, Msg::PageSelectionChanged(String::new()));
    let (_state, effects) = update(state, Msg::SubmitRequested);
    assert_eq!(
        effects,
        vec![Effect::ConvertPages {
            handle: 1,
            format: TargetFormat::Png,
            pages: vec![1, 2, 3, 4, 5],
        }]
    );
}

#[test]
fn convert_images_builds_a_document() {
    init_logging();
    let state = AppState::new(OperationKind::Convert);
    let (state, _) = select(state, vec![image(1, "a.png"), image(2, "b.jpg")]);
    assert_eq!(state.view().supported_targets, vec![TargetFormat::Pdf]);
    assert!(state.view().reorder_enabled);

    let (state, _) = update(state, Msg::TargetFormatChanged(TargetFormat::Pdf));
    let (state, effects) = update(state, Msg::SubmitRequested);
    assert_eq!(effects, vec![Effect::BuildDocument { handles: vec![1, 2] }]);

    let (state, _) = update(
        state,
        Msg::BuildDone {
            result: Ok(TransformPayload {
                handle: 40,
                byte_len: 7,
            }),
        },
    );
    assert_eq!(state.view().downloads[0].filename, "a.pdf");
}

#[test]
fn engine_reported_error_is_surfaced_verbatim() {
    init_logging();
    let state = AppState::new(OperationKind::Compress);
    let (state, _) = select(state, vec![doc(1, "a.pdf")]);
    let (state, _) = update(state, Msg::SubmitRequested);
    let (state, _) = update(
        state,
        Msg::TransformDone {
            result: Err("Error: /invalidfileaccess in --file--".into()),
            completed_ms: 0,
        },
    );
    assert_eq!(state.op_state(), OperationState::Error);
    assert_eq!(
        state.view().error_message,
        "Error: /invalidfileaccess in --file--"
    );
    // Streaming displays stop with the failure.
    assert_eq!(state.view().progress, None);
}

#[test]
fn custom_command_must_name_device_and_output() {
    init_logging();
    let state = AppState::new(OperationKind::Compress);
    let (state, _) = select(state, vec![doc(1, "a.pdf")]);
    let (state, _) = update(state, Msg::CustomCommandToggled(true));

    let (state, effects) = update(state, Msg::SubmitRequested);
    assert!(effects.is_empty());

    let (state, _) = update(
        state,
        Msg::CustomCommandChanged("-dBATCH -sDEVICE=pdfwrite".into()),
    );
    let (state, effects) = update(state, Msg::SubmitRequested);
    assert!(effects.is_empty());
    assert!(state.view().validation_warning.contains("-sOutputFile="));

    let (state, _) = update(
        state,
        Msg::CustomCommandChanged("-sDEVICE=pdfwrite -sOutputFile=out.pdf in.pdf".into()),
    );
    let (state, effects) = update(state, Msg::SubmitRequested);
    assert_eq!(state.op_state(), OperationState::Loading);
    match &effects[0] {
        Effect::RunTransform(plan) => {
            assert_eq!(plan.quality, None);
            assert_eq!(
                plan.custom_command.as_deref(),
                Some("-sDEVICE=pdfwrite -sOutputFile=out.pdf in.pdf")
            );
        }
        other => panic!("expected RunTransform, got {other:?}"),
    }
}

#[test]
fn full_reset_releases_every_handle_exactly_once() {
    init_logging();
    let state = AppState::new(OperationKind::Compress);
    let (state, _) = select(state, vec![doc(1, "a.pdf")]);
    let (state, _) = update(state, Msg::SubmitRequested);
    let (state, _) = update(
        state,
        Msg::TransformDone {
            result: Ok(TransformPayload {
                handle: 2,
                byte_len: 1,
            }),
            completed_ms: 0,
        },
    );

    let (state, effects) = update(state, Msg::ResetRequested);
    assert_eq!(state.op_state(), OperationState::Init);
    assert!(state.view().files.is_empty());
    assert!(state.view().downloads.is_empty());
    let mut released: Vec<u64> = effects
        .iter()
        .flat_map(|e| match e {
            Effect::ReleaseHandles(handles) => handles.clone(),
            _ => Vec::new(),
        })
        .collect();
    released.sort_unstable();
    assert_eq!(released, vec![1, 2]);

    // A second reset has nothing left to release.
    let (_state, effects) = update(state, Msg::ResetRequested);
    assert!(effects.is_empty());
}

#[test]
fn switching_operation_kind_forces_a_full_reset() {
    init_logging();
    let state = AppState::new(OperationKind::Compress);
    let (state, _) = select(state, vec![doc(1, "a.pdf")]);

    let (state, effects) = update(state, Msg::OperationSelected(OperationKind::Merge));
    assert_eq!(state.operation(), OperationKind::Merge);
    assert_eq!(state.op_state(), OperationState::Init);
    assert_eq!(effects, vec![Effect::ReleaseHandles(vec![1])]);

    // Re-selecting the active kind is a no-op.
    let (_state, effects) = update(state, Msg::OperationSelected(OperationKind::Merge));
    assert!(effects.is_empty());
}

#[test]
fn selection_batch_outside_form_states_is_released_not_kept() {
    init_logging();
    let state = AppState::new(OperationKind::Compress);
    let (state, _) = select(state, vec![doc(1, "a.pdf")]);
    let (state, _) = update(state, Msg::SubmitRequested);

    // Loading: a stray selection must not be adopted, and its handles
    // must not leak.
    let (state, effects) = update(state, Msg::FilesSelected(vec![doc(9, "late.pdf")]));
    assert_eq!(state.op_state(), OperationState::Loading);
    assert_eq!(effects, vec![Effect::ReleaseHandles(vec![9])]);
    assert_eq!(state.view().files.len(), 1);
}

#[test]
fn non_document_files_are_filtered_at_intake() {
    init_logging();
    let state = AppState::new(OperationKind::Compress);
    let (state, effects) = select(
        state,
        vec![doc(1, "a.pdf"), FileEntry::new(2, "notes.txt", None)],
    );
    assert_eq!(state.view().files.len(), 1);
    assert_eq!(effects, vec![Effect::ReleaseHandles(vec![2])]);
}

#[test]
fn removing_the_last_file_returns_to_init() {
    init_logging();
    let state = AppState::new(OperationKind::Compress);
    let (state, _) = select(state, vec![doc(1, "a.pdf")]);
    let (state, effects) = update(state, Msg::FileRemoved(0));
    assert_eq!(state.op_state(), OperationState::Init);
    assert_eq!(effects, vec![Effect::ReleaseHandles(vec![1])]);
}
