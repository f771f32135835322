use std::collections::BTreeSet;
use std::sync::Once;

use pdfmill_core::{
    update, AppState, Effect, FileEntry, Msg, OperationKind, OperationState, ParsedPage, Rect,
    SelectionEvent, TextRun,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(mill_logging::initialize_for_tests);
}

fn doc(handle: u64, name: &str) -> FileEntry {
    FileEntry::new(handle, name, Some("application/pdf"))
}

fn run(text: &str, x: f64, y: f64) -> TextRun {
    TextRun {
        text: text.to_string(),
        transform: [10.0, 0.0, 0.0, 10.0, x, y],
        width: 50.0,
    }
}

fn two_page_document() -> Vec<ParsedPage> {
    vec![
        ParsedPage {
            width: 200.0,
            height: 100.0,
            runs: vec![run("alpha", 0.0, 80.0), run("beta", 60.0, 80.0)],
        },
        ParsedPage {
            width: 200.0,
            height: 100.0,
            runs: vec![run("gamma", 0.0, 40.0)],
        },
    ]
}

/// Drives a fresh session to the parsed state with the fixture document.
fn parsed_state() -> AppState {
    let state = AppState::new(OperationKind::Parse);
    let (state, effects) = update(state, Msg::FilesSelected(vec![doc(1, "paper.pdf")]));
    assert_eq!(effects, vec![Effect::ProbeDocument { handle: 1 }]);
    let (state, _) = update(state, Msg::ProbeDone { page_count: 2 });
    let (state, effects) = update(state, Msg::SubmitRequested);
    assert_eq!(effects, vec![Effect::ParseDocument { handle: 1 }]);
    assert_eq!(state.op_state(), OperationState::Loading);
    let (state, _) = update(
        state,
        Msg::ParseDone {
            result: Ok(two_page_document()),
        },
    );
    assert_eq!(state.op_state(), OperationState::Parsed);
    state
}

#[test]
fn parse_flow_exposes_page_text_and_count() {
    init_logging();
    let state = parsed_state();
    let view = state.view().parse.expect("parse view present");
    assert_eq!(view.current_page, 1);
    assert_eq!(view.page_count, 2);
    assert_eq!(view.page_text, "alpha beta");
    assert!(view.highlighted.is_empty());
    assert!(view.overlay_highlight_boxes.is_empty());
    assert!(view.listing_highlight_spans.is_empty());
}

#[test]
fn overlay_selection_highlights_both_surfaces() {
    init_logging();
    let state = parsed_state();
    // At scale 1 the first run's box covers x in [0, 50), y in [10, 20).
    let (state, effects) = update(
        state,
        Msg::TextSelected(SelectionEvent::Overlay {
            rect: Rect::new(5.0, 12.0, 10.0, 5.0),
        }),
    );
    assert!(effects.is_empty());

    let view = state.view().parse.unwrap();
    assert_eq!(view.highlighted, BTreeSet::from([0]));
    assert_eq!(view.overlay_highlight_boxes.len(), 1);
    assert_eq!(view.overlay_highlight_boxes[0], Rect::new(0.0, 10.0, 50.0, 10.0));
    // "alpha" occupies characters [0, 5) of "alpha beta".
    assert_eq!(view.listing_highlight_spans, vec![(0, 5)]);
}

#[test]
fn listing_selection_highlights_both_surfaces() {
    init_logging();
    let state = parsed_state();
    // Characters [3, 8) of "alpha beta" touch both runs.
    let (state, _) = update(
        state,
        Msg::TextSelected(SelectionEvent::Listing { start: 3, end: 8 }),
    );

    let view = state.view().parse.unwrap();
    assert_eq!(view.highlighted, BTreeSet::from([0, 1]));
    assert_eq!(view.overlay_highlight_boxes.len(), 2);
    assert_eq!(view.listing_highlight_spans, vec![(0, 5), (6, 10)]);
}

#[test]
fn new_selection_replaces_the_previous_one() {
    init_logging();
    let state = parsed_state();
    let (state, _) = update(
        state,
        Msg::TextSelected(SelectionEvent::Listing { start: 0, end: 10 }),
    );
    assert_eq!(state.view().parse.unwrap().highlighted, BTreeSet::from([0, 1]));

    let (state, _) = update(
        state,
        Msg::TextSelected(SelectionEvent::Listing { start: 6, end: 10 }),
    );
    assert_eq!(state.view().parse.unwrap().highlighted, BTreeSet::from([1]));
}

#[test]
fn cleared_selection_empties_the_current_page_only() {
    init_logging();
    let state = parsed_state();
    let (state, _) = update(
        state,
        Msg::TextSelected(SelectionEvent::Listing { start: 0, end: 5 }),
    );
    let (state, _) = update(state, Msg::PageSelected(2));
    let (state, _) = update(
        state,
        Msg::TextSelected(SelectionEvent::Listing { start: 0, end: 5 }),
    );
    assert_eq!(state.view().parse.unwrap().highlighted, BTreeSet::from([0]));

    let (state, _) = update(state, Msg::TextSelected(SelectionEvent::Cleared));
    assert!(state.view().parse.unwrap().highlighted.is_empty());

    // Page 1 keeps its own highlight.
    let (state, _) = update(state, Msg::PageSelected(1));
    assert_eq!(state.view().parse.unwrap().highlighted, BTreeSet::from([0]));
}

#[test]
fn selection_outside_both_surfaces_clears_like_a_collapse() {
    init_logging();
    let state = parsed_state();
    let (state, _) = update(
        state,
        Msg::TextSelected(SelectionEvent::Listing { start: 0, end: 10 }),
    );
    let (state, _) = update(state, Msg::TextSelected(SelectionEvent::OutsideSurfaces));
    assert!(state.view().parse.unwrap().highlighted.is_empty());
}

#[test]
fn empty_intersection_stores_an_explicit_empty_set() {
    init_logging();
    let state = parsed_state();
    let (state, _) = update(
        state,
        Msg::TextSelected(SelectionEvent::Listing { start: 0, end: 10 }),
    );
    // A rectangle over empty space intersects no run box.
    let (state, _) = update(
        state,
        Msg::TextSelected(SelectionEvent::Overlay {
            rect: Rect::new(150.0, 80.0, 5.0, 5.0),
        }),
    );
    assert!(state.view().parse.unwrap().highlighted.is_empty());
}

#[test]
fn page_switch_is_bounds_checked() {
    init_logging();
    let state = parsed_state();
    let (state, _) = update(state, Msg::PageSelected(0));
    assert_eq!(state.view().parse.unwrap().current_page, 1);
    let (state, _) = update(state, Msg::PageSelected(3));
    assert_eq!(state.view().parse.unwrap().current_page, 1);
    let (state, _) = update(state, Msg::PageSelected(2));
    let view = state.view().parse.unwrap();
    assert_eq!(view.current_page, 2);
    assert_eq!(view.page_text, "gamma");
}

#[test]
fn overlay_scale_rescales_highlight_boxes() {
    init_logging();
    let state = parsed_state();
    let (state, _) = update(
        state,
        Msg::TextSelected(SelectionEvent::Listing { start: 0, end: 5 }),
    );
    let (state, _) = update(state, Msg::OverlayScaleChanged(2.0));
    let view = state.view().parse.unwrap();
    assert_eq!(view.overlay_highlight_boxes[0], Rect::new(0.0, 20.0, 100.0, 20.0));

    // A non-positive scale is rejected.
    let (state, _) = update(state, Msg::OverlayScaleChanged(0.0));
    let view = state.view().parse.unwrap();
    assert_eq!(view.overlay_highlight_boxes[0].width, 100.0);
}

#[test]
fn selections_are_ignored_outside_the_parsed_state() {
    init_logging();
    let state = AppState::new(OperationKind::Parse);
    let (state, _) = update(state, Msg::FilesSelected(vec![doc(1, "paper.pdf")]));
    let (state, effects) = update(
        state,
        Msg::TextSelected(SelectionEvent::Listing { start: 0, end: 5 }),
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().parse, None);
    assert_eq!(state.op_state(), OperationState::Selected);
}

#[test]
fn reparse_clears_the_previous_document_and_highlights() {
    init_logging();
    let state = parsed_state();
    let (state, _) = update(
        state,
        Msg::TextSelected(SelectionEvent::Listing { start: 0, end: 5 }),
    );
    let (state, _) = update(state, Msg::PageSelected(2));

    let (state, effects) = update(state, Msg::ProcessAgainRequested);
    assert_eq!(state.op_state(), OperationState::Loading);
    assert_eq!(effects, vec![Effect::ParseDocument { handle: 1 }]);
    assert_eq!(state.view().parse, None);

    let (state, _) = update(
        state,
        Msg::ParseDone {
            result: Ok(two_page_document()),
        },
    );
    let view = state.view().parse.unwrap();
    assert_eq!(view.current_page, 1);
    assert!(view.highlighted.is_empty());
}

#[test]
fn parse_failure_surfaces_the_engine_message() {
    init_logging();
    let state = AppState::new(OperationKind::Parse);
    let (state, _) = update(state, Msg::FilesSelected(vec![doc(1, "broken.pdf")]));
    let (state, _) = update(state, Msg::SubmitRequested);
    let (state, _) = update(
        state,
        Msg::ParseDone {
            result: Err("Invalid PDF structure".into()),
        },
    );
    assert_eq!(state.op_state(), OperationState::Error);
    assert_eq!(state.view().error_message, "Invalid PDF structure");
    assert_eq!(state.view().parse, None);
}
