// Model-Based Testing — deterministic trace replay.
// Given a sequence of TransitionLabels, applies each to the session logic
// and returns the resulting state sequence.

use crate::invariants;
use crate::logic;
use crate::types::*;

/// Apply a single labeled transition to the session.
/// Dispatches to the correct logic function using parameters embedded in the label.
pub fn apply_transition(state: &Session, label: &TransitionLabel) -> TransitionResult {
    match label {
        TransitionLabel::NoAction => TransitionResult::accepted(state.clone()),
        TransitionLabel::SetCalibrationDraft { object, px } => {
            logic::set_calibration_draft(state, *object, *px)
        }
        TransitionLabel::ConfirmCalibration { object } => logic::confirm_calibration(state, *object),
        TransitionLabel::SelectTab { tab } => logic::select_tab(state, *tab),
        TransitionLabel::SetShapeMode { mode } => logic::set_shape_mode(state, *mode),
        TransitionLabel::ToggleLock => logic::toggle_lock(state),
        TransitionLabel::Nudge {
            dimension,
            direction,
        } => logic::nudge(state, *dimension, *direction),
        TransitionLabel::Slide {
            dimension,
            value_mm,
        } => logic::slide(state, *dimension, *value_mm),
        TransitionLabel::DragFinger { pointer_y, surface } => {
            logic::drag_finger(state, *pointer_y, *surface)
        }
        TransitionLabel::DragRingWidth { pointer_x, surface } => {
            logic::drag_ring_width(state, *pointer_x, *surface)
        }
        TransitionLabel::DragRingHeight { pointer_y, surface } => {
            logic::drag_ring_height(state, *pointer_y, *surface)
        }
        TransitionLabel::RingPointerMove {
            pointer_x,
            pointer_y,
            surface,
        } => logic::ring_pointer_move(state, *pointer_x, *pointer_y, *surface),
        TransitionLabel::CalculateFinger => logic::calculate_finger_size(state),
        TransitionLabel::CalculateRing => logic::calculate_ring_size(state),
        TransitionLabel::Reset => logic::reset(state),
    }
}

/// Replay a full trace of labeled transitions starting from `init`.
/// Each step must succeed; panics with a descriptive message if a transition fails.
/// Returns the sequence of (label, resulting state) pairs.
pub fn replay_trace(init: Session, labels: &[TransitionLabel]) -> Vec<(TransitionLabel, Session)> {
    let mut trace = Vec::with_capacity(labels.len());
    let mut state = init;

    for (i, label) in labels.iter().enumerate() {
        let result = apply_transition(&state, label);
        assert!(
            result.success,
            "Transition {} failed at step {} from state:\n{}",
            label, i, state,
        );

        if let Err(violated) = invariants::check_invariants(&result.new_state) {
            panic!(
                "Invariant '{}' violated after step {} ({})\nState:\n{}",
                violated, i, label, result.new_state,
            );
        }
        if let Err(violated) = invariants::check_step(&state, label, &result.new_state) {
            panic!(
                "Step property '{}' violated at step {} ({})\nState:\n{}",
                violated, i, label, result.new_state,
            );
        }

        state = result.new_state;
        trace.push((label.clone(), state.clone()));
    }

    trace
}

/// Apply labels in order, skipping rejected ones, and return the final session.
/// This is how a host adapter feeds raw UI events through.
pub fn run_events(init: Session, labels: &[TransitionLabel]) -> Session {
    labels.iter().fold(init, |state, label| {
        apply_transition(&state, label).new_state
    })
}
