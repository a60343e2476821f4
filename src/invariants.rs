// Session invariants — checked after every step by the simulator and trace replay.

use crate::constants::*;
use crate::types::*;

/// pixels_per_mm > 0 and finite, whether estimated or calibrated
pub fn pixel_density_positive(state: &Session) -> bool {
    state.calibration.pixels_per_mm.is_finite() && state.calibration.pixels_per_mm > 0.0
}

pub fn finger_within_range(state: &Session) -> bool {
    (MIN_MEASUREMENT_MM..=MAX_FINGER_MM).contains(&state.measurement.finger_thickness_mm)
}

pub fn ring_within_range(state: &Session) -> bool {
    let range = MIN_MEASUREMENT_MM..=MAX_RING_MM;
    range.contains(&state.measurement.ring_width_mm)
        && range.contains(&state.measurement.ring_height_mm)
}

/// shapeMode == circle implies ringWidth == ringHeight
pub fn circle_has_single_diameter(state: &Session) -> bool {
    if state.shape_mode == ShapeMode::Circle {
        state.measurement.ring_width_mm == state.measurement.ring_height_mm
    } else {
        true
    }
}

/// A result can only exist after calibration.
pub fn result_requires_calibration(state: &Session) -> bool {
    state.result.is_none() || state.calibration.is_calibrated
}

/// Reference drafts stay usable for calibration. The initial drafts come from the
/// screen estimate, so only positivity holds before the first slider move.
pub fn drafts_positive(state: &Session) -> bool {
    [ReferenceObject::Card, ReferenceObject::Coin]
        .into_iter()
        .all(|object| {
            let px = state.draft_px(object);
            px.is_finite() && px > 0.0
        })
}

/// All individual invariants with names for reporting.
pub const ALL_INVARIANTS: &[(&str, fn(&Session) -> bool)] = &[
    ("pixelDensityPositive", pixel_density_positive),
    ("fingerWithinRange", finger_within_range),
    ("ringWithinRange", ring_within_range),
    ("circleHasSingleDiameter", circle_has_single_diameter),
    ("resultRequiresCalibration", result_requires_calibration),
    ("draftsPositive", drafts_positive),
];

pub fn session_invariant(state: &Session) -> bool {
    ALL_INVARIANTS.iter().all(|(_, check)| check(state))
}

/// Check all invariants and return the name of the first violated one, if any.
pub fn check_invariants(state: &Session) -> Result<(), &'static str> {
    for (name, check) in ALL_INVARIANTS {
        if !check(state) {
            return Err(name);
        }
    }
    Ok(())
}

/// Properties of a single step rather than of a single state.
pub fn check_step(before: &Session, label: &TransitionLabel, after: &Session) -> Result<(), &'static str> {
    if before.locked && label.is_measurement_input() && after.measurement != before.measurement {
        return Err("lockedInputsAreInert");
    }
    if after.measurement != before.measurement && after.result.is_some() {
        return Err("adjustmentInvalidatesResult");
    }
    Ok(())
}
