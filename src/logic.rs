// Pure functions — every session operation takes the current session and returns
// a TransitionResult. Rejected operations return the input state unchanged.

use std::f64::consts::PI;

use crate::chart::find_closest_size;
use crate::constants::*;
use crate::error::{Result, RingSizeError};
use crate::types::*;

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn reject(state: &Session, action: &str, reason: &str) -> TransitionResult {
    log::debug!("{action} rejected: {reason}");
    TransitionResult::rejected(state)
}

/// Reason a measurement input cannot run, if any.
fn input_blocked(state: &Session) -> Option<&'static str> {
    if state.locked {
        Some("inputs are locked")
    } else if !state.calibration.is_calibrated {
        Some("screen is not calibrated")
    } else {
        None
    }
}

// ----- Calibration -----

/// Derive a calibrated pixel density from a reference object's on-screen and physical widths.
pub fn calibrate_with_reference_width(observed_px: f64, known_mm: f64) -> Result<CalibrationState> {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if !valid(observed_px) || !valid(known_mm) {
        return Err(RingSizeError::InvalidCalibration {
            observed_px,
            known_mm,
        });
    }
    Ok(CalibrationState {
        pixels_per_mm: observed_px / known_mm,
        is_calibrated: true,
    })
}

fn usable_ratio(calibration: &CalibrationState) -> Result<f64> {
    let ppm = calibration.pixels_per_mm;
    if ppm.is_finite() && ppm > 0.0 {
        Ok(ppm)
    } else {
        Err(RingSizeError::NotCalibrated)
    }
}

pub fn mm_to_pixels(calibration: &CalibrationState, mm: f64) -> Result<f64> {
    Ok(mm * usable_ratio(calibration)?)
}

pub fn pixels_to_mm(calibration: &CalibrationState, px: f64) -> Result<f64> {
    Ok(px / usable_ratio(calibration)?)
}

/// Move the on-screen reference box for `object` to `px` (clamped, whole pixels).
pub fn set_calibration_draft(state: &Session, object: ReferenceObject, px: f64) -> TransitionResult {
    if !px.is_finite() {
        return reject(state, "set_calibration_draft", "draft width is not finite");
    }
    let (min, max) = object.draft_range_px();
    let px = px.clamp(min, max).round();
    let new_state = match object {
        ReferenceObject::Card => Session {
            card_draft_px: px,
            ..state.clone()
        },
        ReferenceObject::Coin => Session {
            coin_draft_px: px,
            ..state.clone()
        },
    };
    TransitionResult::accepted(new_state)
}

/// Accept the current draft for `object` as matching the physical object.
/// Resets the measurements to their defaults.
pub fn confirm_calibration(state: &Session, object: ReferenceObject) -> TransitionResult {
    let calibration = match calibrate_with_reference_width(state.draft_px(object), object.known_width_mm()) {
        Ok(c) => c,
        Err(e) => return reject(state, "confirm_calibration", &e.to_string()),
    };
    log::info!(
        "calibrated with {:?}: {:.4} px/mm",
        object,
        calibration.pixels_per_mm
    );
    TransitionResult::accepted(Session {
        calibration,
        measurement: MeasurementState::default(),
        result: None,
        ..state.clone()
    })
}

// ----- Modes -----

pub fn select_tab(state: &Session, tab: Tab) -> TransitionResult {
    if state.tab == tab {
        return reject(state, "select_tab", "tab already active");
    }
    TransitionResult::accepted(Session {
        tab,
        ..state.clone()
    })
}

/// Switch shape mode. Returning to circle re-syncs the height to the width.
pub fn set_shape_mode(state: &Session, mode: ShapeMode) -> TransitionResult {
    if state.shape_mode == mode {
        return reject(state, "set_shape_mode", "shape mode already active");
    }
    let measurement = match mode {
        ShapeMode::Circle => MeasurementState {
            ring_height_mm: state.measurement.ring_width_mm,
            ..state.measurement
        },
        ShapeMode::Ellipse => state.measurement,
    };
    TransitionResult::accepted(Session {
        shape_mode: mode,
        measurement,
        result: None,
        ..state.clone()
    })
}

pub fn toggle_lock(state: &Session) -> TransitionResult {
    TransitionResult::accepted(Session {
        locked: !state.locked,
        ..state.clone()
    })
}

// ----- Measurement inputs -----

fn commit(state: &Session, dimension: Dimension, mm: f64) -> TransitionResult {
    TransitionResult::accepted(Session {
        measurement: state.measurement.with(dimension, mm, state.shape_mode),
        result: None,
        ..state.clone()
    })
}

/// Stepper press: move `dimension` by one fine step.
pub fn nudge(state: &Session, dimension: Dimension, direction: StepDirection) -> TransitionResult {
    if let Some(reason) = input_blocked(state) {
        return reject(state, "nudge", reason);
    }
    let current = state.measurement.get(dimension);
    let next = dimension.clamp(current + direction.signed_step());
    commit(state, dimension, round_to(next, MEASUREMENT_DECIMALS))
}

/// The value a slider settles on: snapped to the fine-step grid from the range
/// minimum, clamped to the range, rounded to two decimals.
pub fn slider_value(dimension: Dimension, value_mm: f64) -> f64 {
    let (min, _) = dimension.range();
    let snapped = min + ((value_mm - min) / FINE_STEP_MM).round() * FINE_STEP_MM;
    round_to(dimension.clamp(snapped), MEASUREMENT_DECIMALS)
}

/// Slider position.
pub fn slide(state: &Session, dimension: Dimension, value_mm: f64) -> TransitionResult {
    if let Some(reason) = input_blocked(state) {
        return reject(state, "slide", reason);
    }
    if !value_mm.is_finite() {
        return reject(state, "slide", "slider value is not finite");
    }
    commit(state, dimension, slider_value(dimension, value_mm))
}

/// Pointer drag over the finger surface: thickness is the distance from the pointer
/// down to the fixed base line.
pub fn drag_finger(state: &Session, pointer_y: f64, surface: Surface) -> TransitionResult {
    if let Some(reason) = input_blocked(state) {
        return reject(state, "drag_finger", reason);
    }
    if state.tab != Tab::Finger {
        return reject(state, "drag_finger", "finger tab is not active");
    }
    let height_px = surface.baseline_y() - pointer_y;
    if !height_px.is_finite() {
        return reject(state, "drag_finger", "pointer or surface position is not finite");
    }
    let mm = match pixels_to_mm(&state.calibration, height_px) {
        Ok(mm) => mm,
        Err(e) => return reject(state, "drag_finger", &e.to_string()),
    };
    let dimension = Dimension::FingerThickness;
    commit(
        state,
        dimension,
        round_to(dimension.clamp(mm), FINGER_DRAG_DECIMALS),
    )
}

/// Ring diameter along one axis: twice the pointer's distance from the surface center.
fn drag_ring_axis(
    state: &Session,
    action: &str,
    dimension: Dimension,
    distance_px: f64,
) -> TransitionResult {
    if let Some(reason) = input_blocked(state) {
        return reject(state, action, reason);
    }
    if state.tab != Tab::Ring {
        return reject(state, action, "ring tab is not active");
    }
    if !distance_px.is_finite() {
        return reject(state, action, "pointer position is not finite");
    }
    let mm = match pixels_to_mm(&state.calibration, distance_px.abs() * 2.0) {
        Ok(mm) => mm,
        Err(e) => return reject(state, action, &e.to_string()),
    };
    commit(
        state,
        dimension,
        round_to(dimension.clamp(mm), MEASUREMENT_DECIMALS),
    )
}

pub fn drag_ring_width(state: &Session, pointer_x: f64, surface: Surface) -> TransitionResult {
    let (center_x, _) = surface.center();
    drag_ring_axis(state, "drag_ring_width", Dimension::RingWidth, pointer_x - center_x)
}

pub fn drag_ring_height(state: &Session, pointer_y: f64, surface: Surface) -> TransitionResult {
    let (_, center_y) = surface.center();
    drag_ring_axis(state, "drag_ring_height", Dimension::RingHeight, pointer_y - center_y)
}

/// One pointer move over the ring surface: horizontal drag, then vertical drag.
/// In circle mode the vertical reading wins.
pub fn ring_pointer_move(
    state: &Session,
    pointer_x: f64,
    pointer_y: f64,
    surface: Surface,
) -> TransitionResult {
    let horizontal = drag_ring_width(state, pointer_x, surface);
    if !horizontal.success {
        return horizontal;
    }
    let vertical = drag_ring_height(&horizontal.new_state, pointer_y, surface);
    if vertical.success {
        vertical
    } else {
        horizontal
    }
}

/// Restore default measurements and drop any result.
pub fn reset(state: &Session) -> TransitionResult {
    TransitionResult::accepted(Session {
        measurement: MeasurementState::default(),
        result: None,
        ..state.clone()
    })
}

// ----- Size computation -----

/// Diameter used for ring sizing: the width for circles, the mean of both axes for ellipses.
pub fn effective_diameter_mm(measurement: &MeasurementState, shape_mode: ShapeMode) -> f64 {
    match shape_mode {
        ShapeMode::Circle => measurement.ring_width_mm,
        ShapeMode::Ellipse => (measurement.ring_width_mm + measurement.ring_height_mm) / 2.0,
    }
}

fn record_result(state: &Session, value: f64, metric: SizeMetric) -> TransitionResult {
    let entry = find_closest_size(value, metric);
    log::info!(
        "matched size {} by {:?} ({:.2} mm)",
        entry.label,
        metric,
        value
    );
    TransitionResult::accepted(Session {
        result: Some(MeasurementResult {
            entry,
            metric,
            input_mm: value,
        }),
        ..state.clone()
    })
}

pub fn calculate_finger_size(state: &Session) -> TransitionResult {
    if !state.calibration.is_calibrated {
        return reject(state, "calculate_finger_size", "screen is not calibrated");
    }
    let circumference = state.measurement.finger_thickness_mm * PI;
    record_result(state, circumference, SizeMetric::Circumference)
}

pub fn calculate_ring_size(state: &Session) -> TransitionResult {
    if !state.calibration.is_calibrated {
        return reject(state, "calculate_ring_size", "screen is not calibrated");
    }
    let diameter = effective_diameter_mm(&state.measurement, state.shape_mode);
    record_result(state, diameter, SizeMetric::Diameter)
}

// ----- Display helpers -----

/// Height in pixels of the finger proxy above its base line.
pub fn finger_line_px(state: &Session) -> Result<f64> {
    mm_to_pixels(&state.calibration, state.measurement.finger_thickness_mm)
}

/// (width, height) in pixels of the ring overlay.
pub fn ring_overlay_px(state: &Session) -> Result<(f64, f64)> {
    Ok((
        mm_to_pixels(&state.calibration, state.measurement.ring_width_mm)?,
        mm_to_pixels(&state.calibration, state.measurement.ring_height_mm)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_state() -> Session {
        Session::new(DEFAULT_SCREEN_DPI)
    }

    /// Session calibrated to exactly 4 px/mm with a 100px coin.
    fn calibrated_state() -> Session {
        let r = set_calibration_draft(&default_state(), ReferenceObject::Coin, 100.0);
        let r = confirm_calibration(&r.new_state, ReferenceObject::Coin);
        assert!(r.success);
        r.new_state
    }

    fn ring_state(mode: ShapeMode) -> Session {
        Session {
            tab: Tab::Ring,
            shape_mode: mode,
            ..calibrated_state()
        }
    }

    fn assert_close(a: f64, b: f64, tol: f64) {
        assert!((a - b).abs() < tol, "{a} is not within {tol} of {b}");
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(15.04999, 2), 15.05);
        assert_eq!(round_to(12.345, 1), 12.3);
        assert_eq!(round_to(-2.5, 0), -3.0);
    }

    #[test]
    fn test_initial_session() {
        let s = default_state();
        assert!(!s.calibration.is_calibrated);
        assert_close(s.calibration.pixels_per_mm, 96.0 / 25.4, 1e-12);
        assert_close(s.card_draft_px, 96.0 / 25.4 * 53.98, 1e-9);
        assert_close(s.coin_draft_px, 96.0 / 25.4 * 25.0, 1e-9);
        assert_eq!(s.measurement, MeasurementState::default());
        assert_eq!(s.phase(), Phase::Uncalibrated);
    }

    #[test]
    fn test_calibrate_with_reference_width() {
        let c = calibrate_with_reference_width(200.0, CARD_WIDTH_MM).unwrap();
        assert!(c.is_calibrated);
        assert_close(c.pixels_per_mm, 3.705, 1e-3);
        assert_close(mm_to_pixels(&c, 17.0).unwrap(), 62.99, 1e-2);

        assert!(matches!(
            calibrate_with_reference_width(0.0, CARD_WIDTH_MM),
            Err(RingSizeError::InvalidCalibration { .. })
        ));
        assert!(calibrate_with_reference_width(200.0, -1.0).is_err());
        assert!(calibrate_with_reference_width(f64::NAN, 25.0).is_err());
    }

    #[test]
    fn test_conversion_round_trip() {
        let c = calibrate_with_reference_width(317.0, COIN_DIAMETER_MM).unwrap();
        for x in [0.0, 5.0, 17.3, 40.0, 123.456] {
            let back = mm_to_pixels(&c, pixels_to_mm(&c, x).unwrap()).unwrap();
            assert_close(back, x, 1e-9);
        }
    }

    #[test]
    fn test_conversion_requires_positive_ratio() {
        let unset = CalibrationState {
            pixels_per_mm: 0.0,
            is_calibrated: false,
        };
        assert!(matches!(mm_to_pixels(&unset, 10.0), Err(RingSizeError::NotCalibrated)));
        assert!(matches!(pixels_to_mm(&unset, 10.0), Err(RingSizeError::NotCalibrated)));
    }

    #[test]
    fn test_calibration_draft_is_clamped_and_whole() {
        let s = default_state();
        let r = set_calibration_draft(&s, ReferenceObject::Card, 1000.0);
        assert_eq!(r.new_state.card_draft_px, 500.0);
        let r = set_calibration_draft(&s, ReferenceObject::Coin, 10.0);
        assert_eq!(r.new_state.coin_draft_px, 50.0);
        let r = set_calibration_draft(&s, ReferenceObject::Card, 212.6);
        assert_eq!(r.new_state.card_draft_px, 213.0);
        assert!(!set_calibration_draft(&s, ReferenceObject::Card, f64::INFINITY).success);
    }

    #[test]
    fn test_confirm_calibration_resets_measurements() {
        let dirty = Session {
            measurement: MeasurementState {
                finger_thickness_mm: 22.0,
                ring_width_mm: 30.0,
                ring_height_mm: 25.0,
            },
            card_draft_px: 200.0,
            ..default_state()
        };
        let r = confirm_calibration(&dirty, ReferenceObject::Card);
        assert!(r.success);
        assert!(r.new_state.calibration.is_calibrated);
        assert_close(r.new_state.calibration.pixels_per_mm, 200.0 / 53.98, 1e-12);
        assert_eq!(r.new_state.measurement, MeasurementState::default());
        assert_eq!(r.new_state.phase(), Phase::Adjusting);
    }

    #[test]
    fn test_inputs_require_calibration() {
        let s = default_state();
        assert!(!nudge(&s, Dimension::FingerThickness, StepDirection::Increase).success);
        assert!(!slide(&s, Dimension::RingWidth, 20.0).success);
        assert!(!calculate_finger_size(&s).success);
        assert!(!calculate_ring_size(&s).success);
        // Mode switches stay available
        assert!(toggle_lock(&s).success);
        assert!(select_tab(&s, Tab::Ring).success);
    }

    #[test]
    fn test_nudge() {
        let s = calibrated_state();
        let r = nudge(&s, Dimension::FingerThickness, StepDirection::Increase);
        assert!(r.success);
        assert_eq!(r.new_state.measurement.finger_thickness_mm, 15.05);

        let r = nudge(&r.new_state, Dimension::FingerThickness, StepDirection::Decrease);
        let r = nudge(&r.new_state, Dimension::FingerThickness, StepDirection::Decrease);
        assert_eq!(r.new_state.measurement.finger_thickness_mm, 14.95);
    }

    #[test]
    fn test_nudge_saturates() {
        let s = Session {
            measurement: MeasurementState {
                finger_thickness_mm: 40.0,
                ring_width_mm: 5.0,
                ring_height_mm: 5.0,
            },
            ..calibrated_state()
        };
        let r = nudge(&s, Dimension::FingerThickness, StepDirection::Increase);
        assert_eq!(r.new_state.measurement.finger_thickness_mm, 40.0);
        let r = nudge(&s, Dimension::RingWidth, StepDirection::Decrease);
        assert_eq!(r.new_state.measurement.ring_width_mm, 5.0);
    }

    #[test]
    fn test_slide_snaps_and_clamps() {
        let s = calibrated_state();
        let r = slide(&s, Dimension::FingerThickness, 9.73);
        assert_eq!(r.new_state.measurement.finger_thickness_mm, 9.75);
        let r = slide(&s, Dimension::FingerThickness, 55.0);
        assert_eq!(r.new_state.measurement.finger_thickness_mm, 40.0);
        let r = slide(&s, Dimension::RingWidth, 55.0);
        assert_eq!(r.new_state.measurement.ring_width_mm, 55.0);
        let r = slide(&s, Dimension::RingWidth, 1.0);
        assert_eq!(r.new_state.measurement.ring_width_mm, 5.0);
        let r = slide(&s, Dimension::RingWidth, 120.0);
        assert_eq!(r.new_state.measurement.ring_width_mm, 80.0);
        assert!(!slide(&s, Dimension::RingWidth, f64::NAN).success);
    }

    #[test]
    fn test_slider_value_reports_adjustment() {
        assert_eq!(slider_value(Dimension::FingerThickness, 15.03), 15.05);
        assert_eq!(slider_value(Dimension::FingerThickness, 15.0), 15.0);
        assert_eq!(slider_value(Dimension::FingerThickness, 50.0), 40.0);
        assert_eq!(slider_value(Dimension::RingWidth, 50.0), 50.0);
        assert_eq!(slider_value(Dimension::RingHeight, 2.0), 5.0);
    }

    #[test]
    fn test_circle_mode_mirrors_both_axes() {
        let s = ring_state(ShapeMode::Circle);
        let r = slide(&s, Dimension::RingHeight, 19.2);
        assert_eq!(r.new_state.measurement.ring_width_mm, 19.2);
        assert_eq!(r.new_state.measurement.ring_height_mm, 19.2);

        let r = nudge(&r.new_state, Dimension::RingWidth, StepDirection::Increase);
        assert_eq!(r.new_state.measurement.ring_width_mm, 19.25);
        assert_eq!(r.new_state.measurement.ring_height_mm, 19.25);
    }

    #[test]
    fn test_ellipse_mode_keeps_axes_independent() {
        let s = ring_state(ShapeMode::Ellipse);
        let r = slide(&s, Dimension::RingWidth, 18.0);
        let r = slide(&r.new_state, Dimension::RingHeight, 16.0);
        assert_eq!(r.new_state.measurement.ring_width_mm, 18.0);
        assert_eq!(r.new_state.measurement.ring_height_mm, 16.0);
    }

    #[test]
    fn test_returning_to_circle_resyncs_height() {
        let s = Session {
            measurement: MeasurementState {
                ring_width_mm: 18.0,
                ring_height_mm: 16.0,
                ..MeasurementState::default()
            },
            ..ring_state(ShapeMode::Ellipse)
        };
        let r = set_shape_mode(&s, ShapeMode::Circle);
        assert!(r.success);
        assert_eq!(r.new_state.measurement.ring_height_mm, 18.0);
        assert!(!set_shape_mode(&r.new_state, ShapeMode::Circle).success);
    }

    #[test]
    fn test_lock_freezes_inputs() {
        let s = toggle_lock(&ring_state(ShapeMode::Circle)).new_state;
        let surface = Surface::new(0.0, 0.0, 320.0, 320.0);
        assert!(!nudge(&s, Dimension::RingWidth, StepDirection::Increase).success);
        assert!(!slide(&s, Dimension::RingWidth, 30.0).success);
        assert!(!drag_ring_width(&s, 300.0, surface).success);
        assert!(!drag_ring_height(&s, 300.0, surface).success);
        assert!(!drag_finger(&s, 10.0, surface).success);
        assert_eq!(s.measurement, MeasurementState::default());

        let unlocked = toggle_lock(&s).new_state;
        assert!(slide(&unlocked, Dimension::RingWidth, 30.0).success);
    }

    #[test]
    fn test_drag_finger() {
        // 4 px/mm, base line at 400 - 0.15 * 400 = 340
        let s = calibrated_state();
        let surface = Surface::new(0.0, 0.0, 300.0, 400.0);
        let r = drag_finger(&s, 280.0, surface);
        assert!(r.success);
        assert_eq!(r.new_state.measurement.finger_thickness_mm, 15.0);

        let r = drag_finger(&s, 265.2, surface);
        assert_eq!(r.new_state.measurement.finger_thickness_mm, 18.7);

        // Below the base line and far above it both saturate
        assert_eq!(drag_finger(&s, 390.0, surface).new_state.measurement.finger_thickness_mm, 5.0);
        assert_eq!(drag_finger(&s, 0.0, surface).new_state.measurement.finger_thickness_mm, 40.0);

        let ring_tab = Session {
            tab: Tab::Ring,
            ..s
        };
        assert!(!drag_finger(&ring_tab, 280.0, surface).success);
    }

    #[test]
    fn test_drag_finger_rejects_non_finite_geometry() {
        let s = calibrated_state();
        let tall = Surface::new(0.0, 0.0, 300.0, f64::INFINITY);
        let r = drag_finger(&s, 100.0, tall);
        assert!(!r.success);
        assert_eq!(r.new_state.measurement.finger_thickness_mm, DEFAULT_FINGER_MM);

        let shifted = Surface::new(0.0, f64::NAN, 300.0, 400.0);
        assert!(!drag_finger(&s, 100.0, shifted).success);
        assert!(!drag_finger(&s, f64::NEG_INFINITY, Surface::new(0.0, 0.0, 300.0, 400.0)).success);
    }

    #[test]
    fn test_drag_ring_rejects_non_finite_geometry() {
        let s = ring_state(ShapeMode::Ellipse);
        let wide = Surface::new(0.0, 0.0, f64::INFINITY, 320.0);
        assert!(!drag_ring_width(&s, 100.0, wide).success);
        assert!(!ring_pointer_move(&s, 100.0, 100.0, wide).success);
    }

    #[test]
    fn test_finger_size_matches_brute_force_over_grid() {
        use crate::chart::SIZE_CHART;

        let s = calibrated_state();
        // 5.00, 5.05, ... 40.00
        for step in 0..=700 {
            let t = round_to(MIN_MEASUREMENT_MM + step as f64 * FINE_STEP_MM, MEASUREMENT_DECIMALS);
            let session = Session {
                measurement: MeasurementState {
                    finger_thickness_mm: t,
                    ..MeasurementState::default()
                },
                ..s.clone()
            };
            let result = calculate_finger_size(&session).new_state.result.unwrap();

            // Ties keep the lower index.
            let circ = t * PI;
            let distance = |e: &SizeChartEntry| (e.circumference_mm - circ).abs();
            let mut best = 0;
            for (i, e) in SIZE_CHART.iter().enumerate() {
                if distance(e) < distance(&SIZE_CHART[best]) {
                    best = i;
                }
            }
            assert_eq!(result.entry, SIZE_CHART[best], "thickness {t}");
            assert_eq!(result.metric, SizeMetric::Circumference);
        }
    }

    #[test]
    fn test_drag_ring_axes() {
        let surface = Surface::new(0.0, 0.0, 320.0, 320.0);

        let s = ring_state(ShapeMode::Ellipse);
        let r = drag_ring_width(&s, 192.0, surface);
        assert_eq!(r.new_state.measurement.ring_width_mm, 16.0);
        assert_eq!(r.new_state.measurement.ring_height_mm, 17.0);
        // Distance from center is symmetric
        let r = drag_ring_height(&r.new_state, 124.0, surface);
        assert_eq!(r.new_state.measurement.ring_height_mm, 18.0);
        assert_eq!(r.new_state.measurement.ring_width_mm, 16.0);

        let s = ring_state(ShapeMode::Circle);
        let r = drag_ring_height(&s, 196.0, surface);
        assert_eq!(r.new_state.measurement.ring_width_mm, 18.0);
        assert_eq!(r.new_state.measurement.ring_height_mm, 18.0);

        // At the center the diameter saturates at the minimum
        let r = drag_ring_width(&s, 160.0, surface);
        assert_eq!(r.new_state.measurement.ring_width_mm, 5.0);
    }

    #[test]
    fn test_ring_pointer_move_vertical_wins_in_circle_mode() {
        let surface = Surface::new(10.0, 20.0, 320.0, 320.0);
        // center is (170, 180)
        let s = ring_state(ShapeMode::Circle);
        let r = ring_pointer_move(&s, 202.0, 216.0, surface);
        assert!(r.success);
        assert_eq!(r.new_state.measurement.ring_width_mm, 18.0);
        assert_eq!(r.new_state.measurement.ring_height_mm, 18.0);

        let s = ring_state(ShapeMode::Ellipse);
        let r = ring_pointer_move(&s, 202.0, 216.0, surface);
        assert_eq!(r.new_state.measurement.ring_width_mm, 16.0);
        assert_eq!(r.new_state.measurement.ring_height_mm, 18.0);
    }

    #[test]
    fn test_calculate_finger_size() {
        let r = calculate_finger_size(&calibrated_state());
        assert!(r.success);
        let result = r.new_state.result.unwrap();
        assert_eq!(result.entry.label, "7");
        assert_eq!(result.metric, SizeMetric::Circumference);
        assert_close(result.input_mm, 47.12, 1e-2);
        assert_eq!(r.new_state.phase(), Phase::ResultComputed);
    }

    #[test]
    fn test_calculate_ring_size_ellipse_averages() {
        let s = Session {
            measurement: MeasurementState {
                ring_width_mm: 18.0,
                ring_height_mm: 16.0,
                ..MeasurementState::default()
            },
            ..ring_state(ShapeMode::Ellipse)
        };
        let result = calculate_ring_size(&s).new_state.result.unwrap();
        assert_eq!(result.input_mm, 17.0);
        assert_eq!(result.entry.label, "13");
        assert_eq!(result.metric, SizeMetric::Diameter);
    }

    #[test]
    fn test_calculate_ring_size_circle_uses_width() {
        let s = Session {
            measurement: MeasurementState {
                ring_width_mm: 17.3,
                ring_height_mm: 17.3,
                ..MeasurementState::default()
            },
            ..ring_state(ShapeMode::Circle)
        };
        let result = calculate_ring_size(&s).new_state.result.unwrap();
        assert_eq!(result.entry.label, "14");
    }

    #[test]
    fn test_adjustment_invalidates_result() {
        let s = calculate_finger_size(&calibrated_state()).new_state;
        assert!(s.result.is_some());
        let r = nudge(&s, Dimension::FingerThickness, StepDirection::Increase);
        assert!(r.new_state.result.is_none());
        assert_eq!(r.new_state.phase(), Phase::Adjusting);

        let s = calculate_finger_size(&r.new_state).new_state;
        assert!(reset(&s).new_state.result.is_none());
    }

    #[test]
    fn test_overlay_sizes() {
        let s = calibrated_state();
        assert_eq!(finger_line_px(&s).unwrap(), 60.0);
        assert_eq!(ring_overlay_px(&s).unwrap(), (68.0, 68.0));
    }
}
