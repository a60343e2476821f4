// Constants — fixed physical references, input ranges and session defaults.
// All lengths are millimeters unless the name says otherwise.

/// Millimeters per inch, used to turn a reported screen DPI into pixels per millimeter.
pub const MM_PER_INCH: f64 = 25.4;

/// Assumed screen density when the platform reports nothing better.
pub const DEFAULT_SCREEN_DPI: f64 = 96.0;

// Reference objects
pub const CARD_WIDTH_MM: f64 = 53.98; // payment card, portrait orientation
pub const COIN_DIAMETER_MM: f64 = 25.0;
/// Card preview height as a multiple of its on-screen width.
pub const CARD_ASPECT: f64 = 1.58;

// Calibration draft sliders (whole pixels)
pub const CARD_DRAFT_MIN_PX: f64 = 150.0;
pub const CARD_DRAFT_MAX_PX: f64 = 500.0;
pub const COIN_DRAFT_MIN_PX: f64 = 50.0;
pub const COIN_DRAFT_MAX_PX: f64 = 250.0;

// Measurement ranges
pub const MIN_MEASUREMENT_MM: f64 = 5.0;
pub const MAX_FINGER_MM: f64 = 40.0;
pub const MAX_RING_MM: f64 = 80.0;

// Measurement defaults, restored on calibration and reset
pub const DEFAULT_FINGER_MM: f64 = 15.0;
pub const DEFAULT_RING_WIDTH_MM: f64 = 17.0;
pub const DEFAULT_RING_HEIGHT_MM: f64 = 17.0;

/// Stepper increment and slider granularity.
pub const FINE_STEP_MM: f64 = 0.05;

/// Finger base line height above the bottom of the drawing surface, as a fraction of its height.
pub const FINGER_BASELINE_FRACTION: f64 = 0.15;

// Rounding precision (decimal places)
pub const FINGER_DRAG_DECIMALS: i32 = 1;
pub const MEASUREMENT_DECIMALS: i32 = 2;

// Simulation selection sets
pub const SLIDER_VALUES_MM: &[f64] = &[
    2.0, 5.0, 9.73, 12.5, 15.0, 17.02, 18.0, 22.4, 33.3, 40.0, 55.55, 80.0, 95.0,
];
pub const DRAFT_VALUES_PX: &[f64] = &[10.0, 50.0, 100.0, 150.0, 200.0, 204.0, 260.0, 500.0, 900.0];
/// Pointer coordinates sampled over the simulated 320x320 drawing surface.
pub const POINTER_COORDS_PX: &[f64] = &[-40.0, 0.0, 12.0, 80.0, 150.0, 160.0, 171.5, 240.0, 272.0, 319.0, 400.0];
pub const SIM_SURFACE_SIZE_PX: f64 = 320.0;
