// Types — session state, its parts, and the labelled events that drive it.

use serde::Serialize;

use crate::constants::*;

/// Whether the ring overlay is a single diameter or an independent width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeMode {
    Circle,
    Ellipse,
}

impl ShapeMode {
    /// Caption for the width control.
    pub fn width_label(self) -> &'static str {
        match self {
            ShapeMode::Circle => "Diameter",
            ShapeMode::Ellipse => "Width (Horizontal)",
        }
    }

    /// Caption for the height control, which is only shown for ellipses.
    pub fn height_label(self) -> Option<&'static str> {
        match self {
            ShapeMode::Circle => None,
            ShapeMode::Ellipse => Some("Height (Vertical)"),
        }
    }

    pub fn drag_hint(self) -> &'static str {
        match self {
            ShapeMode::Circle => "Drag anywhere to resize",
            ShapeMode::Ellipse => "Drag Horizontally for Width, Vertically for Height",
        }
    }
}

/// Which measuring method is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    Finger,
    Ring,
}

/// Everyday object of known physical size used for calibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceObject {
    Card,
    Coin,
}

impl ReferenceObject {
    pub fn known_width_mm(self) -> f64 {
        match self {
            ReferenceObject::Card => CARD_WIDTH_MM,
            ReferenceObject::Coin => COIN_DIAMETER_MM,
        }
    }

    /// Allowed range of the on-screen draft width, in pixels.
    pub fn draft_range_px(self) -> (f64, f64) {
        match self {
            ReferenceObject::Card => (CARD_DRAFT_MIN_PX, CARD_DRAFT_MAX_PX),
            ReferenceObject::Coin => (COIN_DRAFT_MIN_PX, COIN_DRAFT_MAX_PX),
        }
    }

    /// On-screen (width, height) of the preview box for a given draft width.
    pub fn preview_size_px(self, width_px: f64) -> (f64, f64) {
        match self {
            ReferenceObject::Card => (width_px, width_px * CARD_ASPECT),
            ReferenceObject::Coin => (width_px, width_px),
        }
    }
}

impl std::str::FromStr for ReferenceObject {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "card" => Ok(ReferenceObject::Card),
            "coin" => Ok(ReferenceObject::Coin),
            other => Err(format!("unknown reference object '{other}' (expected card or coin)")),
        }
    }
}

/// One adjustable measurement value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Dimension {
    FingerThickness,
    RingWidth,
    RingHeight,
}

impl Dimension {
    /// Inclusive [min, max] range in millimeters.
    pub fn range(self) -> (f64, f64) {
        match self {
            Dimension::FingerThickness => (MIN_MEASUREMENT_MM, MAX_FINGER_MM),
            Dimension::RingWidth | Dimension::RingHeight => (MIN_MEASUREMENT_MM, MAX_RING_MM),
        }
    }

    pub fn clamp(self, mm: f64) -> f64 {
        let (min, max) = self.range();
        mm.clamp(min, max)
    }

    /// Position of `value` along the slider track, 0.0 at the minimum and 1.0 at the maximum.
    pub fn fill_fraction(self, value: f64) -> f64 {
        let (min, max) = self.range();
        ((value - min) / (max - min)).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Decrease,
    Increase,
}

impl StepDirection {
    pub fn signed_step(self) -> f64 {
        match self {
            StepDirection::Decrease => -FINE_STEP_MM,
            StepDirection::Increase => FINE_STEP_MM,
        }
    }
}

/// Which field of the size chart a lookup compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeMetric {
    Diameter,
    Circumference,
}

/// One row of the reference size chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SizeChartEntry {
    pub label: &'static str,
    pub circumference_mm: f64,
    pub diameter_mm: f64,
}

impl SizeChartEntry {
    pub fn value(&self, metric: SizeMetric) -> f64 {
        match metric {
            SizeMetric::Diameter => self.diameter_mm,
            SizeMetric::Circumference => self.circumference_mm,
        }
    }
}

/// Pixel density of the screen, either estimated or calibrated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalibrationState {
    pub pixels_per_mm: f64,
    pub is_calibrated: bool,
}

impl CalibrationState {
    /// Uncalibrated estimate derived from a screen DPI.
    pub fn estimated(screen_dpi: f64) -> Self {
        Self {
            pixels_per_mm: screen_dpi / MM_PER_INCH,
            is_calibrated: false,
        }
    }
}

/// Working values, all in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeasurementState {
    pub finger_thickness_mm: f64,
    pub ring_width_mm: f64,
    pub ring_height_mm: f64,
}

impl Default for MeasurementState {
    fn default() -> Self {
        Self {
            finger_thickness_mm: DEFAULT_FINGER_MM,
            ring_width_mm: DEFAULT_RING_WIDTH_MM,
            ring_height_mm: DEFAULT_RING_HEIGHT_MM,
        }
    }
}

impl MeasurementState {
    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::FingerThickness => self.finger_thickness_mm,
            Dimension::RingWidth => self.ring_width_mm,
            Dimension::RingHeight => self.ring_height_mm,
        }
    }

    /// Set one value; in circle mode a ring value is mirrored onto the other axis.
    pub fn with(self, dimension: Dimension, mm: f64, shape_mode: ShapeMode) -> Self {
        let mirror = shape_mode == ShapeMode::Circle;
        match dimension {
            Dimension::FingerThickness => Self {
                finger_thickness_mm: mm,
                ..self
            },
            Dimension::RingWidth => Self {
                ring_width_mm: mm,
                ring_height_mm: if mirror { mm } else { self.ring_height_mm },
                ..self
            },
            Dimension::RingHeight => Self {
                ring_height_mm: mm,
                ring_width_mm: if mirror { mm } else { self.ring_width_mm },
                ..self
            },
        }
    }
}

/// The chart entry chosen for a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeasurementResult {
    pub entry: SizeChartEntry,
    pub metric: SizeMetric,
    /// The value compared against the chart (circumference or effective diameter).
    pub input_mm: f64,
}

/// Drawing surface bounds in client pixels, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Surface {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Surface {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Y coordinate of the fixed finger base line.
    pub fn baseline_y(&self) -> f64 {
        self.bottom() - self.height * FINGER_BASELINE_FRACTION
    }
}

/// Coarse position of a session in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Uncalibrated,
    Adjusting,
    ResultComputed,
}

/// Complete state of one measuring session. The host owns the only copy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    pub calibration: CalibrationState,
    pub measurement: MeasurementState,
    pub shape_mode: ShapeMode,
    pub tab: Tab,
    pub locked: bool,
    pub result: Option<MeasurementResult>,
    pub card_draft_px: f64,
    pub coin_draft_px: f64,
}

impl Session {
    pub fn new(screen_dpi: f64) -> Self {
        let calibration = CalibrationState::estimated(screen_dpi);
        Self {
            calibration,
            measurement: MeasurementState::default(),
            shape_mode: ShapeMode::Circle,
            tab: Tab::Finger,
            locked: false,
            result: None,
            card_draft_px: calibration.pixels_per_mm * CARD_WIDTH_MM,
            coin_draft_px: calibration.pixels_per_mm * COIN_DIAMETER_MM,
        }
    }

    pub fn phase(&self) -> Phase {
        if !self.calibration.is_calibrated {
            Phase::Uncalibrated
        } else if self.result.is_some() {
            Phase::ResultComputed
        } else {
            Phase::Adjusting
        }
    }

    pub fn draft_px(&self, object: ReferenceObject) -> f64 {
        match object {
            ReferenceObject::Card => self.card_draft_px,
            ReferenceObject::Coin => self.coin_draft_px,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_SCREEN_DPI)
    }
}

/// Labels for each transition, enabling deterministic trace replay.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionLabel {
    NoAction,
    SetCalibrationDraft { object: ReferenceObject, px: f64 },
    ConfirmCalibration { object: ReferenceObject },
    SelectTab { tab: Tab },
    SetShapeMode { mode: ShapeMode },
    ToggleLock,
    Nudge { dimension: Dimension, direction: StepDirection },
    Slide { dimension: Dimension, value_mm: f64 },
    DragFinger { pointer_y: f64, surface: Surface },
    DragRingWidth { pointer_x: f64, surface: Surface },
    DragRingHeight { pointer_y: f64, surface: Surface },
    RingPointerMove { pointer_x: f64, pointer_y: f64, surface: Surface },
    CalculateFinger,
    CalculateRing,
    Reset,
}

impl TransitionLabel {
    /// Whether this label is a measurement input that the lock freezes.
    pub fn is_measurement_input(&self) -> bool {
        matches!(
            self,
            TransitionLabel::Nudge { .. }
                | TransitionLabel::Slide { .. }
                | TransitionLabel::DragFinger { .. }
                | TransitionLabel::DragRingWidth { .. }
                | TransitionLabel::DragRingHeight { .. }
                | TransitionLabel::RingPointerMove { .. }
        )
    }
}

impl std::fmt::Display for TransitionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionLabel::NoAction => write!(f, "NoAction"),
            TransitionLabel::SetCalibrationDraft { object, px } => {
                write!(f, "SetCalibrationDraft({:?}, {}px)", object, px)
            }
            TransitionLabel::ConfirmCalibration { object } => {
                write!(f, "ConfirmCalibration({:?})", object)
            }
            TransitionLabel::SelectTab { tab } => write!(f, "SelectTab({:?})", tab),
            TransitionLabel::SetShapeMode { mode } => write!(f, "SetShapeMode({:?})", mode),
            TransitionLabel::ToggleLock => write!(f, "ToggleLock"),
            TransitionLabel::Nudge {
                dimension,
                direction,
            } => write!(f, "Nudge({:?}, {:?})", dimension, direction),
            TransitionLabel::Slide {
                dimension,
                value_mm,
            } => write!(f, "Slide({:?}, {}mm)", dimension, value_mm),
            TransitionLabel::DragFinger { pointer_y, .. } => write!(f, "DragFinger(y={})", pointer_y),
            TransitionLabel::DragRingWidth { pointer_x, .. } => {
                write!(f, "DragRingWidth(x={})", pointer_x)
            }
            TransitionLabel::DragRingHeight { pointer_y, .. } => {
                write!(f, "DragRingHeight(y={})", pointer_y)
            }
            TransitionLabel::RingPointerMove {
                pointer_x,
                pointer_y,
                ..
            } => write!(f, "RingPointerMove(x={}, y={})", pointer_x, pointer_y),
            TransitionLabel::CalculateFinger => write!(f, "CalculateFinger"),
            TransitionLabel::CalculateRing => write!(f, "CalculateRing"),
            TransitionLabel::Reset => write!(f, "Reset"),
        }
    }
}

/// Result of a pure transition function.
pub struct TransitionResult {
    pub success: bool,
    pub new_state: Session,
}

impl TransitionResult {
    pub fn accepted(new_state: Session) -> Self {
        Self {
            success: true,
            new_state,
        }
    }

    pub fn rejected(state: &Session) -> Self {
        Self {
            success: false,
            new_state: state.clone(),
        }
    }
}

impl std::fmt::Display for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "  phase:             {:?}", self.phase())?;
        writeln!(
            f,
            "  pixels_per_mm:     {:.4} ({})",
            self.calibration.pixels_per_mm,
            if self.calibration.is_calibrated {
                "calibrated"
            } else {
                "estimated"
            }
        )?;
        writeln!(f, "  finger_thickness:  {:.2} mm", self.measurement.finger_thickness_mm)?;
        writeln!(f, "  ring_width:        {:.2} mm", self.measurement.ring_width_mm)?;
        writeln!(f, "  ring_height:       {:.2} mm", self.measurement.ring_height_mm)?;
        writeln!(f, "  shape_mode:        {:?}", self.shape_mode)?;
        writeln!(f, "  tab:               {:?}", self.tab)?;
        writeln!(f, "  locked:            {}", self.locked)?;
        writeln!(
            f,
            "  drafts:            card {:.0}px, coin {:.0}px",
            self.card_draft_px, self.coin_draft_px
        )?;
        match &self.result {
            Some(r) => write!(
                f,
                "  result:            size {} (by {:?}, input {:.2} mm)",
                r.entry.label, r.metric, r.input_mm
            ),
            None => write!(f, "  result:            none"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mode_labels() {
        assert_eq!(ShapeMode::Circle.width_label(), "Diameter");
        assert_eq!(ShapeMode::Circle.height_label(), None);
        assert_eq!(ShapeMode::Ellipse.width_label(), "Width (Horizontal)");
        assert_eq!(ShapeMode::Ellipse.height_label(), Some("Height (Vertical)"));
    }

    #[test]
    fn test_pointer_move_is_a_measurement_input() {
        let label = TransitionLabel::RingPointerMove {
            pointer_x: 192.0,
            pointer_y: 196.0,
            surface: Surface::new(0.0, 0.0, 320.0, 320.0),
        };
        assert!(label.is_measurement_input());
        assert_eq!(label.to_string(), "RingPointerMove(x=192, y=196)");
        assert!(!TransitionLabel::CalculateRing.is_measurement_input());
    }

    #[test]
    fn test_reference_objects() {
        assert_eq!("Card".parse::<ReferenceObject>(), Ok(ReferenceObject::Card));
        assert_eq!("coin".parse::<ReferenceObject>(), Ok(ReferenceObject::Coin));
        assert!("note".parse::<ReferenceObject>().is_err());
        let (w, h) = ReferenceObject::Card.preview_size_px(200.0);
        assert_eq!(w, 200.0);
        assert!((h - 316.0).abs() < 1e-9);
        assert_eq!(ReferenceObject::Coin.preview_size_px(100.0), (100.0, 100.0));
    }

    #[test]
    fn test_fill_fraction() {
        assert_eq!(Dimension::FingerThickness.fill_fraction(5.0), 0.0);
        assert_eq!(Dimension::FingerThickness.fill_fraction(40.0), 1.0);
        assert_eq!(Dimension::RingWidth.fill_fraction(42.5), 0.5);
        assert_eq!(Dimension::RingHeight.fill_fraction(100.0), 1.0);
    }

    #[test]
    fn test_surface_geometry() {
        let s = Surface::new(10.0, 20.0, 300.0, 400.0);
        assert_eq!(s.bottom(), 420.0);
        assert_eq!(s.center(), (160.0, 220.0));
        assert!((s.baseline_y() - 360.0).abs() < 1e-9);
    }

    #[test]
    fn test_circle_mirror() {
        let m = MeasurementState::default();
        let circle = m.with(Dimension::RingHeight, 19.0, ShapeMode::Circle);
        assert_eq!((circle.ring_width_mm, circle.ring_height_mm), (19.0, 19.0));
        let oval = m.with(Dimension::RingHeight, 19.0, ShapeMode::Ellipse);
        assert_eq!((oval.ring_width_mm, oval.ring_height_mm), (17.0, 19.0));
        let finger = m.with(Dimension::FingerThickness, 19.0, ShapeMode::Circle);
        assert_eq!(finger.ring_width_mm, 17.0);
    }
}
