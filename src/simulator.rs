// Simulator — drives a session with random UI events and checks every invariant
// after each step. Events are drawn from a fixed alphabet so runs replay from a seed.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::constants::*;
use crate::invariants;
use crate::mbt::apply_transition;
use crate::types::*;

/// The kinds of event the simulator can choose from.
#[derive(Debug, Clone, Copy)]
pub enum Action {
    SetCalibrationDraft,
    ConfirmCalibration,
    SelectTab,
    SetShapeMode,
    ToggleLock,
    Nudge,
    Slide,
    DragFinger,
    DragRingWidth,
    DragRingHeight,
    RingPointerMove,
    CalculateFinger,
    CalculateRing,
    Reset,
}

const ALL_ACTIONS: &[Action] = &[
    Action::SetCalibrationDraft,
    Action::ConfirmCalibration,
    Action::SelectTab,
    Action::SetShapeMode,
    Action::ToggleLock,
    Action::Nudge,
    Action::Slide,
    Action::DragFinger,
    Action::DragRingWidth,
    Action::DragRingHeight,
    Action::RingPointerMove,
    Action::CalculateFinger,
    Action::CalculateRing,
    Action::Reset,
];

const OBJECTS: &[ReferenceObject] = &[ReferenceObject::Card, ReferenceObject::Coin];
const DIMENSIONS: &[Dimension] = &[
    Dimension::FingerThickness,
    Dimension::RingWidth,
    Dimension::RingHeight,
];

fn sim_surface() -> Surface {
    Surface::new(0.0, 0.0, SIM_SURFACE_SIZE_PX, SIM_SURFACE_SIZE_PX)
}

pub fn init_state(screen_dpi: f64) -> Session {
    Session::new(screen_dpi)
}

fn pick<T: Copy>(items: &[T], rng: &mut impl Rng) -> T {
    // Every selection set is a non-empty constant.
    items[rng.gen_range(0..items.len())]
}

/// Resolve an action into a concrete label with random parameters.
fn label_for(action: Action, rng: &mut impl Rng) -> TransitionLabel {
    match action {
        Action::SetCalibrationDraft => TransitionLabel::SetCalibrationDraft {
            object: pick(OBJECTS, rng),
            px: pick(DRAFT_VALUES_PX, rng),
        },
        Action::ConfirmCalibration => TransitionLabel::ConfirmCalibration {
            object: pick(OBJECTS, rng),
        },
        Action::SelectTab => TransitionLabel::SelectTab {
            tab: pick(&[Tab::Finger, Tab::Ring], rng),
        },
        Action::SetShapeMode => TransitionLabel::SetShapeMode {
            mode: pick(&[ShapeMode::Circle, ShapeMode::Ellipse], rng),
        },
        Action::ToggleLock => TransitionLabel::ToggleLock,
        Action::Nudge => TransitionLabel::Nudge {
            dimension: pick(DIMENSIONS, rng),
            direction: pick(&[StepDirection::Decrease, StepDirection::Increase], rng),
        },
        Action::Slide => TransitionLabel::Slide {
            dimension: pick(DIMENSIONS, rng),
            value_mm: pick(SLIDER_VALUES_MM, rng),
        },
        Action::DragFinger => TransitionLabel::DragFinger {
            pointer_y: pick(POINTER_COORDS_PX, rng),
            surface: sim_surface(),
        },
        Action::DragRingWidth => TransitionLabel::DragRingWidth {
            pointer_x: pick(POINTER_COORDS_PX, rng),
            surface: sim_surface(),
        },
        Action::DragRingHeight => TransitionLabel::DragRingHeight {
            pointer_y: pick(POINTER_COORDS_PX, rng),
            surface: sim_surface(),
        },
        Action::RingPointerMove => TransitionLabel::RingPointerMove {
            pointer_x: pick(POINTER_COORDS_PX, rng),
            pointer_y: pick(POINTER_COORDS_PX, rng),
            surface: sim_surface(),
        },
        Action::CalculateFinger => TransitionLabel::CalculateFinger,
        Action::CalculateRing => TransitionLabel::CalculateRing,
        Action::Reset => TransitionLabel::Reset,
    }
}

/// Execute one random step: shuffle the actions and take the first one that is accepted.
/// Returns the transition label (with resolved params) and the new state.
pub fn step(state: &Session, rng: &mut impl Rng) -> (TransitionLabel, Session) {
    let mut actions: Vec<Action> = ALL_ACTIONS.to_vec();
    actions.shuffle(rng);

    for action in &actions {
        let label = label_for(*action, rng);
        let result = apply_transition(state, &label);
        if result.success {
            return (label, result.new_state);
        }
    }

    (TransitionLabel::NoAction, state.clone())
}

/// Result of running one simulation trace.
pub struct TraceResult {
    pub steps: usize,
    pub violation: Option<(&'static str, usize, Session)>,
    pub final_state: Session,
}

/// Run a single simulation trace for up to `max_steps`.
pub fn run_trace(
    screen_dpi: f64,
    max_steps: usize,
    rng: &mut impl Rng,
    verbose: bool,
) -> TraceResult {
    let mut state = init_state(screen_dpi);

    if verbose {
        println!("[State 0] init");
        println!("{}\n", state);
    }

    if let Err(violated) = invariants::check_invariants(&state) {
        return TraceResult {
            steps: 0,
            violation: Some((violated, 0, state.clone())),
            final_state: state,
        };
    }

    for step_num in 1..=max_steps {
        let (label, new_state) = step(&state, rng);

        if verbose && new_state != state {
            println!("[State {}] {}", step_num, label);
            println!("{}\n", new_state);
        }

        let checked = invariants::check_invariants(&new_state)
            .and_then(|()| invariants::check_step(&state, &label, &new_state));
        state = new_state;

        if let Err(violated) = checked {
            log::warn!("invariant {} violated at step {} ({})", violated, step_num, label);
            return TraceResult {
                steps: step_num,
                violation: Some((violated, step_num, state.clone())),
                final_state: state,
            };
        }
    }

    TraceResult {
        steps: max_steps,
        violation: None,
        final_state: state,
    }
}

/// Run many simulation traces from one seed, stopping at the first violation.
pub fn run_simulation(
    screen_dpi: f64,
    max_steps: usize,
    max_samples: usize,
    seed: u64,
    verbose: bool,
) -> SimulationResult {
    use rand::SeedableRng;
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

    let start = std::time::Instant::now();
    let mut violation = None;
    let mut results_computed = 0;

    for trace_num in 0..max_samples {
        let result = run_trace(screen_dpi, max_steps, &mut rng, verbose && trace_num == 0);
        log::debug!("trace {} finished after {} steps", trace_num, result.steps);

        if result.final_state.result.is_some() {
            results_computed += 1;
        }

        if let Some((inv_name, step, state)) = result.violation {
            violation = Some(ViolationInfo {
                invariant: inv_name,
                trace: trace_num,
                step,
                state,
            });
            break;
        }
    }

    SimulationResult {
        max_steps,
        max_samples,
        seed,
        elapsed: start.elapsed(),
        results_computed,
        violation,
    }
}

#[derive(Debug, Serialize)]
pub struct ViolationInfo {
    pub invariant: &'static str,
    pub trace: usize,
    pub step: usize,
    pub state: Session,
}

#[derive(Debug, Serialize)]
pub struct SimulationResult {
    pub max_steps: usize,
    pub max_samples: usize,
    pub seed: u64,
    pub elapsed: std::time::Duration,
    /// Traces that ended with a size on screen.
    pub results_computed: usize,
    pub violation: Option<ViolationInfo>,
}

impl std::fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let traces_per_sec = self.max_samples as f64 / self.elapsed.as_secs_f64();
        writeln!(f)?;
        match &self.violation {
            None => {
                writeln!(
                    f,
                    "[ok] No violation found ({:.0}ms at {:.0} traces/second).",
                    self.elapsed.as_millis(),
                    traces_per_sec,
                )?;
                writeln!(
                    f,
                    "Checked {} traces of {} steps each ({} ended with a size).",
                    self.max_samples, self.max_steps, self.results_computed,
                )?;
            }
            Some(v) => {
                writeln!(
                    f,
                    "[VIOLATION] Invariant '{}' violated at trace {} step {}.",
                    v.invariant, v.trace, v.step,
                )?;
                writeln!(f, "State at violation:")?;
                writeln!(f, "{}", v.state)?;
            }
        }
        writeln!(f, "Seed: {} ", self.seed)
    }
}
