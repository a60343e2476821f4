use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use ring_sizer::chart::SIZE_CHART;
use ring_sizer::config::Config;
use ring_sizer::invariants;
use ring_sizer::logic::slider_value;
use ring_sizer::mbt::run_events;
use ring_sizer::simulator;
use ring_sizer::types::*;

#[derive(Parser, Debug)]
#[command(name = "ring-sizer", version, about = "Ring size measurement from on-screen calibration")]
struct Args {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Screen density override (dots per inch)
    #[arg(long, global = true)]
    dpi: Option<f64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Explore random UI event sequences and check session invariants
    Simulate {
        #[arg(long)]
        max_steps: Option<usize>,
        #[arg(long)]
        max_samples: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(short, long)]
        verbose: bool,
        #[arg(long)]
        json: bool,
    },
    /// Size from finger thickness in millimeters
    Finger {
        /// Thickness in mm; snapped to 0.05 mm steps and clamped to 5-40 mm
        #[arg(long)]
        thickness: f64,
        #[arg(long)]
        json: bool,
    },
    /// Size from an existing ring; giving a height measures it as an oval
    Ring {
        /// Inner width in mm; snapped to 0.05 mm steps and clamped to 5-80 mm
        #[arg(long)]
        width: f64,
        /// Inner height in mm, snapped and clamped like the width
        #[arg(long)]
        height: Option<f64>,
        #[arg(long)]
        json: bool,
    },
    /// Pixels per millimeter from a reference object's on-screen width
    Calibrate {
        #[arg(long)]
        object: ReferenceObject,
        #[arg(long)]
        observed_px: f64,
    },
    /// Print the size chart
    Chart {
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path).with_context(|| format!("loading {:?}", path))?,
        None => Config::default(),
    };
    if let Some(dpi) = args.dpi {
        config.screen_dpi = dpi;
    }
    config.validate()?;

    match args.command {
        Command::Simulate {
            max_steps,
            max_samples,
            seed,
            verbose,
            json,
        } => {
            let sim = &config.simulation;
            let max_steps = max_steps.unwrap_or(sim.max_steps);
            let max_samples = max_samples.unwrap_or(sim.max_samples);
            let seed = seed.or(sim.seed).unwrap_or_else(clock_seed);
            simulate(config.screen_dpi, max_steps, max_samples, seed, verbose, json)
        }
        Command::Finger { thickness, json } => {
            note_adjusted(Dimension::FingerThickness, thickness);
            let labels = [
                TransitionLabel::Slide {
                    dimension: Dimension::FingerThickness,
                    value_mm: thickness,
                },
                TransitionLabel::CalculateFinger,
            ];
            report(measure(config.screen_dpi, &labels), json)
        }
        Command::Ring {
            width,
            height,
            json,
        } => {
            note_adjusted(Dimension::RingWidth, width);
            let mut labels = vec![TransitionLabel::SelectTab { tab: Tab::Ring }];
            if let Some(height) = height {
                note_adjusted(Dimension::RingHeight, height);
                labels.push(TransitionLabel::SetShapeMode {
                    mode: ShapeMode::Ellipse,
                });
                labels.push(TransitionLabel::Slide {
                    dimension: Dimension::RingHeight,
                    value_mm: height,
                });
            }
            labels.push(TransitionLabel::Slide {
                dimension: Dimension::RingWidth,
                value_mm: width,
            });
            labels.push(TransitionLabel::CalculateRing);
            report(measure(config.screen_dpi, &labels), json)
        }
        Command::Calibrate {
            object,
            observed_px,
        } => {
            let calibration =
                ring_sizer::logic::calibrate_with_reference_width(observed_px, object.known_width_mm())?;
            println!(
                "{:?} at {}px: {:.4} px/mm ({:.1} DPI)",
                object,
                observed_px,
                calibration.pixels_per_mm,
                calibration.pixels_per_mm * ring_sizer::constants::MM_PER_INCH,
            );
            Ok(())
        }
        Command::Chart { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&SIZE_CHART[..])?);
            } else {
                println!("{:<6} {:>8} {:>8}", "Size", "Dia", "Circ");
                for entry in &SIZE_CHART {
                    println!(
                        "{:<6} {:>8.2} {:>8.2}",
                        entry.label, entry.diameter_mm, entry.circumference_mm
                    );
                }
            }
            Ok(())
        }
    }
}

fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

fn simulate(
    screen_dpi: f64,
    max_steps: usize,
    max_samples: usize,
    seed: u64,
    verbose: bool,
    json: bool,
) -> anyhow::Result<()> {
    if !json {
        println!("Ring Size Session Simulator");
        println!("===========================");
        println!(
            "Running {} traces of {} steps each (seed: {})",
            max_samples, max_steps, seed
        );
        if verbose {
            println!("Verbose mode: showing first trace\n");
        }
        println!("Checking invariants:");
        for (name, _) in invariants::ALL_INVARIANTS {
            println!("  - {}", name);
        }
    }

    let result = simulator::run_simulation(screen_dpi, max_steps, max_samples, seed, verbose);
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result);
    }
    if result.violation.is_some() {
        bail!("simulation found an invariant violation");
    }
    Ok(())
}

/// Tell the user when a command-line value lands somewhere else on the slider.
fn note_adjusted(dimension: Dimension, value_mm: f64) {
    if !value_mm.is_finite() {
        return;
    }
    let used = slider_value(dimension, value_mm);
    if used != value_mm {
        let (min, max) = dimension.range();
        log::warn!(
            "{:?} {} mm adjusted to {} mm (0.05 mm steps, {}-{} mm)",
            dimension, value_mm, used, min, max
        );
    }
}

/// Calibrate at the configured density, then feed the measurement events.
fn measure(screen_dpi: f64, labels: &[TransitionLabel]) -> Session {
    let mut events = vec![TransitionLabel::ConfirmCalibration {
        object: ReferenceObject::Card,
    }];
    events.extend_from_slice(labels);
    run_events(Session::new(screen_dpi), &events)
}

fn report(session: Session, json: bool) -> anyhow::Result<()> {
    let Some(result) = session.result else {
        bail!("no size could be computed");
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        if result.metric == SizeMetric::Diameter {
            let m = &session.measurement;
            println!("{}: {:.2} mm", session.shape_mode.width_label(), m.ring_width_mm);
            if let Some(label) = session.shape_mode.height_label() {
                println!("{}: {:.2} mm", label, m.ring_height_mm);
            }
        }
        println!("Measured:      {:.2} mm ({:?})", result.input_mm, result.metric);
        println!("Your size:     {}", result.entry.label);
        println!("Diameter:      {} mm", result.entry.diameter_mm);
        println!("Circumference: {} mm", result.entry.circumference_mm);
    }
    Ok(())
}
