use anyhow::{bail, Context, Result};
use clap::Parser;
use inverted_sim_core::core_types::units::SpeedUnit;
use inverted_sim_core::{
    CarParameters, CarPreset, Orientation, Simulation, Telemetry, MAX_CONTROL_TORQUE,
};
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Inverted car simulation demo with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "inverted-sim-demo")]
#[command(about = "Drive a downforce car upright or upside down, headless", long_about = None)]
struct Args {
    /// Simulation duration in seconds
    #[arg(short, long, default_value_t = 30.0)]
    duration: f64,

    /// Car preset (f1-monaco, f1-monza, mclaren-f1, saleen-s7, radical-sr8)
    #[arg(short, long, default_value = "f1-monaco")]
    preset: String,

    /// JSON file with car parameters; missing fields take the preset's values
    #[arg(long)]
    params: Option<PathBuf>,

    /// Drive torque in Nm (0-3200)
    #[arg(short, long, default_value_t = 3200.0)]
    torque: f64,

    /// Brake effort in Nm (0-3200), applied from --brake-after onwards
    #[arg(short, long, default_value_t = 3200.0)]
    brake: f64,

    /// Time in seconds at which the driver switches from throttle to brake
    #[arg(long)]
    brake_after: Option<f64>,

    /// Start upside down
    #[arg(short, long)]
    inverted: bool,

    /// Time in seconds at which the car is flipped over
    #[arg(long)]
    flip_at: Option<f64>,

    /// Initial speed, in --unit
    #[arg(long, default_value_t = 0.0)]
    initial_speed: f64,

    /// Speed unit for reports (m/s, km/h, mph)
    #[arg(short, long, default_value = "km/h")]
    unit: String,

    /// Report interval in seconds
    #[arg(short, long, default_value_t = 1.0)]
    report_interval: f64,

    /// Emit telemetry as JSON lines
    #[arg(long)]
    json: bool,

    /// List presets and exit
    #[arg(long)]
    list_presets: bool,

    /// Run every preset at full throttle in parallel and print a summary
    #[arg(long)]
    all_presets: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let unit: SpeedUnit = args
        .unit
        .parse()
        .with_context(|| format!("invalid --unit '{}'", args.unit))?;

    if args.list_presets {
        list_presets(unit);
        return Ok(());
    }

    if args.all_presets {
        compare_presets(args.duration, unit);
        return Ok(());
    }

    let parameters = load_parameters(&args)?;
    run(&args, parameters, unit)
}

fn load_parameters(args: &Args) -> Result<CarParameters> {
    let preset: CarPreset = args.preset.parse()?;

    let parameters = match &args.params {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            // Unset fields fall back to the chosen preset rather than the default car
            let mut value: serde_json::Value = serde_json::to_value(preset.parameters())?;
            let overrides: serde_json::Value = serde_json::from_str(&text)
                .with_context(|| format!("parsing {}", path.display()))?;
            let (Some(base), Some(fields)) = (value.as_object_mut(), overrides.as_object()) else {
                bail!("{} must contain a JSON object", path.display());
            };
            for (key, field) in fields {
                base.insert(key.clone(), field.clone());
            }
            serde_json::from_value::<CarParameters>(value)
                .with_context(|| format!("unrecognised car parameters in {}", path.display()))?
        }
        None => preset.parameters(),
    };

    parameters
        .validate()
        .context("car parameters rejected")?;
    info!("Using parameters: {:?}", parameters);
    Ok(parameters)
}

fn list_presets(unit: SpeedUnit) {
    println!(
        "{:<12} {:<12} {:>7} {:>6} {:>6} {:>10}",
        "slug", "name", "mass", "Cl*A", "Cd*A", "inv. speed"
    );
    for preset in CarPreset::ALL {
        let p = preset.parameters();
        let sim = Simulation::new(p);
        println!(
            "{:<12} {:<12} {:>7.0} {:>6.2} {:>6.2} {:>10.1}",
            preset.slug(),
            preset.name(),
            p.mass,
            p.lift_coefficient * p.lift_area,
            p.drag_coefficient * p.drag_area,
            sim.car().inverted_threshold_speed().in_unit(unit)
        );
    }
}

fn run(args: &Args, parameters: CarParameters, unit: SpeedUnit) -> Result<()> {
    if args.torque > MAX_CONTROL_TORQUE || args.brake > MAX_CONTROL_TORQUE {
        eprintln!("Note: torque and brake are limited to {MAX_CONTROL_TORQUE} Nm");
    }

    let mut sim = Simulation::new(parameters);
    sim.set_torque(args.torque);
    sim.set_speed(&inverted_sim_core::Speed::new(args.initial_speed, unit));
    if args.inverted {
        sim.flip();
    }

    let total_ticks = sim.ticks_for(args.duration);
    let report_every = sim.ticks_for(args.report_interval).max(1);
    let brake_tick = args.brake_after.map(|t| sim.ticks_for(t));
    let flip_tick = args.flip_at.map(|t| sim.ticks_for(t));

    if !args.json {
        println!("=== Inverted Car Simulation ===");
        println!(
            "{:.0} kg, torque {:.0} Nm, {} for {:.1}s",
            parameters.mass,
            sim.controls().torque,
            sim.car().orientation(),
            args.duration
        );
        println!(
            "Downforce matches weight at {:.1} {}\n",
            sim.car().inverted_threshold_speed().in_unit(unit),
            unit
        );
    }

    let mut peak_speed: f64 = 0.0;
    let mut fell_at = None;
    for tick in 0..total_ticks {
        if brake_tick == Some(tick) {
            sim.set_torque(0.0);
            sim.set_brake(args.brake);
            info!("Braking at t={:.2}s", sim.elapsed());
        }
        if flip_tick == Some(tick) {
            let orientation = sim.flip();
            info!("Flipped {} at t={:.2}s", orientation, sim.elapsed());
        }

        sim.tick();
        peak_speed = peak_speed.max(sim.car().speed().in_unit(unit));

        // The body settles onto the overhead road instantly here
        if fell_at.is_none() && sim.car().should_fall(true) {
            fell_at = Some(sim.elapsed());
        }

        if (tick + 1) % report_every == 0 {
            report(&sim.telemetry(), args.json, unit)?;
        }
    }

    if !args.json {
        println!("\n=== Simulation Complete ===");
        println!("Final time: {:.1}s", sim.elapsed());
        println!(
            "Final speed: {:.1} {}",
            sim.car().speed().in_unit(unit),
            unit
        );
        println!("Peak speed: {:.1} {}", peak_speed, unit);
        if let Some(t) = fell_at {
            println!("Car fell off the overhead road at t={t:.2}s");
        } else if sim.car().orientation() == Orientation::Inverted {
            println!("Car held on upside down");
        }
    }
    Ok(())
}

fn report(telemetry: &Telemetry, json: bool, unit: SpeedUnit) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(telemetry)?);
    } else {
        let speed = inverted_sim_core::Speed::kilometers_per_hour(telemetry.speed_kph).in_unit(unit);
        println!("{telemetry}  [{speed:.1} {unit}]");
    }
    Ok(())
}

struct PresetSummary {
    preset: CarPreset,
    top_speed: f64,
    time_to_threshold: Option<f64>,
    threshold: f64,
}

fn compare_presets(duration: f64, unit: SpeedUnit) {
    let summaries: Vec<PresetSummary> = CarPreset::ALL
        .par_iter()
        .map(|&preset| {
            let mut sim = Simulation::from_preset(preset);
            sim.set_torque(MAX_CONTROL_TORQUE);
            let threshold = sim.car().inverted_threshold_speed();
            let mut time_to_threshold = None;
            for _ in 0..sim.ticks_for(duration) {
                sim.tick();
                if time_to_threshold.is_none() && !sim.car().is_losing_grip() {
                    time_to_threshold = Some(sim.elapsed());
                }
            }
            PresetSummary {
                preset,
                top_speed: sim.car().speed().in_unit(unit),
                time_to_threshold,
                threshold: threshold.in_unit(unit),
            }
        })
        .collect();

    println!(
        "{:<12} {:>10} {:>12} {:>16}",
        "preset",
        format!("top {unit}"),
        format!("inv. {unit}"),
        "time to inv. (s)"
    );
    for s in summaries {
        let reached = s
            .time_to_threshold
            .map_or_else(|| "never".to_string(), |t| format!("{t:.1}"));
        println!(
            "{:<12} {:>10.1} {:>12.1} {:>16}",
            s.preset.slug(),
            s.top_speed,
            s.threshold,
            reached
        );
    }
}
