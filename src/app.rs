//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - converts them into plain run configurations
//! - runs impedance extraction or design optimization
//! - prints reports
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, ImpedanceArgs, OptimizeArgs, ShowArgs, SyntheticArgs};
use crate::domain::{DisplayMode, ImpedanceConfig, OptimizeConfig, SweepInput, SyntheticConfig};
use crate::error::AppError;
use crate::io::trajectory::{TrajectoryFile, read_trajectory_json, write_trajectory_json};
use crate::report::ConsoleObserver;

pub mod pipeline;

/// Entry point for the `bbq` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Impedance(args) => handle_impedance(args),
        Command::Optimize(args) => handle_optimize(args),
        Command::Show(args) => handle_show(args),
    }
}

fn handle_impedance(args: ImpedanceArgs) -> Result<(), AppError> {
    let config = impedance_config_from_args(&args);
    let run = pipeline::run_impedance(&config)?;

    if !run.row_errors.is_empty() {
        eprintln!("Skipped {} malformed row(s).", run.row_errors.len());
    }

    println!("{}", crate::report::format_impedance_report(&run.ports));

    if let Some(path) = &config.export {
        crate::io::export::write_impedance_csv(path, &run.ports)?;
    }

    Ok(())
}

fn handle_optimize(args: OptimizeArgs) -> Result<(), AppError> {
    let config = optimize_config_from_args(&args);

    let result = if config.display == DisplayMode::None {
        pipeline::run_optimize(&config, None)?
    } else {
        let mut observer = ConsoleObserver::stdout(config.display);
        pipeline::run_optimize(&config, Some(&mut observer))?
    };

    println!("{}", crate::report::format_optimization_summary(&config, &result));

    if let Some(path) = &config.export {
        write_trajectory_json(path, &TrajectoryFile::new(&config, &result))?;
    }

    Ok(())
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let trajectory = read_trajectory_json(&args.trajectory)?;

    println!(
        "{} run generated at {}",
        trajectory.tool,
        trajectory.generated_at.to_rfc3339()
    );
    println!(
        "{}",
        crate::report::format_optimization_summary(&trajectory.config, &trajectory.result)
    );

    if args.all {
        for (i, (point, evaluation)) in trajectory
            .result
            .solutions
            .iter()
            .zip(&trajectory.result.evaluations)
            .enumerate()
        {
            println!("{:>5} {:?} -> {evaluation}", i + 1, point);
        }
    }

    Ok(())
}

pub fn impedance_config_from_args(args: &ImpedanceArgs) -> ImpedanceConfig {
    let input = match &args.input {
        Some(path) => SweepInput::Csv(path.clone()),
        None => SweepInput::Synthetic(synthetic_config_from_args(&args.synthetic)),
    };
    ImpedanceConfig {
        input,
        ports: args.ports.clone(),
        spacing: args.spacing,
        export: args.export.clone(),
    }
}

fn synthetic_config_from_args(args: &SyntheticArgs) -> SyntheticConfig {
    SyntheticConfig {
        inductance: args.inductance,
        capacitance: args.capacitance,
        conductance: args.conductance,
        omega_min: args.omega_min,
        omega_max: args.omega_max,
        points: args.points,
        noise: args.noise,
        seed: args.seed,
    }
}

pub fn optimize_config_from_args(args: &OptimizeArgs) -> OptimizeConfig {
    OptimizeConfig {
        model: args.model,
        initial: args.initial.clone(),
        bounds: args.bounds.clone(),
        target: args.target,
        rho: args.rho,
        epsilon: args.epsilon,
        delta: args.delta,
        max_iterations: args.max_iterations,
        acceptable_error: args.acceptable_error,
        display: args.display,
        export: args.export.clone(),
    }
}
