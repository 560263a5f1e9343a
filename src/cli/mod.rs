//! Command-line parsing for the black-box quantization toolkit.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! extraction/optimization code. Every option can also come from a `BBQ_*`
//! environment variable (or a `.env` file loaded at start-up).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{AcceptableError, Bound, DisplayMode, GradientSpacing, ObjectiveModel};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "bbq", version, about = "Black-box quantization: effective impedance and design tuning")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract effective impedances at the zero crossings of Im Y.
    Impedance(ImpedanceArgs),
    /// Tune design parameters of a built-in model toward a target value.
    Optimize(OptimizeArgs),
    /// Print a trajectory JSON written by `bbq optimize --export`.
    Show(ShowArgs),
}

/// Options for `bbq impedance`.
#[derive(Debug, Args, Clone)]
pub struct ImpedanceArgs {
    /// Admittance sweep CSV (`frequency,re,im[,port]`). Without it a synthetic
    /// parallel-LC sweep is generated.
    #[arg(short, long, value_name = "CSV", env = "BBQ_INPUT")]
    pub input: Option<PathBuf>,

    /// Port pair to extract (repeatable). Defaults to every port in the input.
    #[arg(short, long = "port", value_name = "NAME")]
    pub ports: Vec<String>,

    /// Spacing used for the derivative of Y.
    #[arg(long, value_enum, default_value_t = GradientSpacing::Index, env = "BBQ_SPACING")]
    pub spacing: GradientSpacing,

    /// Export per-intercept results to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    #[command(flatten)]
    pub synthetic: SyntheticArgs,
}

/// Parameters of the synthetic parallel-LC sweep.
#[derive(Debug, Args, Clone)]
pub struct SyntheticArgs {
    /// Inductance (H).
    #[arg(long, default_value_t = 10e-9, env = "BBQ_SYNTH_L")]
    pub inductance: f64,

    /// Capacitance (F).
    #[arg(long, default_value_t = 1e-12, env = "BBQ_SYNTH_C")]
    pub capacitance: f64,

    /// Shunt conductance (S).
    #[arg(long, default_value_t = 1e-3, env = "BBQ_SYNTH_G")]
    pub conductance: f64,

    /// Lowest angular frequency (rad/s).
    #[arg(long, default_value_t = 0.5e10)]
    pub omega_min: f64,

    /// Highest angular frequency (rad/s).
    #[arg(long, default_value_t = 1.5e10)]
    pub omega_max: f64,

    /// Number of sweep points.
    #[arg(long, default_value_t = 200)]
    pub points: usize,

    /// Standard deviation of Gaussian noise added to Im Y (S).
    #[arg(long, default_value_t = 0.0)]
    pub noise: f64,

    /// Random seed for the noise.
    #[arg(long, default_value_t = 42, env = "BBQ_SEED")]
    pub seed: u64,
}

/// Options for `bbq optimize`.
#[derive(Debug, Args, Clone)]
pub struct OptimizeArgs {
    /// Objective to tune.
    #[arg(short, long, value_enum, default_value_t = ObjectiveModel::LcFrequency, env = "BBQ_MODEL")]
    pub model: ObjectiveModel,

    /// Starting point, comma separated (e.g. `10,400` for L nH, C fF).
    #[arg(long, value_delimiter = ',', required = true, allow_hyphen_values = true)]
    pub initial: Vec<f64>,

    /// Per-dimension bounds `min:max`, comma separated.
    #[arg(long, value_delimiter = ',', required = true, allow_hyphen_values = true)]
    pub bounds: Vec<Bound>,

    /// Value the objective should reach.
    #[arg(short, long, allow_negative_numbers = true)]
    pub target: f64,

    /// Decay of the running averages.
    #[arg(long, default_value_t = 0.99, env = "BBQ_RHO")]
    pub rho: f64,

    /// Stability constant of the step scale.
    #[arg(long, default_value_t = 1e-5, env = "BBQ_EPSILON")]
    pub epsilon: f64,

    /// Finite-difference offset.
    #[arg(long, default_value_t = 1e-10, env = "BBQ_DELTA")]
    pub delta: f64,

    /// Iteration budget.
    #[arg(long, default_value_t = 1000, env = "BBQ_MAX_ITERATIONS")]
    pub max_iterations: usize,

    /// Acceptable relative error as a percentage (e.g. `5%`).
    #[arg(long, default_value = "5%", env = "BBQ_ACCEPTABLE_ERROR")]
    pub acceptable_error: AcceptableError,

    /// Progress output per iteration.
    #[arg(long, value_enum, default_value_t = DisplayMode::None, env = "BBQ_DISPLAY")]
    pub display: DisplayMode,

    /// Export the trajectory to JSON.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}

/// Options for `bbq show`.
#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    /// Trajectory JSON produced by `bbq optimize --export`.
    #[arg(value_name = "JSON")]
    pub trajectory: PathBuf,

    /// Also list every visited point.
    #[arg(long)]
    pub all: bool,
}
