//! Shared impedance and optimization workflows used by the CLI.
//!
//! Keeping these here keeps the clap layer down to argument conversion and
//! printing:
//! sweep source -> per-port extraction -> report/export
//! model objective -> Adadelta -> report/export

use rayon::prelude::*;
use tracing::info;

use crate::data::SyntheticLcSource;
use crate::domain::{
    GradientSpacing, ImpedanceConfig, OptimizationResult, OptimizeConfig, PortImpedance, SweepInput,
};
use crate::error::AppError;
use crate::io::ingest::{CsvAdmittanceSource, DEFAULT_PORT, RowError};
use crate::models::ModelObjective;
use crate::optimize::{AdadeltaOptions, CentralDifference, Problem, ProgressObserver, optimize_with};
use crate::quantization::{AdmittanceSource, calc_effective_impedance_for_port};

/// All computed outputs of a single `bbq impedance` run.
#[derive(Debug, Clone)]
pub struct ImpedanceRun {
    pub ports: Vec<PortImpedance>,
    /// Rows skipped while reading a CSV input (empty for synthetic input).
    pub row_errors: Vec<RowError>,
}

/// Execute the impedance workflow for the configured source and ports.
pub fn run_impedance(config: &ImpedanceConfig) -> Result<ImpedanceRun, AppError> {
    match &config.input {
        SweepInput::Csv(path) => {
            let source = CsvAdmittanceSource::open(path)?;
            let ports = extract_ports(&source, &config.ports, config.spacing)?;
            Ok(ImpedanceRun {
                ports,
                row_errors: source.row_errors.clone(),
            })
        }
        SweepInput::Synthetic(synthetic) => {
            let source = SyntheticLcSource::new(synthetic.clone())?;
            let ports = extract_ports(&source, &config.ports, config.spacing)?;
            Ok(ImpedanceRun {
                ports,
                row_errors: Vec::new(),
            })
        }
    }
}

/// Extract every requested port in parallel, preserving the requested order.
///
/// An empty `ports` list means every port the source advertises, or
/// `DEFAULT_PORT` for sources that do not list their ports.
pub fn extract_ports<S>(source: &S, ports: &[String], spacing: GradientSpacing) -> Result<Vec<PortImpedance>, AppError>
where
    S: AdmittanceSource + Sync + ?Sized,
{
    let names = resolve_ports(source, ports);

    let results: Vec<Result<PortImpedance, AppError>> = names
        .par_iter()
        .map(|port| {
            let extraction = calc_effective_impedance_for_port(port, source, spacing)?;
            Ok(PortImpedance {
                port: port.clone(),
                n_samples: extraction.samples,
                extraction,
            })
        })
        .collect();

    let ports = results.into_iter().collect::<Result<Vec<_>, _>>()?;
    info!(ports = ports.len(), "impedance extraction finished");
    Ok(ports)
}

fn resolve_ports<S>(source: &S, ports: &[String]) -> Vec<String>
where
    S: AdmittanceSource + ?Sized,
{
    if !ports.is_empty() {
        return ports.to_vec();
    }
    let advertised = source.port_names();
    if advertised.is_empty() {
        vec![DEFAULT_PORT.to_string()]
    } else {
        advertised
    }
}

/// Execute the optimization workflow for a built-in model objective.
pub fn run_optimize(
    config: &OptimizeConfig,
    observer: Option<&mut dyn ProgressObserver>,
) -> Result<OptimizationResult, AppError> {
    let dim = config.model.dimension();
    if config.initial.len() != dim {
        return Err(AppError::input(format!(
            "Model '{}' takes {dim} parameter(s), got an initial point with {}.",
            config.model.display_name(),
            config.initial.len()
        )));
    }

    let problem = Problem {
        initial: config.initial.clone(),
        bounds: config.bounds.clone(),
        target: config.target,
    };
    let options = AdadeltaOptions {
        rho: config.rho,
        epsilon: config.epsilon,
        delta: config.delta,
        max_iterations: config.max_iterations,
        acceptable_error: config.acceptable_error,
    };

    let mut objective = ModelObjective::new(config.model);
    let estimator = CentralDifference::new(config.delta);
    optimize_with(&mut objective, &estimator, &problem, &options, observer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AcceptableError, Bound, DisplayMode, ObjectiveModel, SyntheticConfig, Termination};
    use crate::optimize::RecordingObserver;
    use crate::quantization::InMemorySource;
    use num_complex::Complex64;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn extracts_requested_ports_in_order() {
        let mut source = InMemorySource::default();
        source.insert("Y11", vec![1.0, 2.0, 3.0, 4.0], vec![c(1.0, -2.0), c(1.0, -1.0), c(1.0, 1.0), c(1.0, 2.0)]);
        source.insert("Y22", vec![1.0, 2.0, 3.0], vec![c(0.5, 1.0), c(0.5, 2.0), c(0.5, 3.0)]);

        let ports = vec!["Y22".to_string(), "Y11".to_string()];
        let result = extract_ports(&source, &ports, GradientSpacing::Index).unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].port, "Y22");
        assert!(result[0].extraction.is_empty());
        assert_eq!(result[1].port, "Y11");
        assert_eq!(result[1].n_samples, 4);
        assert_eq!(result[0].n_samples, 3);
        assert_eq!(result[1].extraction.len(), 1);
        assert!((result[1].extraction.intercepts[0].frequency - 2.5).abs() < 1e-12);
    }

    #[test]
    fn unknown_port_fails_the_run() {
        let mut source = InMemorySource::default();
        source.insert("Y11", vec![1.0, 2.0], vec![c(1.0, -1.0), c(1.0, 1.0)]);
        let ports = vec!["Y11".to_string(), "Y33".to_string()];
        let err = extract_ports(&source, &ports, GradientSpacing::Index).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn synthetic_run_defaults_to_single_port() {
        let config = ImpedanceConfig {
            input: SweepInput::Synthetic(SyntheticConfig::default()),
            ports: Vec::new(),
            spacing: GradientSpacing::Frequency,
            export: None,
        };
        let run = run_impedance(&config).unwrap();
        assert!(run.row_errors.is_empty());
        assert_eq!(run.ports.len(), 1);
        assert_eq!(run.ports[0].port, DEFAULT_PORT);
        assert_eq!(run.ports[0].n_samples, 200);
        assert_eq!(run.ports[0].extraction.len(), 1);
        assert!((run.ports[0].extraction.impedances[0] - 100.0).abs() < 0.1);
    }

    fn charging_config() -> OptimizeConfig {
        OptimizeConfig {
            model: ObjectiveModel::ChargingEnergy,
            initial: vec![80.0],
            bounds: vec![Bound::new(10.0, 200.0)],
            target: 300.0,
            rho: 0.99,
            epsilon: 1e-2,
            delta: 1e-6,
            max_iterations: 200,
            acceptable_error: AcceptableError(0.01),
            display: DisplayMode::None,
            export: None,
        }
    }

    #[test]
    fn optimize_reaches_charging_energy_target() {
        let mut observer = RecordingObserver::default();
        let result = run_optimize(&charging_config(), Some(&mut observer)).unwrap();
        assert_eq!(result.termination, Termination::Converged);
        assert!((result.best_evaluation - 300.0).abs() / 300.0 < 0.01);
        assert_eq!(observer.iterations.len(), result.iterations);
    }

    #[test]
    fn optimize_rejects_wrong_model_dimension() {
        let mut config = charging_config();
        config.initial = vec![10.0, 400.0];
        config.bounds = vec![Bound::new(0.0, 100.0), Bound::new(0.0, 1000.0)];
        let err = run_optimize(&config, None).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("takes 1 parameter"));
    }
}
