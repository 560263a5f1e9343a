//! Adadelta gradient descent toward a target objective value.
//!
//! Each iteration, per dimension `i`:
//!
//! ```text
//! E[g²]_i  = ρ E[g²]_i  + (1 - ρ) g_i²
//! Δ_i      = (ε + sqrt(E[Δx²]_i)) / (ε + sqrt(E[g²]_i)) * g_i
//! E[Δx²]_i = ρ E[Δx²]_i + (1 - ρ) Δ_i²
//! x_i      = x_i - Δ_i
//! ```
//!
//! The run stops when a coordinate leaves its bound, when the relative error
//! of the new point reaches the acceptable fraction, or when the iteration
//! budget runs out. Every path returns the whole trajectory.
//!
//! ε is the only guard against `0 / 0` in the step scale. With `ε = 0` and
//! vanishing averages the NaN is carried through the trajectory unchanged.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::{AcceptableError, Bound, EvalMode, OptimizationResult, Termination};
use crate::error::AppError;
use crate::optimize::derivative::{CentralDifference, GradientEstimator};
use crate::optimize::objective::Objective;
use crate::optimize::observer::{IterationProgress, ProgressObserver};

/// Hyperparameters of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdadeltaOptions {
    /// Decay of both running averages.
    pub rho: f64,
    /// Stability constant in the step scale.
    pub epsilon: f64,
    /// Offset for the finite-difference gradient.
    pub delta: f64,
    pub max_iterations: usize,
    pub acceptable_error: AcceptableError,
}

impl Default for AdadeltaOptions {
    fn default() -> Self {
        Self {
            rho: 0.99,
            epsilon: 1e-5,
            delta: 1e-10,
            max_iterations: 1000,
            acceptable_error: AcceptableError::default(),
        }
    }
}

/// Starting point, box constraints and the value to reach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub initial: Vec<f64>,
    pub bounds: Vec<Bound>,
    pub target: f64,
}

/// Running averages owned by a single run.
#[derive(Debug, Clone)]
struct AdadeltaState {
    sq_grad_avg: Vec<f64>,
    sq_param_avg: Vec<f64>,
}

impl AdadeltaState {
    fn new(dim: usize) -> Self {
        Self {
            sq_grad_avg: vec![0.0; dim],
            sq_param_avg: vec![0.0; dim],
        }
    }

    fn step(&mut self, point: &[f64], gradient: &[f64], rho: f64, epsilon: f64) -> Vec<f64> {
        for (avg, g) in self.sq_grad_avg.iter_mut().zip(gradient) {
            *avg = (*avg * rho) + (g * g * (1.0 - rho));
        }

        let mut next = Vec::with_capacity(point.len());
        for i in 0..point.len() {
            let scale = (epsilon + self.sq_param_avg[i].sqrt()) / (epsilon + self.sq_grad_avg[i].sqrt());
            let change = scale * gradient[i];
            self.sq_param_avg[i] = (self.sq_param_avg[i] * rho) + (change * change * (1.0 - rho));
            next.push(point[i] - change);
        }
        next
    }
}

/// Optimize with central differences and no progress reporting.
pub fn optimize(
    objective: &mut dyn Objective,
    problem: &Problem,
    options: &AdadeltaOptions,
) -> Result<OptimizationResult, AppError> {
    let estimator = CentralDifference::new(options.delta);
    optimize_with(objective, &estimator, problem, options, None)
}

/// Optimize with a custom gradient estimator and an optional observer.
pub fn optimize_with(
    objective: &mut dyn Objective,
    estimator: &dyn GradientEstimator,
    problem: &Problem,
    options: &AdadeltaOptions,
    mut observer: Option<&mut dyn ProgressObserver>,
) -> Result<OptimizationResult, AppError> {
    validate(problem, options)?;

    let dim = problem.initial.len();
    let target = problem.target;
    let acceptable = options.acceptable_error.fraction();

    let mut state = AdadeltaState::new(dim);
    let mut solution = problem.initial.clone();
    let mut solutions: Vec<Vec<f64>> = Vec::new();
    let mut evaluations: Vec<f64> = Vec::new();
    let mut termination = Termination::IterationsExhausted;

    for iteration in 1..=options.max_iterations {
        let gradient = estimator.gradient(objective, &solution, target)?;
        if gradient.len() != dim {
            return Err(AppError::input(format!(
                "Gradient estimator returned {} components for a {dim}-dimensional point.",
                gradient.len()
            )));
        }

        let next = state.step(&solution, &gradient, options.rho, options.epsilon);
        let evaluation = objective.evaluate(&next, target, EvalMode::True)?;
        let fraction_error = relative_error(evaluation, target);

        debug!(iteration, ?next, evaluation, fraction_error, "adadelta step");

        let out_of_bounds = next
            .iter()
            .zip(&problem.bounds)
            .any(|(&x, bound)| !bound.contains(x));

        solutions.push(next.clone());
        evaluations.push(evaluation);

        if out_of_bounds {
            termination = Termination::BoundReached;
            break;
        }

        // The point that left the box is recorded but never reported.
        if let Some(obs) = observer.as_mut() {
            obs.on_iteration(&IterationProgress {
                iteration,
                max_iterations: options.max_iterations,
                point: &next,
                evaluation,
                fraction_error,
            });
        }
        solution = next;

        if fraction_error <= acceptable {
            termination = Termination::Converged;
            break;
        }
    }

    let result = finish(solutions, evaluations, target, termination);
    info!(
        termination = result.termination.display_name(),
        iterations = result.iterations,
        best_evaluation = result.best_evaluation,
        percent_error = result.percent_error,
        "optimization finished"
    );
    Ok(result)
}

/// `|actual - target| / |target|`; non-finite when `target == 0`.
pub fn relative_error(actual: f64, target: f64) -> f64 {
    ((actual - target) / target).abs()
}

/// Index of the evaluation closest to `target`.
///
/// A NaN deviation wins immediately (first occurrence) so undefined states are
/// reported rather than skipped. Ties keep the earliest index.
pub fn best_index(evaluations: &[f64], target: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, e) in evaluations.iter().enumerate() {
        let deviation = (e - target).abs();
        if deviation.is_nan() {
            return Some(i);
        }
        match best {
            Some((_, d)) if deviation >= d => {}
            _ => best = Some((i, deviation)),
        }
    }
    best.map(|(i, _)| i)
}

fn finish(
    solutions: Vec<Vec<f64>>,
    evaluations: Vec<f64>,
    target: f64,
    termination: Termination,
) -> OptimizationResult {
    // `validate` guarantees at least one iteration ran.
    let best = best_index(&evaluations, target).unwrap_or(0);
    let best_evaluation = evaluations[best];
    OptimizationResult {
        iterations: solutions.len(),
        best_point: solutions[best].clone(),
        best_index: best,
        best_evaluation,
        percent_error: relative_error(best_evaluation, target) * 100.0,
        termination,
        solutions,
        evaluations,
    }
}

fn validate(problem: &Problem, options: &AdadeltaOptions) -> Result<(), AppError> {
    if problem.initial.is_empty() {
        return Err(AppError::input("Initial point must have at least one dimension."));
    }
    if problem.bounds.len() != problem.initial.len() {
        return Err(AppError::input(format!(
            "Bounds count ({}) does not match initial point dimension ({}).",
            problem.bounds.len(),
            problem.initial.len()
        )));
    }
    for (i, b) in problem.bounds.iter().enumerate() {
        if !(b.min.is_finite() && b.max.is_finite()) || b.min > b.max {
            return Err(AppError::input(format!(
                "Invalid bound #{i}: [{}, {}] (must be finite with min <= max).",
                b.min, b.max
            )));
        }
    }
    if options.max_iterations == 0 {
        return Err(AppError::input("max_iterations must be >= 1."));
    }
    if !(0.0..=1.0).contains(&options.rho) {
        return Err(AppError::input(format!("rho must lie in [0, 1], got {}.", options.rho)));
    }
    if !(options.epsilon.is_finite() && options.epsilon >= 0.0) {
        return Err(AppError::input(format!(
            "epsilon must be finite and >= 0, got {}.",
            options.epsilon
        )));
    }
    if !(options.delta.is_finite() && options.delta > 0.0) {
        return Err(AppError::input(format!(
            "delta must be finite and > 0, got {}.",
            options.delta
        )));
    }
    if !(options.acceptable_error.fraction() >= 0.0) {
        return Err(AppError::input("Acceptable error must be >= 0."));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimize::observer::RecordingObserver;

    fn distance_stub(x: &[f64], target: f64, mode: EvalMode) -> Result<f64, AppError> {
        Ok(match mode {
            EvalMode::Abs => (x[0] - target).abs(),
            EvalMode::True => x[0],
        })
    }

    fn tuned_options() -> AdadeltaOptions {
        AdadeltaOptions {
            epsilon: 1e-2,
            delta: 1e-6,
            acceptable_error: "1%".parse().unwrap(),
            ..AdadeltaOptions::default()
        }
    }

    fn one_dim(bound: Bound) -> Problem {
        Problem {
            initial: vec![0.0],
            bounds: vec![bound],
            target: 5.0,
        }
    }

    struct ConstantGradient(Vec<f64>);

    impl GradientEstimator for ConstantGradient {
        fn gradient(&self, _: &mut dyn Objective, _: &[f64], _: f64) -> Result<Vec<f64>, AppError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn distance_stub_converges_within_one_percent() {
        let mut f = |x: &[f64], t: f64, _m: EvalMode| -> Result<f64, AppError> { Ok((x[0] - t).abs()) };
        let options = AdadeltaOptions {
            acceptable_error: "1%".parse().unwrap(),
            ..AdadeltaOptions::default()
        };
        let result = optimize(&mut f, &one_dim(Bound::new(-10.0, 10.0)), &options).unwrap();
        assert_eq!(result.termination, Termination::Converged);
        assert!(result.iterations < 1000);
        assert!((result.best_evaluation - 5.0).abs() / 5.0 <= 0.01);
        assert!(result.percent_error <= 1.0);
    }

    #[test]
    fn value_stub_walks_toward_target() {
        let result = optimize(&mut distance_stub, &one_dim(Bound::new(-10.0, 10.0)), &tuned_options()).unwrap();
        assert_eq!(result.termination, Termination::Converged);
        assert!(result.iterations <= 100, "took {} iterations", result.iterations);
        assert!((result.best_point[0] - 5.0).abs() <= 0.05);
        assert_eq!(result.best_index, result.iterations - 1);
        assert_eq!(result.solutions.len(), result.evaluations.len());
    }

    #[test]
    fn leaving_the_box_stops_with_partial_history() {
        let result = optimize(&mut distance_stub, &one_dim(Bound::new(-0.5, 0.5)), &tuned_options()).unwrap();
        assert_eq!(result.termination, Termination::BoundReached);
        let last = result.solutions.last().unwrap();
        assert!(last[0] > 0.5);
        for s in &result.solutions[..result.solutions.len() - 1] {
            assert!(s[0] <= 0.5);
        }
        assert!(result.best_index < result.solutions.len());
    }

    #[test]
    fn budget_exhaustion_returns_full_trajectory() {
        let options = AdadeltaOptions {
            max_iterations: 5,
            ..tuned_options()
        };
        let result = optimize(&mut distance_stub, &one_dim(Bound::new(-10.0, 10.0)), &options).unwrap();
        assert_eq!(result.termination, Termination::IterationsExhausted);
        assert_eq!(result.iterations, 5);
        assert_eq!(result.solutions.len(), 5);
        // Monotone progress toward 5, so the last point is the best.
        assert_eq!(result.best_index, 4);
    }

    #[test]
    fn best_point_is_closest_not_last() {
        let scripted = [3.0, 4.9, 4.0, 3.5];
        let mut calls = 0usize;
        let mut f = |_x: &[f64], _t: f64, m: EvalMode| -> Result<f64, AppError> {
            assert_eq!(m, EvalMode::True);
            let v = scripted[calls];
            calls += 1;
            Ok(v)
        };
        let options = AdadeltaOptions {
            max_iterations: 4,
            ..tuned_options()
        };
        let result = optimize_with(
            &mut f,
            &ConstantGradient(vec![-1.0]),
            &one_dim(Bound::new(-10.0, 10.0)),
            &options,
            None,
        )
        .unwrap();
        assert_eq!(result.termination, Termination::IterationsExhausted);
        assert_eq!(result.best_index, 1);
        assert_eq!(result.best_evaluation, 4.9);
        assert_eq!(result.best_point, result.solutions[1]);
        assert!((result.percent_error - 2.0).abs() < 1e-9);
    }

    #[test]
    fn zero_epsilon_with_flat_objective_propagates_nan() {
        let mut flat = |x: &[f64], _t: f64, m: EvalMode| -> Result<f64, AppError> {
            Ok(match m {
                EvalMode::Abs => 1.0,
                EvalMode::True => x[0],
            })
        };
        let options = AdadeltaOptions {
            epsilon: 0.0,
            max_iterations: 3,
            ..tuned_options()
        };
        let result = optimize(&mut flat, &one_dim(Bound::new(-10.0, 10.0)), &options).unwrap();
        assert_eq!(result.termination, Termination::IterationsExhausted);
        assert!(result.solutions[0][0].is_nan());
        assert_eq!(result.best_index, 0);
        assert!(result.best_evaluation.is_nan());
        assert!(result.percent_error.is_nan());
    }

    #[test]
    fn configuration_errors_fail_before_any_evaluation() {
        let mut calls = 0usize;
        let mut f = |_x: &[f64], _t: f64, _m: EvalMode| -> Result<f64, AppError> {
            calls += 1;
            Ok(0.0)
        };

        let mismatched = Problem {
            initial: vec![0.0, 1.0],
            bounds: vec![Bound::new(-1.0, 1.0)],
            target: 1.0,
        };
        let err = optimize(&mut f, &mismatched, &AdadeltaOptions::default()).unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let inverted = one_dim(Bound::new(1.0, -1.0));
        assert_eq!(optimize(&mut f, &inverted, &AdadeltaOptions::default()).unwrap_err().exit_code(), 2);

        let no_budget = AdadeltaOptions {
            max_iterations: 0,
            ..AdadeltaOptions::default()
        };
        assert!(optimize(&mut f, &one_dim(Bound::new(-1.0, 1.0)), &no_budget).is_err());

        let bad_rho = AdadeltaOptions {
            rho: 1.5,
            ..AdadeltaOptions::default()
        };
        assert!(optimize(&mut f, &one_dim(Bound::new(-1.0, 1.0)), &bad_rho).is_err());

        assert_eq!(calls, 0);
    }

    #[test]
    fn objective_errors_reach_the_caller_unchanged() {
        let mut f = |_x: &[f64], _t: f64, m: EvalMode| -> Result<f64, AppError> {
            match m {
                EvalMode::Abs => Ok(1.0),
                EvalMode::True => Err(AppError::new(9, "simulation diverged")),
            }
        };
        let err = optimize(&mut f, &one_dim(Bound::new(-1.0, 1.0)), &AdadeltaOptions::default()).unwrap_err();
        assert_eq!(err.exit_code(), 9);
        assert_eq!(err.message(), "simulation diverged");
    }

    #[test]
    fn observer_sees_every_iteration() {
        let mut observer = RecordingObserver::default();
        let options = AdadeltaOptions {
            max_iterations: 7,
            ..tuned_options()
        };
        let result = optimize_with(
            &mut distance_stub,
            &CentralDifference::new(options.delta),
            &one_dim(Bound::new(-10.0, 10.0)),
            &options,
            Some(&mut observer),
        )
        .unwrap();
        assert_eq!(observer.iterations.len(), result.iterations);
        for (k, (iteration, point, evaluation, _)) in observer.iterations.iter().enumerate() {
            assert_eq!(*iteration, k + 1);
            assert_eq!(point, &result.solutions[k]);
            assert_eq!(*evaluation, result.evaluations[k]);
        }
    }

    #[test]
    fn observer_skips_the_iteration_that_leaves_the_box() {
        let mut observer = RecordingObserver::default();
        let options = tuned_options();
        let result = optimize_with(
            &mut distance_stub,
            &CentralDifference::new(options.delta),
            &one_dim(Bound::new(-0.5, 0.5)),
            &options,
            Some(&mut observer),
        )
        .unwrap();
        assert_eq!(result.termination, Termination::BoundReached);
        assert_eq!(observer.iterations.len(), result.iterations - 1);
        for (k, (iteration, point, _, _)) in observer.iterations.iter().enumerate() {
            assert_eq!(*iteration, k + 1);
            assert_eq!(point, &result.solutions[k]);
        }
    }

    #[test]
    fn best_index_prefers_nan_then_earliest_minimum() {
        assert_eq!(best_index(&[], 1.0), None);
        assert_eq!(best_index(&[3.0, 1.5, 0.5, 1.5], 1.0), Some(1));
        assert_eq!(best_index(&[1.0, f64::NAN, 1.0], 1.0), Some(1));
    }

    #[test]
    fn zero_target_never_converges() {
        assert!(!relative_error(0.0, 0.0).is_finite());
        assert!(relative_error(1.0, 0.0).is_infinite());
    }
}
