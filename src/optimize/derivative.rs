//! Numerical gradients of black-box objectives.

use crate::domain::EvalMode;
use crate::error::AppError;
use crate::optimize::objective::Objective;

/// Produces a gradient estimate of the objective around `point`.
pub trait GradientEstimator {
    fn gradient(
        &self,
        objective: &mut dyn Objective,
        point: &[f64],
        target: f64,
    ) -> Result<Vec<f64>, AppError>;
}

/// Central finite differences, one dimension at a time.
///
/// For dimension `i` a fresh one-hot offset `δ e_i` is built and
///
/// ```text
/// g_i = (f(r + δ e_i) - f(r - δ e_i)) / (2 δ)
/// ```
///
/// is evaluated in `EvalMode::Abs`. Costs `2 n` objective calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CentralDifference {
    pub delta: f64,
}

impl CentralDifference {
    pub fn new(delta: f64) -> Self {
        Self { delta }
    }
}

impl GradientEstimator for CentralDifference {
    fn gradient(
        &self,
        objective: &mut dyn Objective,
        point: &[f64],
        target: f64,
    ) -> Result<Vec<f64>, AppError> {
        let mut gradient = Vec::with_capacity(point.len());
        for i in 0..point.len() {
            let offset = one_hot(point.len(), i, self.delta);
            let forward: Vec<f64> = point.iter().zip(&offset).map(|(x, d)| x + d).collect();
            let backward: Vec<f64> = point.iter().zip(&offset).map(|(x, d)| x - d).collect();

            let f_plus = objective.evaluate(&forward, target, EvalMode::Abs)?;
            let f_minus = objective.evaluate(&backward, target, EvalMode::Abs)?;
            gradient.push((f_plus - f_minus) / (2.0 * self.delta));
        }
        Ok(gradient)
    }
}

fn one_hot(len: usize, index: usize, value: f64) -> Vec<f64> {
    let mut v = vec![0.0; len];
    v[index] = value;
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_has_point_dimension() {
        let mut f = |x: &[f64], _t: f64, _m: EvalMode| -> Result<f64, AppError> {
            Ok(3.0 * x[0] - 2.0 * x[1] + 0.5 * x[2])
        };
        let g = CentralDifference::new(1e-6)
            .gradient(&mut f, &[1.0, 2.0, 3.0], 0.0)
            .unwrap();
        assert_eq!(g.len(), 3);
        assert!((g[0] - 3.0).abs() < 1e-6);
        assert!((g[1] + 2.0).abs() < 1e-6);
        assert!((g[2] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn only_perturbs_one_dimension_at_a_time() {
        let mut calls: Vec<Vec<f64>> = Vec::new();
        let mut f = |x: &[f64], _t: f64, m: EvalMode| -> Result<f64, AppError> {
            assert_eq!(m, EvalMode::Abs);
            calls.push(x.to_vec());
            Ok(0.0)
        };
        CentralDifference::new(0.5)
            .gradient(&mut f, &[1.0, 1.0], 0.0)
            .unwrap();
        assert_eq!(
            calls,
            vec![vec![1.5, 1.0], vec![0.5, 1.0], vec![1.0, 1.5], vec![1.0, 0.5]]
        );
    }

    #[test]
    fn objective_errors_pass_through() {
        let mut f = |_x: &[f64], _t: f64, _m: EvalMode| -> Result<f64, AppError> {
            Err(AppError::new(7, "solver crashed"))
        };
        let err = CentralDifference::new(1e-3)
            .gradient(&mut f, &[0.0], 0.0)
            .unwrap_err();
        assert_eq!(err.exit_code(), 7);
        assert_eq!(err.message(), "solver crashed");
    }
}
