//! Per-iteration progress hooks.
//!
//! Observers see each accepted candidate and never influence the run.

/// Snapshot handed to observers after each iteration.
#[derive(Debug, Clone, Copy)]
pub struct IterationProgress<'a> {
    /// 1-based iteration number.
    pub iteration: usize,
    pub max_iterations: usize,
    pub point: &'a [f64],
    pub evaluation: f64,
    /// `|evaluation - target| / |target|` as a fraction.
    pub fraction_error: f64,
}

impl IterationProgress<'_> {
    /// Share of the iteration budget used so far, in percent.
    pub fn percent_complete(&self) -> f64 {
        self.iteration as f64 / self.max_iterations as f64 * 100.0
    }
}

pub trait ProgressObserver {
    fn on_iteration(&mut self, progress: &IterationProgress<'_>);
}

/// Records every snapshot; handy for tests and notebooks.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    pub iterations: Vec<(usize, Vec<f64>, f64, f64)>,
}

impl ProgressObserver for RecordingObserver {
    fn on_iteration(&mut self, progress: &IterationProgress<'_>) {
        self.iterations.push((
            progress.iteration,
            progress.point.to_vec(),
            progress.evaluation,
            progress.fraction_error,
        ));
    }
}
