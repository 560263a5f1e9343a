//! Console progress printing for optimization runs.

use std::io::Write;

use crate::domain::DisplayMode;
use crate::optimize::{IterationProgress, ProgressObserver};
use crate::report::format::fmt_vec;

/// Prints one line per iteration in the chosen `DisplayMode`.
pub struct ConsoleObserver<W: Write> {
    mode: DisplayMode,
    out: W,
}

impl ConsoleObserver<std::io::Stdout> {
    pub fn stdout(mode: DisplayMode) -> Self {
        Self::new(mode, std::io::stdout())
    }
}

impl<W: Write> ConsoleObserver<W> {
    pub fn new(mode: DisplayMode, out: W) -> Self {
        Self { mode, out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Render one progress line, or `None` in `DisplayMode::None`.
pub fn format_progress(mode: DisplayMode, p: &IterationProgress<'_>) -> Option<String> {
    let tail = format!(
        "f({}) = {:.5}; Percentage from desired value = {:.5}",
        fmt_vec(p.point),
        p.evaluation,
        p.fraction_error
    );
    match mode {
        DisplayMode::None => None,
        DisplayMode::Iteration => Some(format!(">#{} {tail}", p.iteration)),
        DisplayMode::Percentage => Some(format!(">{:.5}% {tail}", p.percent_complete())),
        DisplayMode::Both => Some(format!(">{}, {:.5}% {tail}", p.iteration, p.percent_complete())),
    }
}

impl<W: Write> ProgressObserver for ConsoleObserver<W> {
    fn on_iteration(&mut self, progress: &IterationProgress<'_>) {
        if let Some(line) = format_progress(self.mode, progress) {
            // Progress output is best-effort; a closed pipe must not abort the run.
            let _ = writeln!(self.out, "{line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(point: &[f64]) -> IterationProgress<'_> {
        IterationProgress {
            iteration: 3,
            max_iterations: 12,
            point,
            evaluation: 4.5,
            fraction_error: 0.1,
        }
    }

    #[test]
    fn display_modes_render_expected_prefixes() {
        let point = [1.0];
        let p = progress(&point);
        assert_eq!(format_progress(DisplayMode::None, &p), None);
        assert!(format_progress(DisplayMode::Iteration, &p).unwrap().starts_with(">#3 f([1.000000])"));
        assert!(format_progress(DisplayMode::Percentage, &p).unwrap().starts_with(">25.00000% "));
        assert!(format_progress(DisplayMode::Both, &p).unwrap().starts_with(">3, 25.00000% "));
    }

    #[test]
    fn console_observer_writes_one_line_per_iteration() {
        let point = [2.0];
        let mut observer = ConsoleObserver::new(DisplayMode::Iteration, Vec::new());
        observer.on_iteration(&progress(&point));
        observer.on_iteration(&progress(&point));
        let text = String::from_utf8(observer.into_inner()).unwrap();
        assert_eq!(text.lines().count(), 2);

        let mut silent = ConsoleObserver::new(DisplayMode::None, Vec::new());
        silent.on_iteration(&progress(&point));
        assert!(silent.into_inner().is_empty());
    }
}
