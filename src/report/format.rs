//! Formatted terminal output for impedance extractions and optimization runs.
//!
//! We keep formatting code in one place so:
//! - the numerical code stays clean and testable
//! - output changes are localized

use crate::domain::{OptimizationResult, OptimizeConfig, PortImpedance};

/// Format the per-port intercept/impedance tables.
pub fn format_impedance_report(ports: &[PortImpedance]) -> String {
    let mut out = String::new();

    out.push_str("=== bbq - Black-box effective impedance ===\n");
    for port in ports {
        out.push_str(&format!(
            "\nPort {}: samples={} intercepts={}\n",
            port.port,
            port.n_samples,
            port.extraction.intercepts.len()
        ));
        if port.extraction.is_empty() {
            out.push_str("  (no zero crossings of Im Y)\n");
            continue;
        }

        out.push_str(
            format!(
                "{:>4} {:<13} {:>16} {:>14} {:>14} {:>16}",
                "#", "kind", "frequency", "Re Y", "Im Y'", "Z_eff"
            )
            .trim_end(),
        );
        out.push('\n');
        out.push_str(&"-".repeat(4 + 1 + 13 + 1 + 16 + 1 + 14 + 1 + 14 + 1 + 16));
        out.push('\n');

        for (i, (x, z)) in port
            .extraction
            .intercepts
            .iter()
            .zip(&port.extraction.impedances)
            .enumerate()
        {
            out.push_str(&format!(
                "{:>4} {:<13} {:>16.6e} {:>14.4e} {:>14.4e} {:>16}\n",
                i,
                x.kind.as_str(),
                x.frequency,
                x.value.re,
                x.gradient.im,
                fmt_impedance(*z),
            ));
        }

        let singular = port.extraction.singular_indices();
        if !singular.is_empty() {
            out.push_str(&format!("  singular intercepts: {singular:?}\n"));
        }
    }

    out
}

/// Format the outcome of an optimization run.
pub fn format_optimization_summary(config: &OptimizeConfig, result: &OptimizationResult) -> String {
    let mut out = String::new();

    out.push_str("=== bbq - Adadelta design optimization ===\n");
    out.push_str(&format!("Model: {}\n", config.model.display_name()));
    out.push_str(&format!("Target: {}\n", config.target));
    out.push_str(&format!(
        "Hyperparameters: rho={} epsilon={:e} delta={:e} max_iterations={} acceptable={:.3}%\n",
        config.rho,
        config.epsilon,
        config.delta,
        config.max_iterations,
        config.acceptable_error.fraction() * 100.0
    ));
    out.push_str(&format!(
        "Stopped: {} after {} iteration(s)\n",
        result.termination.display_name(),
        result.iterations
    ));
    out.push_str(&format!(
        "\nSolution: f({}) = {:.5}; Percentage from desired value = {:.5}\n",
        fmt_vec(&result.best_point),
        result.best_evaluation,
        result.percent_error
    ));
    out.push_str(&format!(
        "(best of {} visited points, index {})\n",
        result.solutions.len(),
        result.best_index
    ));

    out
}

pub(crate) fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.6}")).collect();
    format!("[{}]", parts.join(", "))
}

fn fmt_impedance(z: f64) -> String {
    if z.is_finite() {
        format!("{z:.6}")
    } else {
        format!("{z} (singular)")
    }
}
