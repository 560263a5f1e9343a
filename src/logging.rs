//! Tracing subscriber setup for the `bbq` binary.
//!
//! Library code only emits `tracing` events; installing a subscriber is the
//! binary's job. Output goes to stderr so reports on stdout stay pipeable.

use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (`RUST_LOG` syntax).
pub const LOG_ENV: &str = "BBQ_LOG";

const DEFAULT_FILTER: &str = "warn";

static INITIALISED: OnceLock<()> = OnceLock::new();

/// Install the global fmt subscriber once.
///
/// Returns `false` if tracing was already initialised, by this function or by
/// someone else.
pub fn init_tracing() -> bool {
    if INITIALISED.set(()).is_err() {
        return false;
    }

    tracing_subscriber::fmt()
        .with_env_filter(build_filter())
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .is_ok()
}

/// Filter from `BBQ_LOG`, then `RUST_LOG`, then `warn`.
fn build_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_initialisation_is_refused() {
        let _ = init_tracing();
        assert!(!init_tracing());
    }
}
