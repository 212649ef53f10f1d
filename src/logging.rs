//! `tracing` subscriber setup.
//!
//! `RUST_LOG` always wins. Otherwise the level comes from `HVCALC_LOG`
//! (via `config::Defaults`). Output goes to stderr so stdout stays clean for
//! reports and piping.

use tracing_subscriber::EnvFilter;

/// Build the filter: `RUST_LOG` if set and valid, else `level`.
fn build_filter(level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the global subscriber. Safe to call more than once.
///
/// With `interactive = true` (the TUI owns the terminal) logging is off unless
/// `RUST_LOG` asks for it.
pub fn init(level: &str, interactive: bool) {
    let filter = if interactive && std::env::var_os("RUST_LOG").is_none() {
        EnvFilter::new("off")
    } else {
        build_filter(level)
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    tracing::debug!(level = %level, interactive, "logging initialized");
}
