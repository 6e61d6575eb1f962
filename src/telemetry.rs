//! Logging setup for the `dockwrap` binary.
//!
//! Filter source, first match wins:
//! - `DOCKWRAP_LOG`
//! - `RUST_LOG`
//! - `debug` with `--verbose`, else `warn`
//!
//! Output always goes to stderr so compose stdout stays clean for piping.

use std::env;

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

static INIT: OnceCell<()> = OnceCell::new();

fn filter_directives(verbose: bool) -> String {
    for key in ["DOCKWRAP_LOG", "RUST_LOG"] {
        if let Ok(v) = env::var(key) {
            let v = v.trim();
            if !v.is_empty() {
                return v.to_string();
            }
        }
    }
    let level = if verbose { "debug" } else { "warn" };
    level.to_string()
}

/// Install the global subscriber. Returns false if one was already installed
/// (by an earlier call or by the embedding application).
pub fn telemetry_init(verbose: bool) -> bool {
    if INIT.get().is_some() {
        return false;
    }
    let filter = EnvFilter::try_new(filter_directives(verbose))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok();
    let _ = INIT.set(());
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_a_noop() {
        let _ = telemetry_init(false);
        assert!(!telemetry_init(true));
    }
}
