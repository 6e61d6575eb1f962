#![allow(clippy::module_name_repetitions)]
//! dockwrap: a thin wrapper around the docker-compose CLI and the Docker Engine API.
//!
//! Two independent parts:
//! - [`compose`]: turns option mappings into compose argv, runs the compose
//!   program with a per-call environment overlay, and returns its stdout.
//! - [`daemon`]: async container/network/image/volume helpers over `bollard`.
//!
//! ```no_run
//! use dockwrap::{Compose, EnvOverlay, Options, Targets};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut compose = Compose::discover()?;
//! compose.set_options(Options::new().with("f", ["a.yml", "b.yml"]).with("p", "proj"));
//! compose.set_env(EnvOverlay::new().with("TAG", "1.2"));
//! let out = compose.start(None, Some(Targets::from("web")))?;
//! print!("{out}");
//! # Ok(())
//! # }
//! ```

pub mod color;
pub mod compose;
pub mod config;
pub mod daemon;
pub mod errors;
pub mod telemetry;
pub mod util;

pub use color::{
    color_enabled_stderr, log_error_stderr, log_warn_stderr, paint, set_color_mode, ColorMode,
};
pub use compose::{
    build_params, flag_token, Compose, ComposeProgram, ComposeRunner, EnvOverlay, Invocation,
    OptionValue, Options, Targets,
};
pub use config::{ComposeConfig, ConfigError};
pub use daemon::{Daemon, DaemonError, DaemonResult, ExecOutput};
pub use errors::{exit_code_for, ComposeError, ComposeResult};
pub use telemetry::telemetry_init;
pub use util::shell_join;
