#![allow(clippy::module_name_repetitions)]
//! Compose CLI invocation: flag formatting, argv assembly and process execution.
//!
//! Layout:
//! - options: flag mappings and positional targets
//! - args: mapping → argv token rules
//! - env: per-call environment overlay
//! - runtime: locating the compose program
//! - runner: the execution lifecycle and the configured `Compose` instance
//! - commands: per-subcommand parameter shaping

pub mod args;
pub mod commands;
pub mod env;
pub mod options;
pub mod runner;
pub mod runtime;

pub use args::{build_params, flag_token};
pub use env::EnvOverlay;
pub use options::{OptionValue, Options, Targets};
pub use runner::{Compose, ComposeRunner, Invocation};
pub use runtime::ComposeProgram;
