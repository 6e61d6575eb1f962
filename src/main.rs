mod cli;
mod commands;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Command};

fn run(cli: &Cli) -> Result<()> {
    if let Command::Daemon { json, what } = &cli.command {
        return commands::run_daemon(what, *json);
    }
    match commands::invocation_for(&cli.command) {
        Some(invocation) => commands::run_compose(cli, invocation),
        None => Ok(()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Some(mode) = cli.color {
        dockwrap::set_color_mode(mode);
    }
    dockwrap::telemetry_init(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let use_err = dockwrap::color_enabled_stderr();
            dockwrap::log_error_stderr(use_err, &format!("dockwrap: {e:#}"));
            ExitCode::from(dockwrap::exit_code_for(&e))
        }
    }
}
