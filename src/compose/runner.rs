#![allow(clippy::module_name_repetitions)]
//! Execution lifecycle: argv assembly, spawn, and outcome mapping.

use std::path::PathBuf;

use tracing::{debug, instrument, warn};

use super::args::build_params;
use super::env::EnvOverlay;
use super::options::{Options, Targets};
use super::runtime::ComposeProgram;
use crate::errors::{ComposeError, ComposeResult};
use crate::util::exec::ExecRequest;

/// One subcommand call: the literal name plus whichever of options, targets and
/// trailing argument the subcommand takes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    subcommand: String,
    options: Option<Options>,
    targets: Option<Targets>,
    extra: Option<String>,
}

impl Invocation {
    pub fn new(subcommand: impl Into<String>) -> Self {
        Self {
            subcommand: subcommand.into(),
            options: None,
            targets: None,
            extra: None,
        }
    }

    pub fn options(mut self, options: Option<Options>) -> Self {
        self.options = options;
        self
    }

    pub fn targets(mut self, targets: Option<Targets>) -> Self {
        self.targets = targets;
        self
    }

    /// Trailing raw token, appended after the targets without flag formatting.
    pub fn extra(mut self, extra: Option<String>) -> Self {
        self.extra = extra;
        self
    }

    pub fn subcommand(&self) -> &str {
        &self.subcommand
    }

    /// Tokens following the primary options: subcommand, its flags, targets, extra.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![self.subcommand.clone()];
        args.extend(build_params(self.options.as_ref()));
        if let Some(ref targets) = self.targets {
            args.extend(targets.to_args());
        }
        if let Some(ref extra) = self.extra {
            args.push(extra.clone());
        }
        args
    }
}

/// Stateless executor: everything a call needs is passed in.
#[derive(Debug, Clone, Default)]
pub struct ComposeRunner {
    program: ComposeProgram,
    cwd: Option<PathBuf>,
}

impl ComposeRunner {
    pub fn new(program: ComposeProgram) -> Self {
        Self { program, cwd: None }
    }

    /// Run the child from `dir` instead of the current directory.
    pub fn with_cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn program(&self) -> &ComposeProgram {
        &self.program
    }

    /// Full argv after the program name.
    pub fn command_args(&self, primary: &Options, invocation: &Invocation) -> Vec<String> {
        let mut args = self.program.leading_args.clone();
        args.extend(build_params(Some(primary)));
        args.extend(invocation.to_args());
        args
    }

    pub fn request(
        &self,
        primary: &Options,
        overlay: &EnvOverlay,
        invocation: &Invocation,
    ) -> ExecRequest {
        let mut req = ExecRequest::new(&self.program.program)
            .args(self.command_args(primary, invocation))
            .inherit_env(true);
        if let Some(ref cwd) = self.cwd {
            req = req.cwd(cwd);
        }
        for (k, v) in overlay.iter() {
            req = req.env(k, v);
        }
        req
    }

    /// Run one invocation. Resolves to stdout on exit status zero; any other
    /// outcome is an error carrying the status and stderr.
    #[instrument(level = "debug", skip_all, fields(subcommand = %invocation.subcommand()))]
    pub fn execute(
        &self,
        primary: &Options,
        overlay: &EnvOverlay,
        invocation: &Invocation,
    ) -> ComposeResult<String> {
        let req = self.request(primary, overlay, invocation);
        debug!(argv = ?req.arg_list(), overlay = overlay.len(), "compose call");
        let out = req.run()?;
        if out.status.success() {
            Ok(out.stdout)
        } else {
            let code = out.status.code();
            warn!(?code, stderr = %out.stderr.trim_end(), "compose call failed");
            Err(ComposeError::Failed {
                code,
                stderr: out.stderr,
            })
        }
    }
}

/// Configured compose instance.
///
/// Primary options persist across calls. The environment overlay is consumed by
/// the next call and must be set again before the one after. Calls borrow the
/// instance mutably, so two calls can never share one overlay.
#[derive(Debug, Clone, Default)]
pub struct Compose {
    runner: ComposeRunner,
    options: Option<Options>,
    env: Option<EnvOverlay>,
}

impl Compose {
    pub fn new(runner: ComposeRunner) -> Self {
        Self {
            runner,
            options: None,
            env: None,
        }
    }

    /// Use the compose program found on PATH.
    pub fn discover() -> std::io::Result<Self> {
        Ok(Self::new(ComposeRunner::new(ComposeProgram::discover()?)))
    }

    pub fn runner(&self) -> &ComposeRunner {
        &self.runner
    }

    pub fn set_options(&mut self, options: Options) -> &mut Self {
        self.options = Some(options);
        self
    }

    pub fn set_env(&mut self, env: EnvOverlay) -> &mut Self {
        self.env = Some(env);
        self
    }

    pub fn options(&self) -> Option<&Options> {
        self.options.as_ref()
    }

    /// Overlay waiting for the next call, if any.
    pub fn pending_env(&self) -> Option<&EnvOverlay> {
        self.env.as_ref()
    }

    /// Run an invocation against the configured state. Usage errors leave the
    /// state untouched; otherwise the overlay is gone once this returns.
    pub fn execute(&mut self, invocation: Invocation) -> ComposeResult<String> {
        let Some(ref options) = self.options else {
            return Err(ComposeError::Usage("primary options are not set"));
        };
        let Some(env) = self.env.take() else {
            return Err(ComposeError::Usage("environment overlay is not set"));
        };
        self.runner.execute(options, &env, &invocation)
    }
}
