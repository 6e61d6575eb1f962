use std::env;
use std::fmt::Write as _;
use std::io::{self, Write};

use anyhow::{Context, Result};
use dockwrap::{ComposeConfig, Daemon, Invocation, OptionValue, Targets};

use crate::cli::{options_from_pairs, Cli, Command, DaemonCmd};

fn targets(list: &[String]) -> Option<Targets> {
    if list.is_empty() {
        None
    } else {
        Some(Targets::from(list.to_vec()))
    }
}

/// Map a compose subcommand from the command line onto an invocation.
pub(crate) fn invocation_for(cmd: &Command) -> Option<Invocation> {
    let inv = match cmd {
        Command::Up(t) => Invocation::up(t.opts.to_options(), targets(&t.targets)),
        Command::Ps(t) => Invocation::ps(t.opts.to_options(), targets(&t.targets)),
        Command::Start(t) => Invocation::start(t.opts.to_options(), targets(&t.targets)),
        Command::Stop(t) => Invocation::stop(t.opts.to_options(), targets(&t.targets)),
        Command::Restart(t) => Invocation::restart(t.opts.to_options(), targets(&t.targets)),
        Command::Kill(t) => Invocation::kill(t.opts.to_options(), targets(&t.targets)),
        Command::Pull(t) => Invocation::pull(t.opts.to_options(), targets(&t.targets)),
        Command::Create(t) => Invocation::create(t.opts.to_options(), targets(&t.targets)),
        Command::Pause(t) => Invocation::pause(t.opts.to_options(), targets(&t.targets)),
        Command::Unpause(t) => Invocation::unpause(t.opts.to_options(), targets(&t.targets)),
        Command::Scale(t) => Invocation::scale(t.opts.to_options(), targets(&t.targets)),
        Command::Rm(t) => Invocation::rm(t.opts.to_options(), targets(&t.targets)),
        Command::Down(u) => Invocation::down(u.opts.to_options()),
        Command::Version(u) => Invocation::version(u.opts.to_options()),
        Command::Port {
            opts,
            service,
            private_port,
        } => Invocation::port(opts.to_options(), service, private_port),
        Command::Run {
            opts,
            service,
            command,
        } => Invocation::run(opts.to_options(), service, command.as_deref()),
        Command::Daemon { .. } => return None,
    };
    Some(inv)
}

/// Config file, environment overrides, then command-line flags.
pub(crate) fn resolve_config(cli: &Cli) -> Result<ComposeConfig> {
    let cwd = env::current_dir().context("failed to determine current directory")?;
    let mut cfg = ComposeConfig::discover(cli.config.as_deref(), &cwd)?;

    if !cli.files.is_empty() {
        cfg.options
            .insert("f", OptionValue::List(cli.files.clone()));
    }
    if let Some(ref project) = cli.project {
        cfg.options.insert("p", project.as_str());
    }
    if let Some(extra) = options_from_pairs(&cli.global_opts) {
        for (k, v) in extra.iter() {
            cfg.options.insert(k, v.clone());
        }
    }
    if let Some(ref path) = cli.env_file {
        cfg.env_file = Some(path.clone());
    }
    for (k, v) in &cli.env {
        cfg.set_env_var(k.clone(), v.clone());
    }
    Ok(cfg)
}

pub(crate) fn run_compose(cli: &Cli, invocation: Invocation) -> Result<()> {
    let cfg = resolve_config(cli)?;
    if cfg.options.is_empty() {
        dockwrap::log_warn_stderr(
            dockwrap::color_enabled_stderr(),
            "dockwrap: no primary options configured; compose will use its own defaults",
        );
    }

    if cli.dry_run {
        let runner = cfg.runner()?;
        let mut argv = vec![runner.program().program.display().to_string()];
        argv.extend(runner.command_args(&cfg.options, &invocation));
        let overlay = cfg.env_overlay()?;
        for (k, v) in overlay.iter() {
            eprintln!("env {k}={v}");
        }
        return emit(&format!("{}\n", dockwrap::shell_join(&argv)));
    }

    let subcommand = invocation.subcommand().to_string();
    let mut compose = cfg.into_compose()?;
    let stdout = compose
        .execute(invocation)
        .with_context(|| format!("compose {subcommand} failed"))?;
    emit(&stdout)
}

pub(crate) fn run_daemon(what: &DaemonCmd, json: bool) -> Result<()> {
    let rt = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let text = rt.block_on(async {
        let daemon = Daemon::connect().context("failed to connect to the Docker daemon")?;
        let mut out = String::new();
        match what {
            DaemonCmd::Containers { all } => {
                let list = daemon.list_containers(*all).await?;
                if json {
                    writeln!(out, "{}", serde_json::to_string_pretty(&list)?)?;
                } else {
                    for c in &list {
                        let names = c.names.as_deref().unwrap_or_default();
                        let name = names.first().map(|n| n.trim_start_matches('/'));
                        writeln!(
                            out,
                            "{}\t{}",
                            name.unwrap_or("-"),
                            c.state.as_deref().unwrap_or("-")
                        )?;
                    }
                }
            }
            DaemonCmd::Networks => {
                let list = daemon.list_networks().await?;
                if json {
                    writeln!(out, "{}", serde_json::to_string_pretty(&list)?)?;
                } else {
                    for n in &list {
                        writeln!(
                            out,
                            "{}\t{}",
                            n.name.as_deref().unwrap_or("-"),
                            n.driver.as_deref().unwrap_or("-")
                        )?;
                    }
                }
            }
            DaemonCmd::Images => {
                let list = daemon.list_images().await?;
                if json {
                    writeln!(out, "{}", serde_json::to_string_pretty(&list)?)?;
                } else {
                    for i in &list {
                        if i.repo_tags.is_empty() {
                            writeln!(out, "{}", i.id)?;
                        }
                        for tag in &i.repo_tags {
                            writeln!(out, "{tag}")?;
                        }
                    }
                }
            }
            DaemonCmd::Volumes => {
                let list = daemon.list_volumes().await?;
                if json {
                    writeln!(out, "{}", serde_json::to_string_pretty(&list)?)?;
                } else {
                    for v in &list {
                        writeln!(out, "{}\t{}", v.name, v.driver)?;
                    }
                }
            }
        }
        Ok::<String, anyhow::Error>(out)
    })?;
    emit(&text)
}

/// Write to stdout. A reader that went away (`dockwrap ps | head`) is not an
/// error.
fn emit(text: &str) -> Result<()> {
    write_quietly(&mut io::stdout().lock(), text.as_bytes()).context("failed to write to stdout")
}

fn write_quietly<W: Write>(out: &mut W, bytes: &[u8]) -> io::Result<()> {
    match out.write_all(bytes).and_then(|()| out.flush()) {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}
