use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use dockwrap::{ColorMode, EnvOverlay, OptionValue, Options};

#[derive(Parser, Debug)]
#[command(
    name = "dockwrap",
    version,
    about = "Run docker-compose with per-call environment overlays, and query the Docker daemon."
)]
pub(crate) struct Cli {
    /// Config file (default: ./dockwrap.yml when present)
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,

    /// Compose file; repeat for several. Replaces `options.f` from the config
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    pub(crate) files: Vec<String>,

    /// Project name
    #[arg(short = 'p', long = "project-name", value_name = "NAME")]
    pub(crate) project: Option<String>,

    /// Extra primary option, rendered before the subcommand
    #[arg(long = "global-opt", value_name = "KEY[=VALUE]")]
    pub(crate) global_opts: Vec<String>,

    /// Environment variable for the compose process; repeatable
    #[arg(short = 'e', long = "env", value_name = "KEY=VALUE", value_parser = EnvOverlay::parse_pair)]
    pub(crate) env: Vec<(String, String)>,

    /// Dotenv file merged into the compose process environment
    #[arg(long = "env-file", value_name = "PATH")]
    pub(crate) env_file: Option<PathBuf>,

    /// Colorize messages: auto|always|never
    #[arg(long, value_enum)]
    pub(crate) color: Option<ColorMode>,

    /// Log each compose invocation and daemon call to stderr
    #[arg(long)]
    pub(crate) verbose: bool,

    /// Print the compose command line instead of running it
    #[arg(long)]
    pub(crate) dry_run: bool,

    #[command(subcommand)]
    pub(crate) command: Command,
}

/// Flags for the subcommand itself.
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct SubOpts {
    /// Subcommand option; repeat a key to pass it several times
    #[arg(long = "opt", short = 'o', value_name = "KEY[=VALUE]")]
    pub(crate) opt: Vec<String>,
}

impl SubOpts {
    pub(crate) fn to_options(&self) -> Option<Options> {
        options_from_pairs(&self.opt)
    }
}

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum Command {
    /// Create and start services
    Up(Targeted),
    /// Stop and remove services, networks
    Down(Untargeted),
    /// List services
    Ps(Targeted),
    Start(Targeted),
    Stop(Targeted),
    Restart(Targeted),
    Kill(Targeted),
    Pull(Targeted),
    Create(Targeted),
    /// Show the compose tool's version
    Version(Untargeted),
    Pause(Targeted),
    Unpause(Targeted),
    /// Set service counts (SERVICE=NUM ...)
    Scale(Targeted),
    /// Remove stopped service containers
    Rm(Targeted),
    /// Print the public port for a port binding
    Port {
        #[command(flatten)]
        opts: SubOpts,
        service: String,
        private_port: String,
    },
    /// Run a one-off command on a service
    Run {
        #[command(flatten)]
        opts: SubOpts,
        service: String,
        /// Passed to compose as a single argument
        command: Option<String>,
    },
    /// Query the Docker daemon directly
    Daemon {
        /// Emit machine-readable JSON
        #[arg(long)]
        json: bool,
        #[command(subcommand)]
        what: DaemonCmd,
    },
}

#[derive(Args, Debug, Clone)]
pub(crate) struct Targeted {
    #[command(flatten)]
    pub(crate) opts: SubOpts,
    /// Services the operation applies to
    pub(crate) targets: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct Untargeted {
    #[command(flatten)]
    pub(crate) opts: SubOpts,
}

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum DaemonCmd {
    Containers {
        /// Include stopped containers
        #[arg(long)]
        all: bool,
    },
    Networks,
    Images,
    Volumes,
}

/// `KEY=VALUE` → flag with value, bare `KEY` → flag alone. A key given more than
/// once becomes a repeated flag.
pub(crate) fn options_from_pairs(pairs: &[String]) -> Option<Options> {
    if pairs.is_empty() {
        return None;
    }
    let mut opts = Options::new();
    for pair in pairs {
        let (key, value) = match pair.split_once('=') {
            Some((k, v)) => (k, v.to_string()),
            None => (pair.as_str(), String::new()),
        };
        let merged = match opts.get(key) {
            None => OptionValue::from(value),
            Some(OptionValue::Flag) => OptionValue::List(vec![String::new(), value]),
            Some(OptionValue::Value(prev)) => OptionValue::List(vec![prev.clone(), value]),
            Some(OptionValue::List(prev)) => {
                let mut items = prev.clone();
                items.push(value);
                OptionValue::List(items)
            }
        };
        opts.insert(key, merged);
    }
    Some(opts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_build_flags_and_lists() {
        let pairs: Vec<String> = ["d", "scale=web=2", "e=A=1", "e=B=2"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let opts = options_from_pairs(&pairs).unwrap();
        assert_eq!(
            opts.to_args(),
            vec!["-d", "--scale", "web=2", "-e", "A=1", "-e", "B=2"]
        );
    }

    #[test]
    fn no_pairs_is_none() {
        assert!(options_from_pairs(&[]).is_none());
    }

    #[test]
    fn parses_primary_flags_before_subcommand() {
        let cli = Cli::try_parse_from([
            "dockwrap", "-f", "a.yml", "-f", "b.yml", "-p", "proj", "-e", "TAG=1", "start",
            "web",
        ])
        .unwrap();
        assert_eq!(cli.files, vec!["a.yml", "b.yml"]);
        assert_eq!(cli.env, vec![("TAG".to_string(), "1".to_string())]);
        match cli.command {
            Command::Start(t) => assert_eq!(t.targets, vec!["web"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
