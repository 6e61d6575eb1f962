//! Subcommand surface: fixed parameter shaping per compose subcommand.

use super::options::{Options, Targets};
use super::runner::{Compose, Invocation};
use crate::errors::ComposeResult;

// Subcommands taking options and any number of targets.
macro_rules! targeted {
    ($($(#[$doc:meta])* $name:ident => $literal:literal;)*) => {
        impl Invocation {
            $(
                $(#[$doc])*
                pub fn $name(options: Option<Options>, targets: Option<Targets>) -> Self {
                    Invocation::new($literal).options(options).targets(targets)
                }
            )*
        }

        impl Compose {
            $(
                $(#[$doc])*
                pub fn $name(
                    &mut self,
                    options: Option<Options>,
                    targets: Option<Targets>,
                ) -> ComposeResult<String> {
                    self.execute(Invocation::$name(options, targets))
                }
            )*
        }
    };
}

targeted! {
    /// `up [options] [services]`
    up => "up";
    /// `ps [options] [services]`
    ps => "ps";
    start => "start";
    stop => "stop";
    restart => "restart";
    kill => "kill";
    pull => "pull";
    create => "create";
    pause => "pause";
    unpause => "unpause";
    /// `scale [options] [service=num...]`
    scale => "scale";
    /// `rm [options] [services]`
    rm => "rm";
}

impl Invocation {
    pub fn down(options: Option<Options>) -> Self {
        Invocation::new("down").options(options)
    }

    pub fn version(options: Option<Options>) -> Self {
        Invocation::new("version").options(options)
    }

    /// `port [options] service private_port`
    pub fn port(options: Option<Options>, service: &str, private_port: impl ToString) -> Self {
        Invocation::new("port")
            .options(options)
            .targets(Some(Targets::from(service)))
            .extra(Some(private_port.to_string()))
    }

    /// `run [options] service [command]`. The command is passed as one token.
    pub fn run(options: Option<Options>, service: &str, command: Option<&str>) -> Self {
        Invocation::new("run")
            .options(options)
            .targets(Some(Targets::from(service)))
            .extra(command.map(str::to_string))
    }
}

impl Compose {
    pub fn down(&mut self, options: Option<Options>) -> ComposeResult<String> {
        self.execute(Invocation::down(options))
    }

    pub fn version(&mut self, options: Option<Options>) -> ComposeResult<String> {
        self.execute(Invocation::version(options))
    }

    pub fn port(
        &mut self,
        options: Option<Options>,
        service: &str,
        private_port: impl ToString,
    ) -> ComposeResult<String> {
        self.execute(Invocation::port(options, service, private_port))
    }

    pub fn run(
        &mut self,
        options: Option<Options>,
        service: &str,
        command: Option<&str>,
    ) -> ComposeResult<String> {
        self.execute(Invocation::run(options, service, command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_takes_service_and_private_port() {
        let inv = Invocation::port(Some(Options::new().with("protocol", "udp")), "web", 53);
        assert_eq!(inv.to_args(), vec!["port", "--protocol", "udp", "web", "53"]);
    }

    #[test]
    fn run_without_command() {
        let inv = Invocation::run(Some(Options::new().flag("rm")), "web", None);
        assert_eq!(inv.to_args(), vec!["run", "--rm", "web"]);
    }

    #[test]
    fn down_and_version_take_no_targets() {
        assert_eq!(
            Invocation::down(Some(Options::new().flag("v"))).to_args(),
            vec!["down", "-v"]
        );
        assert_eq!(Invocation::version(None).to_args(), vec!["version"]);
    }

    #[test]
    fn scale_passes_pairs_as_targets() {
        let inv = Invocation::scale(None, Some(Targets::from(["web=3", "worker=2"])));
        assert_eq!(inv.to_args(), vec!["scale", "web=3", "worker=2"]);
    }
}
