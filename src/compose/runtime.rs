#![allow(clippy::module_name_repetitions)]
//! Compose program discovery.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use which::which;

/// The executable invoked for every compose call, plus any arguments that must
/// precede the primary options (`docker compose ...`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeProgram {
    pub program: PathBuf,
    pub leading_args: Vec<String>,
}

impl ComposeProgram {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
        }
    }

    pub fn with_leading_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// The `docker compose` plugin form.
    pub fn docker_plugin(docker: impl Into<PathBuf>) -> Self {
        Self::new(docker).with_leading_args(["compose"])
    }

    /// Locate a compose program on PATH:
    /// - `DOCKWRAP_COMPOSE_BIN` if set and non-empty
    /// - else `docker-compose`
    /// - else `docker` with the `compose` plugin
    pub fn discover() -> io::Result<Self> {
        if let Ok(bin) = env::var("DOCKWRAP_COMPOSE_BIN") {
            let bin = bin.trim();
            if !bin.is_empty() {
                return Self::resolve(Path::new(bin));
            }
        }
        if let Ok(p) = which("docker-compose") {
            return Ok(Self::new(p));
        }
        if let Ok(p) = which("docker") {
            return Ok(Self::docker_plugin(p));
        }
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            "neither docker-compose nor docker was found in PATH.",
        ))
    }

    /// Resolve an explicitly configured program. A bare `docker` means the
    /// plugin form.
    pub fn resolve(program: &Path) -> io::Result<Self> {
        let path = if program.components().count() > 1 {
            program.to_path_buf()
        } else {
            which(program).map_err(|_| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("{} was not found in PATH.", program.display()),
                )
            })?
        };
        if program.file_name().and_then(|n| n.to_str()) == Some("docker") {
            Ok(Self::docker_plugin(path))
        } else {
            Ok(Self::new(path))
        }
    }
}

impl Default for ComposeProgram {
    fn default() -> Self {
        Self::new("docker-compose")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn docker_means_plugin_form() {
        let p = ComposeProgram::resolve(Path::new("/usr/bin/docker")).unwrap();
        assert_eq!(p.program, PathBuf::from("/usr/bin/docker"));
        assert_eq!(p.leading_args, vec!["compose"]);
    }

    #[test]
    fn explicit_path_is_kept_verbatim() {
        let p = ComposeProgram::resolve(Path::new("/opt/bin/docker-compose")).unwrap();
        assert_eq!(p.program, PathBuf::from("/opt/bin/docker-compose"));
        assert!(p.leading_args.is_empty());
    }

    #[test]
    fn unknown_bare_name_is_not_found() {
        let err = ComposeProgram::resolve(Path::new("dockwrap-no-such-compose")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
