//! Child process execution with buffered output and an environment overlay.

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use tracing::debug;

/// One child process invocation.
#[derive(Debug, Default, Clone)]
pub struct ExecRequest {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    env: Vec<(OsString, OsString)>,
    inherit_env: bool,
}

impl ExecRequest {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            inherit_env: true,
            ..Self::default()
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn inherit_env(mut self, inherit: bool) -> Self {
        self.inherit_env = inherit;
        self
    }

    pub fn program(&self) -> &OsString {
        &self.program
    }

    pub fn arg_list(&self) -> &[OsString] {
        &self.args
    }

    /// Spawn the child, wait for it to exit and collect stdout/stderr into
    /// separate buffers. Spawn and pipe errors are returned unchanged.
    pub fn run(&self) -> io::Result<ExecOutput> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }
        if !self.inherit_env {
            cmd.env_clear();
        }
        // Overlay last so it wins over inherited values.
        for (key, value) in &self.env {
            cmd.env(key, value);
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!(program = ?self.program, args = ?self.args, "spawning");
        let started = Instant::now();
        let child = cmd.spawn()?;
        let output = child.wait_with_output()?;
        let duration = started.elapsed();
        debug!(status = %output.status, ?duration, "child exited");

        Ok(ExecOutput {
            status: output.status,
            duration,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[derive(Debug)]
pub struct ExecOutput {
    pub status: ExitStatus,
    pub duration: Duration,
    pub stdout: String,
    pub stderr: String,
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn captures_streams_separately() {
        let out = ExecRequest::new("/bin/sh")
            .args(["-c", "echo out; echo err >&2; exit 3"])
            .run()
            .unwrap();
        assert_eq!(out.status.code(), Some(3));
        assert_eq!(out.stdout, "out\n");
        assert_eq!(out.stderr, "err\n");
    }

    #[test]
    fn overlay_wins_over_inherited_env() {
        let out = ExecRequest::new("/bin/sh")
            .args(["-c", "printf %s \"$PATH|$DOCKWRAP_EXEC_PROBE\""])
            .env("DOCKWRAP_EXEC_PROBE", "overlay")
            .env("PATH", "/overlay/bin:/bin:/usr/bin")
            .run()
            .unwrap();
        assert_eq!(out.stdout, "/overlay/bin:/bin:/usr/bin|overlay");
    }

    #[test]
    fn missing_program_is_not_found() {
        let err = ExecRequest::new("/nonexistent/dockwrap-missing")
            .run()
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
