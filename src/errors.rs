//! Error types and exit code mapping.
//!
//! - Map io::ErrorKind::NotFound to exit code 127; other io errors to 1.
//! - A failed compose call exits with the child's own status when it has one.
//! - Usage errors exit with 2.
use std::io;

use thiserror::Error;

/// Errors from a compose invocation.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// The instance was not configured before the call; nothing was spawned.
    #[error("usage error: {0}")]
    Usage(&'static str),

    /// The compose process exited unsuccessfully.
    #[error("{}", display_failure(.code, .stderr))]
    Failed { code: Option<i32>, stderr: String },

    /// Spawn or pipe failure, as reported by the OS.
    #[error(transparent)]
    Io(#[from] io::Error),
}

fn display_failure(code: &Option<i32>, stderr: &str) -> String {
    let stderr = stderr.trim_end();
    let status = match code {
        Some(c) => format!("exited with code {c}"),
        None => "was terminated by a signal".to_string(),
    };
    if stderr.is_empty() {
        format!("compose {status}")
    } else {
        format!("compose {status}: {stderr}")
    }
}

impl ComposeError {
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ComposeError::Failed { code, .. } => *code,
            _ => None,
        }
    }

    pub fn stderr(&self) -> Option<&str> {
        match self {
            ComposeError::Failed { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}

pub type ComposeResult<T> = Result<T, ComposeError>;

/// Map an io::Error to a process exit code:
/// - 127 for NotFound (command not found)
/// - 1 for all other errors
pub fn exit_code_for_io_error(e: &io::Error) -> u8 {
    if e.kind() == io::ErrorKind::NotFound {
        127
    } else {
        1
    }
}

/// Exit code for the `dockwrap` binary given the error that ended the run.
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(ce) = cause.downcast_ref::<ComposeError>() {
            return match ce {
                ComposeError::Usage(_) => 2,
                ComposeError::Failed { code, .. } => code
                    .and_then(|c| u8::try_from(c).ok())
                    .filter(|c| *c != 0)
                    .unwrap_or(1),
                ComposeError::Io(ioe) => exit_code_for_io_error(ioe),
            };
        }
        if let Some(crate::config::ConfigError::Program(ioe)) =
            cause.downcast_ref::<crate::config::ConfigError>()
        {
            return exit_code_for_io_error(ioe);
        }
        if let Some(ioe) = cause.downcast_ref::<io::Error>() {
            return exit_code_for_io_error(ioe);
        }
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_message_carries_code_and_stderr() {
        let e = ComposeError::Failed {
            code: Some(1),
            stderr: "service not found\n".into(),
        };
        assert_eq!(e.to_string(), "compose exited with code 1: service not found");
    }

    #[test]
    fn signal_termination_has_no_code() {
        let e = ComposeError::Failed {
            code: None,
            stderr: String::new(),
        };
        assert_eq!(e.to_string(), "compose was terminated by a signal");
        assert_eq!(e.exit_code(), None);
    }

    #[test]
    fn exit_codes() {
        let failed = anyhow::Error::new(ComposeError::Failed {
            code: Some(17),
            stderr: String::new(),
        });
        assert_eq!(exit_code_for(&failed), 17);

        let usage = anyhow::Error::new(ComposeError::Usage("x")).context("running up");
        assert_eq!(exit_code_for(&usage), 2);

        let missing = anyhow::Error::new(ComposeError::Io(io::Error::from(
            io::ErrorKind::NotFound,
        )));
        assert_eq!(exit_code_for(&missing), 127);

        let other = anyhow::anyhow!("boom");
        assert_eq!(exit_code_for(&other), 1);
    }
}
