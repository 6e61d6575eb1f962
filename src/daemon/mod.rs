#![allow(clippy::module_name_repetitions)]
//! Docker Engine API facade over `bollard`.
//!
//! Every method is one remote call (lookups may list then filter locally).
//! A 404 from a lookup is reported as `None`/`false`, never as an error.

use std::io;
use std::path::PathBuf;

use bollard::errors::Error as ApiError;
use bollard::{Docker, API_DEFAULT_VERSION};
use thiserror::Error;
use tracing::debug;

pub mod containers;
pub mod images;
pub mod networks;
pub mod volumes;

pub use containers::ExecOutput;

/// Seconds before a socket request is abandoned by the client.
const SOCKET_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("docker api: {0}")]
    Api(#[from] ApiError),

    #[error("failed to unpack archive into {}: {source}", path.display())]
    Extract {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("exec {0} detached; no output to collect")]
    ExecDetached(String),
}

pub type DaemonResult<T> = Result<T, DaemonError>;

/// Handle on one Docker daemon.
#[derive(Debug, Clone)]
pub struct Daemon {
    docker: Docker,
}

impl Daemon {
    /// Connect using `DOCKER_HOST` or the platform's default socket.
    pub fn connect() -> DaemonResult<Self> {
        let docker = Docker::connect_with_local_defaults()?;
        Ok(Self { docker })
    }

    /// Connect to an explicit unix socket path.
    pub fn connect_socket(path: &str) -> DaemonResult<Self> {
        let docker = Docker::connect_with_socket(path, SOCKET_TIMEOUT_SECS, API_DEFAULT_VERSION)?;
        Ok(Self { docker })
    }

    pub fn from_client(docker: Docker) -> Self {
        Self { docker }
    }

    pub fn client(&self) -> &Docker {
        &self.docker
    }

    /// Round-trip to the daemon; `Ok` means it is reachable.
    pub async fn ping(&self) -> DaemonResult<()> {
        let reply = self.docker.ping().await?;
        debug!(%reply, "daemon ping");
        Ok(())
    }
}

pub(crate) fn is_not_found(err: &ApiError) -> bool {
    matches!(
        err,
        ApiError::DockerResponseServerError {
            status_code: 404,
            ..
        }
    )
}

/// Turn a 404 into `None`.
pub(crate) fn found<T>(res: Result<T, ApiError>) -> DaemonResult<Option<T>> {
    match res {
        Ok(v) => Ok(Some(v)),
        Err(e) if is_not_found(&e) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Docker reports container names with a leading `/`; callers usually don't.
pub(crate) fn name_matches(candidate: &str, wanted: &str) -> bool {
    candidate.trim_start_matches('/') == wanted.trim_start_matches('/')
}
