//! Container lookups, lifecycle, exec and archive extraction.

use std::collections::HashMap;
use std::io::{self, Cursor};
use std::path::Path;

use bollard::container::{
    DownloadFromContainerOptions, InspectContainerOptions, ListContainersOptions, LogOutput,
    RemoveContainerOptions, RestartContainerOptions, StartContainerOptions, StopContainerOptions,
};
use bollard::exec::{CreateExecOptions, StartExecResults};
use bollard::models::{ContainerInspectResponse, ContainerSummary};
use futures::{StreamExt, TryStreamExt};
use tracing::debug;

use super::{found, name_matches, Daemon, DaemonError, DaemonResult};

/// Result of a command run inside a container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i64>,
}

impl ExecOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

impl Daemon {
    pub async fn list_containers(&self, all: bool) -> DaemonResult<Vec<ContainerSummary>> {
        let opts = ListContainersOptions::<String> {
            all,
            ..Default::default()
        };
        Ok(self.docker.list_containers(Some(opts)).await?)
    }

    /// Find a container (running or not) by exact name.
    pub async fn find_container(&self, name: &str) -> DaemonResult<Option<ContainerSummary>> {
        let mut filters = HashMap::new();
        filters.insert(
            "name".to_string(),
            vec![name.trim_start_matches('/').to_string()],
        );
        let opts = ListContainersOptions {
            all: true,
            filters,
            ..Default::default()
        };
        // The daemon's name filter is a substring match.
        let found = self
            .docker
            .list_containers(Some(opts))
            .await?
            .into_iter()
            .find(|c| {
                c.names
                    .as_deref()
                    .unwrap_or_default()
                    .iter()
                    .any(|n| name_matches(n, name))
            });
        debug!(name, found = found.is_some(), "find container");
        Ok(found)
    }

    pub async fn container_exists(&self, name: &str) -> DaemonResult<bool> {
        Ok(self.find_container(name).await?.is_some())
    }

    pub async fn inspect_container(
        &self,
        name: &str,
    ) -> DaemonResult<Option<ContainerInspectResponse>> {
        found(
            self.docker
                .inspect_container(name, None::<InspectContainerOptions>)
                .await,
        )
    }

    pub async fn start_container(&self, name: &str) -> DaemonResult<()> {
        debug!(name, "start container");
        self.docker
            .start_container(name, None::<StartContainerOptions<String>>)
            .await?;
        Ok(())
    }

    /// Stop, waiting `timeout_secs` before the daemon kills the container.
    pub async fn stop_container(&self, name: &str, timeout_secs: i64) -> DaemonResult<()> {
        debug!(name, timeout_secs, "stop container");
        self.docker
            .stop_container(name, Some(StopContainerOptions { t: timeout_secs }))
            .await?;
        Ok(())
    }

    pub async fn restart_container(&self, name: &str, timeout_secs: isize) -> DaemonResult<()> {
        debug!(name, timeout_secs, "restart container");
        self.docker
            .restart_container(name, Some(RestartContainerOptions { t: timeout_secs }))
            .await?;
        Ok(())
    }

    /// Remove a container together with its anonymous volumes.
    pub async fn remove_container(&self, name: &str, force: bool) -> DaemonResult<()> {
        debug!(name, force, "remove container");
        let opts = RemoveContainerOptions {
            force,
            v: true,
            ..Default::default()
        };
        self.docker.remove_container(name, Some(opts)).await?;
        Ok(())
    }

    /// Run `cmd` inside a running container and collect its output.
    pub async fn exec(&self, container: &str, cmd: &[&str]) -> DaemonResult<ExecOutput> {
        let opts = CreateExecOptions::<String> {
            cmd: Some(cmd.iter().map(|s| s.to_string()).collect()),
            attach_stdout: Some(true),
            attach_stderr: Some(true),
            ..Default::default()
        };
        let exec = self.docker.create_exec(container, opts).await?;
        debug!(container, exec = %exec.id, ?cmd, "exec");

        let mut out = ExecOutput::default();
        match self.docker.start_exec(&exec.id, None).await? {
            StartExecResults::Attached { mut output, .. } => {
                while let Some(chunk) = output.next().await {
                    match chunk? {
                        LogOutput::StdErr { message } => {
                            out.stderr.push_str(&String::from_utf8_lossy(&message))
                        }
                        LogOutput::StdOut { message } | LogOutput::Console { message } => {
                            out.stdout.push_str(&String::from_utf8_lossy(&message))
                        }
                        LogOutput::StdIn { .. } => {}
                    }
                }
            }
            StartExecResults::Detached => return Err(DaemonError::ExecDetached(exec.id)),
        }

        out.exit_code = self.docker.inspect_exec(&exec.id).await?.exit_code;
        Ok(out)
    }

    /// Copy `path` out of a container and unpack it under `dest`.
    pub async fn extract_archive(
        &self,
        container: &str,
        path: &str,
        dest: &Path,
    ) -> DaemonResult<()> {
        let opts = DownloadFromContainerOptions {
            path: path.to_string(),
        };
        let tarball: Vec<u8> = self
            .docker
            .download_from_container(container, Some(opts))
            .map_ok(|chunk| chunk.to_vec())
            .try_concat()
            .await?;
        debug!(container, path, bytes = tarball.len(), dest = %dest.display(), "extract archive");

        let target = dest.to_path_buf();
        let unpacked = tokio::task::spawn_blocking(move || unpack_into(tarball, &target))
            .await
            .map_err(io::Error::other)
            .and_then(|r| r);
        unpacked.map_err(|source| DaemonError::Extract {
            path: dest.to_path_buf(),
            source,
        })
    }
}

/// Unpack an in-memory tar archive under `dest`, creating `dest` first.
pub(crate) fn unpack_into(tarball: Vec<u8>, dest: &Path) -> io::Result<()> {
    std::fs::create_dir_all(dest)?;
    tar::Archive::new(Cursor::new(tarball)).unpack(dest)
}
