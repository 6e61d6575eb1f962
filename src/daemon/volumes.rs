//! Volume lookups and idempotent creation.

use bollard::models::Volume;
use bollard::volume::{CreateVolumeOptions, ListVolumesOptions, RemoveVolumeOptions};
use tracing::debug;

use super::{found, Daemon, DaemonResult};

impl Daemon {
    pub async fn list_volumes(&self) -> DaemonResult<Vec<Volume>> {
        let listing = self
            .docker
            .list_volumes(None::<ListVolumesOptions<String>>)
            .await?;
        Ok(listing.volumes.unwrap_or_default())
    }

    pub async fn find_volume(&self, name: &str) -> DaemonResult<Option<Volume>> {
        found(self.docker.inspect_volume(name).await)
    }

    pub async fn volume_exists(&self, name: &str) -> DaemonResult<bool> {
        Ok(self.find_volume(name).await?.is_some())
    }

    /// Return the named volume, creating it with the default driver if missing.
    pub async fn ensure_volume(&self, name: &str) -> DaemonResult<Volume> {
        if let Some(existing) = self.find_volume(name).await? {
            return Ok(existing);
        }
        let opts = CreateVolumeOptions {
            name: name.to_string(),
            ..Default::default()
        };
        let volume = self.docker.create_volume(opts).await?;
        debug!(name, "volume created");
        Ok(volume)
    }

    pub async fn remove_volume(&self, name: &str, force: bool) -> DaemonResult<()> {
        debug!(name, force, "remove volume");
        self.docker
            .remove_volume(name, Some(RemoveVolumeOptions { force }))
            .await?;
        Ok(())
    }
}
