//! Image presence checks, pulls and removal.

use bollard::image::{CreateImageOptions, ListImagesOptions, RemoveImageOptions};
use bollard::models::{ImageInspect, ImageSummary};
use futures::TryStreamExt;
use tracing::debug;

use super::{found, Daemon, DaemonResult};

impl Daemon {
    pub async fn list_images(&self) -> DaemonResult<Vec<ImageSummary>> {
        let opts = ListImagesOptions::<String> {
            all: false,
            ..Default::default()
        };
        Ok(self.docker.list_images(Some(opts)).await?)
    }

    pub async fn inspect_image(&self, reference: &str) -> DaemonResult<Option<ImageInspect>> {
        found(self.docker.inspect_image(reference).await)
    }

    /// True if the image is present locally (never pulls).
    pub async fn image_exists(&self, reference: &str) -> DaemonResult<bool> {
        Ok(self.inspect_image(reference).await?.is_some())
    }

    /// Pull an image, returning once the daemon reports completion.
    pub async fn pull_image(&self, reference: &str) -> DaemonResult<()> {
        let opts = CreateImageOptions {
            from_image: reference.to_string(),
            ..Default::default()
        };
        let progress: Vec<_> = self
            .docker
            .create_image(Some(opts), None, None)
            .try_collect()
            .await?;
        debug!(reference, events = progress.len(), "image pulled");
        Ok(())
    }

    pub async fn remove_image(&self, reference: &str, force: bool) -> DaemonResult<()> {
        debug!(reference, force, "remove image");
        let opts = RemoveImageOptions {
            force,
            ..Default::default()
        };
        self.docker.remove_image(reference, Some(opts), None).await?;
        Ok(())
    }
}
