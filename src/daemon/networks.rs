//! Network lookups and idempotent creation.

use std::collections::HashMap;

use bollard::models::{EndpointSettings, Network};
use bollard::network::{
    ConnectNetworkOptions, CreateNetworkOptions, InspectNetworkOptions, ListNetworksOptions,
};
use tracing::debug;

use super::{found, Daemon, DaemonResult};

impl Daemon {
    pub async fn list_networks(&self) -> DaemonResult<Vec<Network>> {
        Ok(self
            .docker
            .list_networks(None::<ListNetworksOptions<String>>)
            .await?)
    }

    /// Find a network by exact name.
    pub async fn find_network(&self, name: &str) -> DaemonResult<Option<Network>> {
        let mut filters = HashMap::new();
        filters.insert("name".to_string(), vec![name.to_string()]);
        let found = self
            .docker
            .list_networks(Some(ListNetworksOptions { filters }))
            .await?
            .into_iter()
            .find(|n| n.name.as_deref() == Some(name));
        Ok(found)
    }

    pub async fn network_exists(&self, name: &str) -> DaemonResult<bool> {
        Ok(self.find_network(name).await?.is_some())
    }

    pub async fn inspect_network(&self, name: &str) -> DaemonResult<Option<Network>> {
        found(
            self.docker
                .inspect_network(name, None::<InspectNetworkOptions<String>>)
                .await,
        )
    }

    /// Return the named network, creating it with `driver` first if missing.
    pub async fn ensure_network(&self, name: &str, driver: &str) -> DaemonResult<Network> {
        if let Some(existing) = self.find_network(name).await? {
            debug!(name, "network already present");
            return Ok(existing);
        }
        let opts = CreateNetworkOptions {
            name: name.to_string(),
            driver: driver.to_string(),
            ..Default::default()
        };
        self.docker.create_network(opts).await?;
        debug!(name, driver, "network created");
        Ok(self
            .docker
            .inspect_network(name, None::<InspectNetworkOptions<String>>)
            .await?)
    }

    pub async fn remove_network(&self, name: &str) -> DaemonResult<()> {
        debug!(name, "remove network");
        self.docker.remove_network(name).await?;
        Ok(())
    }

    /// Attach a container to a network with default endpoint settings.
    pub async fn connect_container(&self, network: &str, container: &str) -> DaemonResult<()> {
        debug!(network, container, "connect container");
        let opts = ConnectNetworkOptions {
            container: container.to_string(),
            endpoint_config: EndpointSettings::default(),
        };
        self.docker.connect_network(network, opts).await?;
        Ok(())
    }
}
