use std::time::Duration;

use stratus_client::CloudControllerClient;

/// How a revision is located by version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RevisionLookup {
    /// Ask the server to filter with `versions=N`.
    #[default]
    ServerFilter,
    /// Fetch every revision and scan for the version locally.
    ClientScan,
}

/// Phases an application moves through while being staged and started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing submitted yet.
    Pending,
    /// A build is running.
    Staging,
    /// A droplet is available.
    Staged,
    /// Instances are being replaced or started.
    Deploying,
    /// The application is serving.
    Running,
    /// A terminal failure was observed.
    Failed,
}

/// Polling and lookup settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorConfig {
    /// Delay between status checks.
    pub poll_interval: Duration,
    /// Delay between log cache reads.
    pub log_poll_interval: Duration,
    /// Upper bound on waiting for a build.
    pub staging_timeout: Duration,
    /// Upper bound on waiting for instances or a deployment.
    pub startup_timeout: Duration,
    /// Revision lookup strategy.
    pub revision_lookup: RevisionLookup,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            log_poll_interval: Duration::from_secs(1),
            staging_timeout: Duration::from_secs(15 * 60),
            startup_timeout: Duration::from_secs(5 * 60),
            revision_lookup: RevisionLookup::ServerFilter,
        }
    }
}

impl ActorConfig {
    /// Number of checks that fit in `timeout`; never less than one.
    #[must_use]
    pub fn attempts(&self, timeout: Duration) -> u32 {
        let interval = self.poll_interval.as_nanos();
        if interval == 0 {
            return 1;
        }
        let attempts = timeout.as_nanos() / interval;
        u32::try_from(attempts).unwrap_or(u32::MAX).max(1)
    }
}

/// Entry point for multi-request actions against the control plane.
#[derive(Debug, Clone)]
pub struct Actor {
    pub(crate) client: CloudControllerClient,
    pub(crate) config: ActorConfig,
}

impl Actor {
    /// Actor issuing requests through `client`.
    #[must_use]
    pub const fn new(client: CloudControllerClient, config: ActorConfig) -> Self {
        Self { client, config }
    }

    /// Underlying API client.
    #[must_use]
    pub const fn client(&self) -> &CloudControllerClient {
        &self.client
    }

    /// Active settings.
    #[must_use]
    pub const fn config(&self) -> &ActorConfig {
        &self.config
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::time::Duration;

    use httpmock::MockServer;
    use reqwest::Client;
    use stratus_client::CloudControllerClient;
    use url::Url;

    use super::{Actor, ActorConfig, RevisionLookup};

    pub(crate) fn fast_config() -> ActorConfig {
        ActorConfig {
            poll_interval: Duration::from_millis(5),
            log_poll_interval: Duration::from_millis(5),
            staging_timeout: Duration::from_millis(50),
            startup_timeout: Duration::from_millis(50),
            revision_lookup: RevisionLookup::ServerFilter,
        }
    }

    pub(crate) fn actor_for(server: &MockServer, config: ActorConfig) -> Actor {
        let client = CloudControllerClient::from_parts(
            Client::new(),
            Url::parse(&server.base_url()).expect("mock URL should parse"),
        );
        Actor::new(client, config)
    }
}
