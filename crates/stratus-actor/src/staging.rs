use stratus_api_models::BuildState;
use stratus_client::Warnings;
use tokio::time::sleep;
use tracing::{debug, info, instrument};

use crate::actor::{Actor, Phase};
use crate::error::{ActorError, ActorResult};

impl Actor {
    /// Stage a package and wait for the resulting droplet.
    ///
    /// Returns the GUID of the staged droplet.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::StagingFailed`] with the server's error text when
    /// the build fails and [`ActorError::Timeout`] once the staging timeout is
    /// used up.
    #[instrument(skip(self, warnings))]
    pub async fn stage_package(
        &self,
        package_guid: &str,
        warnings: &mut Warnings,
    ) -> ActorResult<String> {
        info!(package = %package_guid, phase = ?Phase::Pending, "submitting build");
        let build = self.client.create_build(package_guid, warnings).await?;
        info!(build = %build.guid, phase = ?Phase::Staging, "build created");

        let attempts = self.config.attempts(self.config.staging_timeout);
        for attempt in 1..=attempts {
            let build = self.client.get_build(&build.guid, warnings).await?;
            match build.state {
                BuildState::Staged => {
                    let droplet = build.droplet.ok_or_else(|| ActorError::StagingFailed {
                        reason: "build staged without a droplet".to_string(),
                    })?;
                    info!(droplet = %droplet.guid, phase = ?Phase::Staged, "staging finished");
                    return Ok(droplet.guid);
                }
                BuildState::Failed => {
                    let reason = build.error.unwrap_or_else(|| "staging failed".to_string());
                    info!(build = %build.guid, phase = ?Phase::Failed, %reason, "staging failed");
                    return Err(ActorError::StagingFailed { reason });
                }
                state => debug!(attempt, ?state, "staging in progress"),
            }
            if attempt < attempts {
                sleep(self.config.poll_interval).await;
            }
        }
        Err(ActorError::Timeout {
            operation: "staging",
        })
    }
}
