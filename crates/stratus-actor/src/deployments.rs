use stratus_api_models::{
    DEPLOYMENT_REASON_DEPLOYED, DeploymentStatusValue, DeploymentStrategy, ProcessInstanceState,
};
use stratus_client::{DeploymentSource, Warnings};
use tokio::time::sleep;
use tracing::{debug, info, instrument};

use crate::actor::{Actor, Phase};
use crate::error::{ActorError, ActorResult};

/// Outcome of one status check.
enum Check {
    Pending,
    Done,
}

impl Actor {
    /// Submit a deployment of `source` for the application and return its GUID.
    ///
    /// # Errors
    ///
    /// Returns request failures.
    #[instrument(skip(self, warnings))]
    pub async fn create_deployment(
        &self,
        app_guid: &str,
        source: &DeploymentSource,
        strategy: Option<DeploymentStrategy>,
        warnings: &mut Warnings,
    ) -> ActorResult<String> {
        let guid = self
            .client
            .create_application_deployment(app_guid, source, strategy, warnings)
            .await?;
        info!(deployment = %guid, phase = ?Phase::Deploying, "deployment submitted");
        Ok(guid)
    }

    /// Poll a deployment until it is finalized.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::DeploymentFailed`] with the server reason when
    /// the deployment is finalized without being deployed, and
    /// [`ActorError::Timeout`] once the startup timeout is used up.
    #[instrument(skip(self, warnings))]
    pub async fn poll_deployment(
        &self,
        deployment_guid: &str,
        warnings: &mut Warnings,
    ) -> ActorResult<()> {
        let attempts = self.config.attempts(self.config.startup_timeout);
        for attempt in 1..=attempts {
            let deployment = self.client.get_deployment(deployment_guid, warnings).await?;
            let reason = deployment.status.reason.unwrap_or_default();
            match deployment.status.value {
                DeploymentStatusValue::Finalized if reason == DEPLOYMENT_REASON_DEPLOYED => {
                    info!(deployment = %deployment_guid, phase = ?Phase::Running, "deployment finished");
                    return Ok(());
                }
                DeploymentStatusValue::Finalized => {
                    info!(deployment = %deployment_guid, phase = ?Phase::Failed, %reason, "deployment finalized");
                    return Err(ActorError::DeploymentFailed { reason });
                }
                value => debug!(attempt, ?value, %reason, "deployment in progress"),
            }
            if attempt < attempts {
                sleep(self.config.poll_interval).await;
            }
        }
        Err(ActorError::Timeout {
            operation: "deployment",
        })
    }

    /// Poll the application's processes until each scaled process has a
    /// running instance.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::StartFailed`] when every instance of a process
    /// crashed and [`ActorError::Timeout`] once the startup timeout is used up.
    #[instrument(skip(self, warnings))]
    pub async fn poll_start(&self, app_guid: &str, warnings: &mut Warnings) -> ActorResult<()> {
        let processes = self
            .client
            .get_application_processes(app_guid, warnings)
            .await?;
        let attempts = self.config.attempts(self.config.startup_timeout);
        for attempt in 1..=attempts {
            let mut check = Check::Done;
            for process in processes.iter().filter(|process| process.instances > 0) {
                let instances = self
                    .client
                    .get_process_instances(&process.guid, warnings)
                    .await?;
                if instances
                    .iter()
                    .any(|instance| instance.state == ProcessInstanceState::Running)
                {
                    continue;
                }
                if !instances.is_empty()
                    && instances
                        .iter()
                        .all(|instance| instance.state == ProcessInstanceState::Crashed)
                {
                    info!(process = %process.kind, phase = ?Phase::Failed, "all instances crashed");
                    return Err(ActorError::StartFailed {
                        reason: "CRASHED".to_string(),
                    });
                }
                check = Check::Pending;
            }
            if matches!(check, Check::Done) {
                info!(app = %app_guid, phase = ?Phase::Running, "instances running");
                return Ok(());
            }
            debug!(attempt, "waiting for instances");
            if attempt < attempts {
                sleep(self.config.poll_interval).await;
            }
        }
        Err(ActorError::Timeout {
            operation: "app start",
        })
    }
}
