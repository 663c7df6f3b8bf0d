use stratus_api_models::{
    CreateDeploymentRequest, Deployment, DeploymentRelationships, DeploymentStrategy, GuidRef,
    ToOneRelationship,
};

use crate::client::CloudControllerClient;
use crate::error::ClientResult;
use crate::request::{RequestName, RequestParams};
use crate::warnings::Warnings;

/// What a deployment rolls out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeploymentSource {
    /// A staged droplet, by GUID.
    Droplet(String),
    /// A past revision, by GUID.
    Revision(String),
}

impl DeploymentSource {
    /// GUID of the droplet or revision.
    #[must_use]
    pub fn guid(&self) -> &str {
        match self {
            Self::Droplet(guid) | Self::Revision(guid) => guid,
        }
    }
}

impl CloudControllerClient {
    /// Create a deployment for `app_guid` and return its GUID.
    ///
    /// # Errors
    ///
    /// Returns transport, API, or decoding failures.
    pub async fn create_application_deployment(
        &self,
        app_guid: &str,
        source: &DeploymentSource,
        strategy: Option<DeploymentStrategy>,
        warnings: &mut Warnings,
    ) -> ClientResult<String> {
        let (droplet, revision) = match source {
            DeploymentSource::Droplet(guid) => (Some(GuidRef::new(guid.as_str())), None),
            DeploymentSource::Revision(guid) => (None, Some(GuidRef::new(guid.as_str()))),
        };
        let body = CreateDeploymentRequest {
            droplet,
            revision,
            strategy,
            relationships: DeploymentRelationships {
                app: ToOneRelationship::to(app_guid),
            },
        };
        let deployment: Deployment = self
            .make_request(
                RequestParams::new(RequestName::PostDeployment),
                Some(&body),
                warnings,
            )
            .await?;
        Ok(deployment.guid)
    }

    /// Fetch a deployment.
    ///
    /// # Errors
    ///
    /// Returns transport, API, or decoding failures.
    pub async fn get_deployment(
        &self,
        deployment_guid: &str,
        warnings: &mut Warnings,
    ) -> ClientResult<Deployment> {
        let uri_params = [("deployment_guid", deployment_guid)];
        let params = RequestParams::new(RequestName::GetDeployment)
            .with_uri_params(&uri_params);
        self.make_request(params, None::<&()>, warnings).await
    }
}
