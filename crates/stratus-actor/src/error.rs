use stratus_client::ClientError;
use thiserror::Error;

/// Errors returned by [`crate::Actor`] operations.
#[derive(Debug, Error)]
pub enum ActorError {
    /// No application with that name exists in the space.
    #[error("App '{name}' not found")]
    ApplicationNotFound {
        /// Requested application name.
        name: String,
    },
    /// No revision carries the requested version.
    #[error("Revision '{version}' not found")]
    RevisionNotFound {
        /// Requested version.
        version: u64,
    },
    /// More than one revision carries the requested version.
    #[error("More than one revision found for version '{version}'")]
    RevisionAmbiguous {
        /// Requested version.
        version: u64,
    },
    /// No organization with that name is visible.
    #[error("Organization '{name}' not found")]
    OrganizationNotFound {
        /// Requested organization name.
        name: String,
    },
    /// No space with that name exists in the organization.
    #[error("Space '{name}' not found")]
    SpaceNotFound {
        /// Requested space name.
        name: String,
    },
    /// No organization quota with that name exists.
    #[error("Organization quota '{name}' not found")]
    QuotaNotFound {
        /// Requested quota name.
        name: String,
    },
    /// The application has no package ready for staging.
    #[error("App '{app_guid}' has no package in READY state")]
    NoReadyPackage {
        /// Application GUID.
        app_guid: String,
    },
    /// Staging finished in the `FAILED` state; the server reason is kept verbatim.
    #[error("{reason}")]
    StagingFailed {
        /// Reason reported by the server.
        reason: String,
    },
    /// A deployment was finalized without being deployed.
    #[error("Deployment failed with reason {reason}")]
    DeploymentFailed {
        /// Status reason reported by the server.
        reason: String,
    },
    /// Every instance of a process crashed while starting.
    #[error("Start unsuccessful: {reason}")]
    StartFailed {
        /// Instance state or detail reported by the server.
        reason: String,
    },
    /// Polling used up its attempts without reaching a terminal state.
    #[error("Timed out waiting for {operation} to complete")]
    Timeout {
        /// Operation that was being polled.
        operation: &'static str,
    },
    /// Reading from the log cache failed.
    #[error("failed to read logs")]
    LogCache(#[source] ClientError),
    /// Any other request failure.
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Convenience alias for actor results.
pub type ActorResult<T> = Result<T, ActorError>;
