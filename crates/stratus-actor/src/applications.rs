use stratus_api_models::{Application, Droplet, Package, PackageState};
use stratus_client::{Query, QueryKey, Warnings};
use tracing::instrument;

use crate::actor::Actor;
use crate::error::{ActorError, ActorResult};

impl Actor {
    /// Look up an application by name within a space.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::ApplicationNotFound`] when no application matches.
    #[instrument(skip(self, warnings))]
    pub async fn get_application_by_name_and_space(
        &self,
        name: &str,
        space_guid: &str,
        warnings: &mut Warnings,
    ) -> ActorResult<Application> {
        let query = [
            Query::single(QueryKey::Names, name),
            Query::single(QueryKey::SpaceGuids, space_guid),
        ];
        self.client
            .get_applications(&query, warnings)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ActorError::ApplicationNotFound {
                name: name.to_string(),
            })
    }

    /// Droplet the application currently runs.
    ///
    /// # Errors
    ///
    /// Returns request failures.
    pub async fn get_current_droplet(
        &self,
        app_guid: &str,
        warnings: &mut Warnings,
    ) -> ActorResult<Droplet> {
        Ok(self
            .client
            .get_application_current_droplet(app_guid, warnings)
            .await?)
    }

    /// Most recently created package in the `READY` state.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::NoReadyPackage`] when none is ready.
    #[instrument(skip(self, warnings))]
    pub async fn get_newest_ready_package(
        &self,
        app_guid: &str,
        warnings: &mut Warnings,
    ) -> ActorResult<Package> {
        let query = [
            Query::single(QueryKey::States, PackageState::Ready.as_str()),
            Query::single(QueryKey::OrderBy, "-created_at"),
        ];
        let packages = self
            .client
            .get_application_packages(app_guid, &query, warnings)
            .await?;
        packages
            .into_iter()
            .filter(|package| package.state == PackageState::Ready)
            .max_by(|left, right| left.created_at.cmp(&right.created_at))
            .ok_or_else(|| ActorError::NoReadyPackage {
                app_guid: app_guid.to_string(),
            })
    }

    /// Stop the application.
    ///
    /// # Errors
    ///
    /// Returns request failures.
    pub async fn stop_application(
        &self,
        app_guid: &str,
        warnings: &mut Warnings,
    ) -> ActorResult<Application> {
        Ok(self.client.stop_application(app_guid, warnings).await?)
    }

    /// Start the application without waiting for instances.
    ///
    /// # Errors
    ///
    /// Returns request failures.
    pub async fn start_application(
        &self,
        app_guid: &str,
        warnings: &mut Warnings,
    ) -> ActorResult<Application> {
        Ok(self.client.start_application(app_guid, warnings).await?)
    }

    /// Point the application at a droplet.
    ///
    /// # Errors
    ///
    /// Returns request failures.
    pub async fn set_application_droplet(
        &self,
        app_guid: &str,
        droplet_guid: &str,
        warnings: &mut Warnings,
    ) -> ActorResult<()> {
        self.client
            .set_application_droplet(app_guid, droplet_guid, warnings)
            .await?;
        Ok(())
    }
}
