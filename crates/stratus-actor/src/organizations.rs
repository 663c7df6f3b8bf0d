use stratus_api_models::{Organization, Space};
use stratus_client::{Query, QueryKey, Warnings};
use tracing::instrument;

use crate::actor::Actor;
use crate::error::{ActorError, ActorResult};

impl Actor {
    /// Look up an organization by name.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::OrganizationNotFound`] when nothing matches.
    #[instrument(skip(self, warnings))]
    pub async fn get_organization_by_name(
        &self,
        name: &str,
        warnings: &mut Warnings,
    ) -> ActorResult<Organization> {
        let query = [Query::single(QueryKey::Names, name)];
        self.client
            .get_organizations(&query, warnings)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ActorError::OrganizationNotFound {
                name: name.to_string(),
            })
    }

    /// Look up a space by name within an organization.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SpaceNotFound`] when nothing matches.
    #[instrument(skip(self, warnings))]
    pub async fn get_space_by_name_and_organization(
        &self,
        name: &str,
        org_guid: &str,
        warnings: &mut Warnings,
    ) -> ActorResult<Space> {
        let query = [
            Query::single(QueryKey::Names, name),
            Query::single(QueryKey::OrganizationGuids, org_guid),
        ];
        self.client
            .get_spaces(&query, warnings)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ActorError::SpaceNotFound {
                name: name.to_string(),
            })
    }

    /// Every space of an organization.
    ///
    /// # Errors
    ///
    /// Returns request failures.
    pub async fn get_organization_spaces(
        &self,
        org_guid: &str,
        warnings: &mut Warnings,
    ) -> ActorResult<Vec<Space>> {
        let query = [
            Query::single(QueryKey::OrganizationGuids, org_guid),
            Query::single(QueryKey::OrderBy, "name"),
        ];
        Ok(self.client.get_spaces(&query, warnings).await?)
    }
}
