use stratus_api_models::OrganizationQuota;
use stratus_client::{Query, QueryKey, Warnings};
use tracing::instrument;

use crate::actor::Actor;
use crate::error::{ActorError, ActorResult};

impl Actor {
    /// Every organization quota.
    ///
    /// # Errors
    ///
    /// Returns request failures, including list items that are not quotas.
    pub async fn get_organization_quotas(
        &self,
        warnings: &mut Warnings,
    ) -> ActorResult<Vec<OrganizationQuota>> {
        Ok(self.client.get_organization_quotas(&[], warnings).await?)
    }

    /// Look up an organization quota by name.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::QuotaNotFound`] when nothing matches.
    #[instrument(skip(self, warnings))]
    pub async fn get_organization_quota_by_name(
        &self,
        name: &str,
        warnings: &mut Warnings,
    ) -> ActorResult<OrganizationQuota> {
        let query = [Query::single(QueryKey::Names, name)];
        self.client
            .get_organization_quotas(&query, warnings)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ActorError::QuotaNotFound {
                name: name.to_string(),
            })
    }

    /// Create an organization quota.
    ///
    /// # Errors
    ///
    /// Returns request failures, e.g. when the name is already taken.
    #[instrument(skip(self, quota, warnings), fields(name = %quota.name))]
    pub async fn create_organization_quota(
        &self,
        quota: &OrganizationQuota,
        warnings: &mut Warnings,
    ) -> ActorResult<OrganizationQuota> {
        Ok(self
            .client
            .create_organization_quota(quota, warnings)
            .await?)
    }
}
