use stratus_api_models::Revision;
use stratus_client::{Query, QueryKey, Warnings};
use tracing::instrument;

use crate::actor::{Actor, RevisionLookup};
use crate::error::{ActorError, ActorResult};

impl Actor {
    /// Every revision of an application, oldest first.
    ///
    /// # Errors
    ///
    /// Returns request failures.
    #[instrument(skip(self, warnings))]
    pub async fn get_revisions(
        &self,
        app_guid: &str,
        warnings: &mut Warnings,
    ) -> ActorResult<Vec<Revision>> {
        let query = [Query::single(QueryKey::OrderBy, "created_at")];
        Ok(self
            .client
            .get_application_revisions(app_guid, &query, warnings)
            .await?)
    }

    /// Resolve the revision of `app_guid` carrying `version`.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::RevisionNotFound`] when nothing matches and
    /// [`ActorError::RevisionAmbiguous`] when the server filter yields more
    /// than one revision.
    #[instrument(skip(self, warnings))]
    pub async fn get_revision_by_application_and_version(
        &self,
        app_guid: &str,
        version: u64,
        warnings: &mut Warnings,
    ) -> ActorResult<Revision> {
        match self.config.revision_lookup {
            RevisionLookup::ServerFilter => {
                let query = [Query::single(QueryKey::Versions, version.to_string())];
                let mut revisions = self
                    .client
                    .get_application_revisions(app_guid, &query, warnings)
                    .await?;
                match revisions.len() {
                    0 => Err(ActorError::RevisionNotFound { version }),
                    1 => Ok(revisions.remove(0)),
                    _ => Err(ActorError::RevisionAmbiguous { version }),
                }
            }
            RevisionLookup::ClientScan => self
                .get_revisions(app_guid, warnings)
                .await?
                .into_iter()
                .find(|revision| revision.version == version)
                .ok_or(ActorError::RevisionNotFound { version }),
        }
    }
}
