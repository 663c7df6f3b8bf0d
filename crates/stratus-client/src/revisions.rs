use stratus_api_models::Revision;

use crate::client::CloudControllerClient;
use crate::error::ClientResult;
use crate::request::{Query, RequestName, RequestParams};
use crate::warnings::Warnings;

impl CloudControllerClient {
    /// Revisions of an application, across all pages, matching `query`.
    ///
    /// # Errors
    ///
    /// Returns the first page or decoding failure; warnings collected before
    /// the failure stay in `warnings`.
    pub async fn get_application_revisions(
        &self,
        app_guid: &str,
        query: &[Query],
        warnings: &mut Warnings,
    ) -> ClientResult<Vec<Revision>> {
        let uri_params = [("app_guid", app_guid)];
        let params = RequestParams::new(RequestName::GetApplicationRevisions)
            .with_uri_params(&uri_params)
            .with_query(query);
        self.list(params, "revision", warnings).await
    }
}
