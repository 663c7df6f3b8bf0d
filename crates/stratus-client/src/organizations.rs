use stratus_api_models::{Organization, Space};

use crate::client::CloudControllerClient;
use crate::error::ClientResult;
use crate::request::{Query, RequestName, RequestParams};
use crate::warnings::Warnings;

impl CloudControllerClient {
    /// Organizations matching `query`.
    ///
    /// # Errors
    ///
    /// Returns the first page or decoding failure.
    pub async fn get_organizations(
        &self,
        query: &[Query],
        warnings: &mut Warnings,
    ) -> ClientResult<Vec<Organization>> {
        let params = RequestParams::new(RequestName::GetOrganizations).with_query(query);
        self.list(params, "organization", warnings).await
    }

    /// Spaces matching `query`.
    ///
    /// # Errors
    ///
    /// Returns the first page or decoding failure.
    pub async fn get_spaces(
        &self,
        query: &[Query],
        warnings: &mut Warnings,
    ) -> ClientResult<Vec<Space>> {
        let params = RequestParams::new(RequestName::GetSpaces).with_query(query);
        self.list(params, "space", warnings).await
    }
}
