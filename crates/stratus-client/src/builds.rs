use stratus_api_models::{Build, CreateBuildRequest, GuidRef};

use crate::client::CloudControllerClient;
use crate::error::ClientResult;
use crate::request::{RequestName, RequestParams};
use crate::warnings::Warnings;

impl CloudControllerClient {
    /// Start staging `package_guid`.
    ///
    /// # Errors
    ///
    /// Returns transport, API, or decoding failures.
    pub async fn create_build(
        &self,
        package_guid: &str,
        warnings: &mut Warnings,
    ) -> ClientResult<Build> {
        let body = CreateBuildRequest {
            package: GuidRef::new(package_guid),
        };
        self.make_request(RequestParams::new(RequestName::PostBuild), Some(&body), warnings)
            .await
    }

    /// Fetch a build.
    ///
    /// # Errors
    ///
    /// Returns transport, API, or decoding failures.
    pub async fn get_build(&self, build_guid: &str, warnings: &mut Warnings) -> ClientResult<Build> {
        let uri_params = [("build_guid", build_guid)];
        let params = RequestParams::new(RequestName::GetBuild)
            .with_uri_params(&uri_params);
        self.make_request(params, None::<&()>, warnings).await
    }
}
