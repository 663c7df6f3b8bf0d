use stratus_api_models::RootInfo;

use crate::client::CloudControllerClient;
use crate::error::ClientResult;
use crate::request::{RequestName, RequestParams};
use crate::warnings::Warnings;

impl CloudControllerClient {
    /// Fetch the root document advertising API versions and the log cache.
    ///
    /// # Errors
    ///
    /// Returns transport, API, or decoding failures.
    pub async fn get_root(&self, warnings: &mut Warnings) -> ClientResult<RootInfo> {
        self.make_request(RequestParams::new(RequestName::GetRoot), None::<&()>, warnings)
            .await
    }
}
