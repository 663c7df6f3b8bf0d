use stratus_api_models::{ProcessInstance, ProcessStatsResponse};

use crate::client::CloudControllerClient;
use crate::error::ClientResult;
use crate::request::{RequestName, RequestParams};
use crate::warnings::Warnings;

impl CloudControllerClient {
    /// Runtime stats of every instance of a process.
    ///
    /// # Errors
    ///
    /// Returns transport, API, or decoding failures.
    pub async fn get_process_instances(
        &self,
        process_guid: &str,
        warnings: &mut Warnings,
    ) -> ClientResult<Vec<ProcessInstance>> {
        let uri_params = [("process_guid", process_guid)];
        let params = RequestParams::new(RequestName::GetProcessStats)
            .with_uri_params(&uri_params);
        let stats: ProcessStatsResponse = self.make_request(params, None::<&()>, warnings).await?;
        Ok(stats.resources)
    }
}
