use stratus_api_models::OrganizationQuota;

use crate::client::CloudControllerClient;
use crate::error::ClientResult;
use crate::request::{Query, RequestName, RequestParams};
use crate::warnings::Warnings;

impl CloudControllerClient {
    /// Organization quotas matching `query`.
    ///
    /// # Errors
    ///
    /// Returns the first page or decoding failure, including items that are
    /// not organization quotas.
    pub async fn get_organization_quotas(
        &self,
        query: &[Query],
        warnings: &mut Warnings,
    ) -> ClientResult<Vec<OrganizationQuota>> {
        let params = RequestParams::new(RequestName::GetOrganizationQuotas).with_query(query);
        self.list(params, "organization quota", warnings).await
    }

    /// Create an organization quota; unlimited limits are sent as `null`.
    ///
    /// # Errors
    ///
    /// Returns transport, API, or decoding failures.
    pub async fn create_organization_quota(
        &self,
        quota: &OrganizationQuota,
        warnings: &mut Warnings,
    ) -> ClientResult<OrganizationQuota> {
        self.make_request(
            RequestParams::new(RequestName::PostOrganizationQuota),
            Some(quota),
            warnings,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use httpmock::MockServer;
    use httpmock::prelude::*;
    use reqwest::Client;
    use serde_json::json;
    use stratus_api_models::{AppLimit, RouteLimit, ServiceLimit};
    use stratus_test_support::fixtures;
    use url::Url;

    fn client_for(server: &MockServer) -> CloudControllerClient {
        CloudControllerClient::from_parts(
            Client::new(),
            Url::parse(&server.base_url()).expect("mock URL should parse"),
        )
    }

    #[tokio::test]
    async fn creation_sends_null_for_unlimited_values() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/v3/organization_quotas").json_body(json!({
                "name": "big",
                "apps": {
                    "total_memory_in_mb": 2048,
                    "per_process_memory_in_mb": null,
                    "total_instances": null
                },
                "services": {"total_service_instances": 4, "paid_services_allowed": true},
                "routes": {"total_routes": null, "total_reserved_ports": 0}
            }));
            then.status(201)
                .json_body(fixtures::organization_quota("quota-guid", "big", Some(2048)));
        });

        let quota = OrganizationQuota {
            guid: String::new(),
            name: "big".to_string(),
            apps: AppLimit {
                total_memory_in_mb: Some(2048),
                per_process_memory_in_mb: None,
                total_instances: None,
            },
            services: ServiceLimit {
                total_service_instances: Some(4),
                paid_services_allowed: true,
            },
            routes: RouteLimit {
                total_routes: None,
                total_reserved_ports: Some(0),
            },
        };
        let mut warnings = Warnings::new();
        let created = client_for(&server)
            .create_organization_quota(&quota, &mut warnings)
            .await
            .expect("quota should be created");

        mock.assert();
        assert_eq!(created.guid, "quota-guid");
    }

    #[tokio::test]
    async fn listing_rejects_foreign_items() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/v3/organization_quotas");
            then.status(200).json_body(fixtures::page(
                vec![
                    fixtures::organization_quota("quota-guid", "default", None),
                    json!({"guid": "app-guid"}),
                ],
                None,
            ));
        });

        let mut warnings = Warnings::new();
        let err = client_for(&server)
            .get_organization_quotas(&[], &mut warnings)
            .await
            .expect_err("foreign item should fail");

        assert!(matches!(
            err,
            ClientError::UnexpectedItemInList { expected: "organization quota", .. }
        ));
    }
}
