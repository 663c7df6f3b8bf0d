//! Connection setup, request execution, and list pagination.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use stratus_api_models::{ErrorEnvelope, PaginatedEnvelope};
use url::Url;

use crate::error::{ClientError, ClientResult, MultiError};
use crate::request::RequestParams;
use crate::warnings::Warnings;

/// Header carrying the per-invocation request identifier.
pub(crate) const HEADER_REQUEST_ID: &str = "X-Vcap-Request-Id";

/// Settings used to construct a [`CloudControllerClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the control-plane API.
    pub api_url: Url,
    /// Bearer token sent with every request.
    pub access_token: Option<String>,
    /// Identifier sent in the `X-Vcap-Request-Id` header.
    pub request_id: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Accept invalid TLS certificates.
    pub skip_ssl_validation: bool,
}

/// Typed client for the versioned control-plane API.
#[derive(Debug, Clone)]
pub struct CloudControllerClient {
    http: Client,
    base_url: Url,
}

impl CloudControllerClient {
    /// Build a client with auth and request-id headers applied to every request.
    ///
    /// # Errors
    ///
    /// Returns an error when a header value is invalid or the HTTP client
    /// cannot be constructed.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let mut headers = HeaderMap::new();
        let request_id = HeaderValue::from_str(&config.request_id).map_err(|_| {
            ClientError::InvalidHeader {
                name: HEADER_REQUEST_ID,
            }
        })?;
        headers.insert(HEADER_REQUEST_ID, request_id);
        if let Some(token) = config.access_token.as_deref() {
            let mut value = HeaderValue::from_str(&bearer(token))
                .map_err(|_| ClientError::InvalidHeader { name: "Authorization" })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .danger_accept_invalid_certs(config.skip_ssl_validation)
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self::from_parts(http, config.api_url.clone()))
    }

    /// Wrap an existing HTTP client.
    #[must_use]
    pub const fn from_parts(http: Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Underlying HTTP client, shared with the log cache reader.
    #[must_use]
    pub const fn http(&self) -> &Client {
        &self.http
    }

    /// Call a named endpoint and decode its JSON response.
    ///
    /// Warnings from the response are appended to `warnings` even when the
    /// call fails.
    ///
    /// # Errors
    ///
    /// Returns transport, API, or decoding failures.
    pub async fn make_request<B, T>(
        &self,
        params: RequestParams<'_>,
        body: Option<&B>,
        warnings: &mut Warnings,
    ) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = params.url(&self.base_url)?;
        let body = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(ClientError::Encode)?;
        self.execute(params.name.method(), url, body, warnings).await
    }

    /// Walk every page of a list endpoint, decoding each item as `T`.
    ///
    /// `expected` names the resource type in [`ClientError::UnexpectedItemInList`].
    /// Pagination stops at the first failing page or callback; warnings from
    /// the pages fetched so far stay in `warnings`.
    ///
    /// # Errors
    ///
    /// Returns the first request, decoding, or callback failure.
    pub async fn fetch_all<T, F>(
        &self,
        params: RequestParams<'_>,
        expected: &'static str,
        warnings: &mut Warnings,
        mut on_item: F,
    ) -> ClientResult<()>
    where
        T: DeserializeOwned,
        F: FnMut(T) -> ClientResult<()>,
    {
        let mut next = Some(params.url(&self.base_url)?);
        while let Some(url) = next.take() {
            let page: PaginatedEnvelope = self.execute(Method::GET, url, None, warnings).await?;
            for item in page.resources {
                let decoded = T::deserialize(&item)
                    .map_err(|_| ClientError::UnexpectedItemInList { expected, item: item.clone() })?;
                on_item(decoded)?;
            }
            next = page
                .pagination
                .next
                .map(|link| {
                    Url::parse(&link.href).map_err(|err| ClientError::InvalidUrl {
                        url: link.href.clone(),
                        reason: err.to_string(),
                    })
                })
                .transpose()?;
        }
        Ok(())
    }

    /// Collect every item of a list endpoint.
    ///
    /// # Errors
    ///
    /// See [`Self::fetch_all`].
    pub async fn list<T>(
        &self,
        params: RequestParams<'_>,
        expected: &'static str,
        warnings: &mut Warnings,
    ) -> ClientResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let mut items = Vec::new();
        self.fetch_all(params, expected, warnings, |item| {
            items.push(item);
            Ok(())
        })
        .await?;
        Ok(items)
    }

    pub(crate) async fn execute<T>(
        &self,
        method: Method,
        url: Url,
        body: Option<Vec<u8>>,
        warnings: &mut Warnings,
    ) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        tracing::debug!(method = %method, url = %url, "control-plane request");
        let mut request = self.http.request(method, url.clone());
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = request.send().await.map_err(|source| ClientError::Transport {
            url: url.to_string(),
            source,
        })?;
        warnings.collect_from(response.headers());

        let status = response.status();
        let bytes = response.bytes().await.map_err(|source| ClientError::Transport {
            url: url.to_string(),
            source,
        })?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), url = %url, "control-plane request failed");
            return Err(classify_failure(status.as_u16(), &url, &bytes));
        }

        serde_json::from_slice(&bytes).map_err(|source| ClientError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

fn bearer(token: &str) -> String {
    let lowered = token.to_ascii_lowercase();
    if lowered.starts_with("bearer ") {
        token.to_string()
    } else {
        format!("bearer {token}")
    }
}

fn classify_failure(status: u16, url: &Url, body: &[u8]) -> ClientError {
    match serde_json::from_slice::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.errors.is_empty() => ClientError::Api(MultiError {
            status,
            errors: envelope.errors,
        }),
        _ => ClientError::RawHttp {
            status,
            url: url.to_string(),
            body: String::from_utf8_lossy(body).trim().to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{Query, QueryKey, RequestName};
    use httpmock::MockServer;
    use httpmock::prelude::*;
    use serde_json::{Value, json};
    use stratus_api_models::Revision;
    use stratus_test_support::fixtures::{self, WARNINGS_HEADER};

    fn client_for(server: &MockServer) -> CloudControllerClient {
        let config = ClientConfig {
            api_url: Url::parse(&server.base_url()).expect("mock URL should parse"),
            access_token: Some("some-token".to_string()),
            request_id: "request-id".to_string(),
            timeout: Duration::from_secs(5),
            skip_ssl_validation: false,
        };
        CloudControllerClient::new(&config).expect("client should build")
    }

    #[tokio::test]
    async fn requests_carry_auth_and_request_id_headers() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/")
                .header("authorization", "bearer some-token")
                .header("x-vcap-request-id", "request-id");
            then.status(200).json_body(json!({"links": {}}));
        });

        let mut warnings = Warnings::new();
        let _: Value = client_for(&server)
            .make_request(RequestParams::new(RequestName::GetRoot), None::<&()>, &mut warnings)
            .await
            .expect("root request should succeed");
        mock.assert();
    }

    #[tokio::test]
    async fn pagination_visits_every_item_in_order_and_unions_warnings() {
        let server = MockServer::start_async().await;
        let path = "/v3/apps/app-guid/revisions";
        let first = server.mock(|when, then| {
            when.method(GET).path(path).query_param("per_page", "2");
            then.status(200)
                .header(WARNINGS_HEADER, fixtures::encode_warnings(&["page one"]))
                .json_body(fixtures::page(
                    vec![fixtures::revision("r1", 1), fixtures::revision("r2", 2)],
                    Some(server.url(format!("{path}?page=2")).as_str()),
                ));
        });
        let second = server.mock(|when, then| {
            when.method(GET).path(path).query_param("page", "2");
            then.status(200)
                .header(WARNINGS_HEADER, fixtures::encode_warnings(&["page two"]))
                .json_body(fixtures::page(
                    vec![fixtures::revision("r3", 3), fixtures::revision("r4", 4)],
                    Some(server.url(format!("{path}?page=3")).as_str()),
                ));
        });
        let third = server.mock(|when, then| {
            when.method(GET).path(path).query_param("page", "3");
            then.status(200)
                .header(WARNINGS_HEADER, fixtures::encode_warnings(&["page three"]))
                .json_body(fixtures::page(vec![fixtures::revision("r5", 5)], None));
        });

        let query = [Query::single(QueryKey::PerPage, "2")];
        let params = RequestParams::new(RequestName::GetApplicationRevisions)
            .with_uri_params(&[("app_guid", "app-guid")])
            .with_query(&query);
        let mut warnings = Warnings::new();
        let mut seen = Vec::new();
        client_for(&server)
            .fetch_all(params, "revision", &mut warnings, |revision: Revision| {
                seen.push(revision.version);
                Ok(())
            })
            .await
            .expect("pagination should succeed");

        first.assert();
        second.assert();
        third.assert();
        assert_eq!(seen, [1, 2, 3, 4, 5]);
        assert_eq!(warnings.as_slice(), ["page one", "page two", "page three"]);
    }

    #[tokio::test]
    async fn failing_page_stops_pagination_but_keeps_warnings() {
        let server = MockServer::start_async().await;
        let path = "/v3/apps/app-guid/revisions";
        server.mock(|when, then| {
            when.method(GET).path(path).query_param("per_page", "1");
            then.status(200)
                .header(WARNINGS_HEADER, fixtures::encode_warnings(&["kept"]))
                .json_body(fixtures::page(
                    vec![fixtures::revision("r1", 1)],
                    Some(server.url(format!("{path}?page=2")).as_str()),
                ));
        });
        server.mock(|when, then| {
            when.method(GET).path(path).query_param("page", "2");
            then.status(500)
                .header(WARNINGS_HEADER, fixtures::encode_warnings(&["also kept"]))
                .json_body(fixtures::error_body(&[(10001, "CF-ServerError", "boom")]));
        });

        let query = [Query::single(QueryKey::PerPage, "1")];
        let params = RequestParams::new(RequestName::GetApplicationRevisions)
            .with_uri_params(&[("app_guid", "app-guid")])
            .with_query(&query);
        let mut warnings = Warnings::new();
        let mut seen = 0;
        let err = client_for(&server)
            .fetch_all(params, "revision", &mut warnings, |_: Revision| {
                seen += 1;
                Ok(())
            })
            .await
            .expect_err("second page should fail");

        assert_eq!(seen, 1);
        assert_eq!(warnings.as_slice(), ["kept", "also kept"]);
        let api = err.as_api().expect("error should be structured");
        assert_eq!(api.status, 500);
        assert_eq!(api.errors[0].detail, "boom");
    }

    #[tokio::test]
    async fn item_of_the_wrong_shape_is_rejected() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/v3/apps/app-guid/revisions");
            then.status(200)
                .json_body(fixtures::page(vec![json!({"name": "not-a-revision"})], None));
        });

        let params = RequestParams::new(RequestName::GetApplicationRevisions)
            .with_uri_params(&[("app_guid", "app-guid")]);
        let mut warnings = Warnings::new();
        let err = client_for(&server)
            .list::<Revision>(params, "revision", &mut warnings)
            .await
            .expect_err("unexpected item should fail");

        match err {
            ClientError::UnexpectedItemInList { expected, item } => {
                assert_eq!(expected, "revision");
                assert_eq!(item, json!({"name": "not-a-revision"}));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unstructured_failures_keep_the_body() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/v3/builds/build-guid");
            then.status(502).body("bad gateway\n");
        });

        let params = RequestParams::new(RequestName::GetBuild)
            .with_uri_params(&[("build_guid", "build-guid")]);
        let mut warnings = Warnings::new();
        let err = client_for(&server)
            .make_request::<(), Value>(params, None, &mut warnings)
            .await
            .expect_err("502 should fail");

        assert!(matches!(err, ClientError::RawHttp { status: 502, ref body, .. } if body == "bad gateway"));
    }

    #[test]
    fn bearer_prefix_is_not_duplicated() {
        assert_eq!(bearer("abc"), "bearer abc");
        assert_eq!(bearer("Bearer abc"), "Bearer abc");
    }
}
