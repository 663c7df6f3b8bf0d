//! Named control-plane endpoints and request construction.

use reqwest::Method;
use url::Url;

use crate::error::{ClientError, ClientResult};

/// Control-plane endpoints the client knows how to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestName {
    /// `GET /`
    GetRoot,
    /// `GET /v3/apps`
    GetApplications,
    /// `GET /v3/apps/:app_guid/revisions`
    GetApplicationRevisions,
    /// `GET /v3/apps/:app_guid/packages`
    GetApplicationPackages,
    /// `GET /v3/apps/:app_guid/droplets/current`
    GetApplicationCurrentDroplet,
    /// `PATCH /v3/apps/:app_guid/relationships/current_droplet`
    PatchApplicationCurrentDroplet,
    /// `GET /v3/apps/:app_guid/processes`
    GetApplicationProcesses,
    /// `POST /v3/apps/:app_guid/actions/start`
    PostApplicationActionStart,
    /// `POST /v3/apps/:app_guid/actions/stop`
    PostApplicationActionStop,
    /// `GET /v3/processes/:process_guid/stats`
    GetProcessStats,
    /// `POST /v3/builds`
    PostBuild,
    /// `GET /v3/builds/:build_guid`
    GetBuild,
    /// `POST /v3/deployments`
    PostDeployment,
    /// `GET /v3/deployments/:deployment_guid`
    GetDeployment,
    /// `GET /v3/organizations`
    GetOrganizations,
    /// `GET /v3/spaces`
    GetSpaces,
    /// `GET /v3/organization_quotas`
    GetOrganizationQuotas,
    /// `POST /v3/organization_quotas`
    PostOrganizationQuota,
}

impl RequestName {
    /// HTTP method of the endpoint.
    #[must_use]
    pub fn method(self) -> Method {
        match self {
            Self::PostApplicationActionStart
            | Self::PostApplicationActionStop
            | Self::PostBuild
            | Self::PostDeployment
            | Self::PostOrganizationQuota => Method::POST,
            Self::PatchApplicationCurrentDroplet => Method::PATCH,
            _ => Method::GET,
        }
    }

    /// Path template with `:param` placeholders.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::GetRoot => "/",
            Self::GetApplications => "/v3/apps",
            Self::GetApplicationRevisions => "/v3/apps/:app_guid/revisions",
            Self::GetApplicationPackages => "/v3/apps/:app_guid/packages",
            Self::GetApplicationCurrentDroplet => "/v3/apps/:app_guid/droplets/current",
            Self::PatchApplicationCurrentDroplet => {
                "/v3/apps/:app_guid/relationships/current_droplet"
            }
            Self::GetApplicationProcesses => "/v3/apps/:app_guid/processes",
            Self::PostApplicationActionStart => "/v3/apps/:app_guid/actions/start",
            Self::PostApplicationActionStop => "/v3/apps/:app_guid/actions/stop",
            Self::GetProcessStats => "/v3/processes/:process_guid/stats",
            Self::PostBuild => "/v3/builds",
            Self::GetBuild => "/v3/builds/:build_guid",
            Self::PostDeployment => "/v3/deployments",
            Self::GetDeployment => "/v3/deployments/:deployment_guid",
            Self::GetOrganizations => "/v3/organizations",
            Self::GetSpaces => "/v3/spaces",
            Self::GetOrganizationQuotas | Self::PostOrganizationQuota => "/v3/organization_quotas",
        }
    }
}

/// Filter keys accepted by list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// `names`
    Names,
    /// `space_guids`
    SpaceGuids,
    /// `organization_guids`
    OrganizationGuids,
    /// `versions`
    Versions,
    /// `states`
    States,
    /// `order_by`
    OrderBy,
    /// `per_page`
    PerPage,
}

impl QueryKey {
    /// Wire name of the key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Names => "names",
            Self::SpaceGuids => "space_guids",
            Self::OrganizationGuids => "organization_guids",
            Self::Versions => "versions",
            Self::States => "states",
            Self::OrderBy => "order_by",
            Self::PerPage => "per_page",
        }
    }
}

/// A list filter: one key with one or more values, sent as `key=v1,v2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Filter key.
    pub key: QueryKey,
    /// Filter values, joined with commas on the wire.
    pub values: Vec<String>,
}

impl Query {
    /// Filter with several values.
    #[must_use]
    pub fn new<I, S>(key: QueryKey, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Filter with a single value.
    #[must_use]
    pub fn single(key: QueryKey, value: impl Into<String>) -> Self {
        Self {
            key,
            values: vec![value.into()],
        }
    }
}

/// Everything needed to address one endpoint call.
#[derive(Debug, Clone, Copy)]
pub struct RequestParams<'a> {
    /// Endpoint to call.
    pub name: RequestName,
    /// Values for the `:param` placeholders of the path template.
    pub uri_params: &'a [(&'a str, &'a str)],
    /// List filters, combined conjunctively.
    pub query: &'a [Query],
}

impl<'a> RequestParams<'a> {
    /// Parameters for an endpoint without placeholders or filters.
    #[must_use]
    pub const fn new(name: RequestName) -> Self {
        Self {
            name,
            uri_params: &[],
            query: &[],
        }
    }

    /// Set the placeholder values.
    #[must_use]
    pub const fn with_uri_params(mut self, uri_params: &'a [(&'a str, &'a str)]) -> Self {
        self.uri_params = uri_params;
        self
    }

    /// Set the list filters.
    #[must_use]
    pub const fn with_query(mut self, query: &'a [Query]) -> Self {
        self.query = query;
        self
    }

    /// Resolve the full URL against `base`, keeping any path prefix of `base`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingUriParam`] when a placeholder has no value
    /// and [`ClientError::InvalidUrl`] when `base` cannot carry a path.
    pub fn url(&self, base: &Url) -> ClientResult<Url> {
        let mut url = base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| ClientError::InvalidUrl {
                url: base.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            })?;
            segments.pop_if_empty();
            for segment in self.name.path().split('/').filter(|s| !s.is_empty()) {
                if let Some(param) = segment.strip_prefix(':') {
                    let value = self
                        .uri_params
                        .iter()
                        .find(|(name, _)| *name == param)
                        .map(|(_, value)| *value)
                        .ok_or_else(|| ClientError::MissingUriParam {
                            param: param.to_string(),
                        })?;
                    segments.push(value);
                } else {
                    segments.push(segment);
                }
            }
        }

        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for query in self.query {
                pairs.append_pair(query.key.as_str(), &query.values.join(","));
            }
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(raw: &str) -> Url {
        Url::parse(raw).expect("base URL should parse")
    }

    #[test]
    fn placeholders_are_substituted() {
        let url = RequestParams::new(RequestName::GetApplicationRevisions)
            .with_uri_params(&[("app_guid", "some-app-guid")])
            .url(&base("https://api.example.com"))
            .expect("url should build");
        assert_eq!(
            url.as_str(),
            "https://api.example.com/v3/apps/some-app-guid/revisions"
        );
    }

    #[test]
    fn placeholders_accept_borrowed_runtime_values() {
        let build_guid = format!("build-{}", 42);
        let uri_params = [("build_guid", build_guid.as_str())];
        let params = RequestParams::new(RequestName::GetBuild).with_uri_params(&uri_params);

        let url = params
            .url(&base("https://api.example.com"))
            .expect("url should build");

        assert_eq!(url.as_str(), "https://api.example.com/v3/builds/build-42");
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let url = RequestParams::new(RequestName::GetApplications)
            .url(&base("http://127.0.0.1:8080/proxy/"))
            .expect("url should build");
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/proxy/v3/apps");
    }

    #[test]
    fn queries_join_values_with_commas() {
        let query = [
            Query::new(QueryKey::Names, ["web", "worker"]),
            Query::single(QueryKey::SpaceGuids, "space-guid"),
        ];
        let url = RequestParams::new(RequestName::GetApplications)
            .with_query(&query)
            .url(&base("https://api.example.com"))
            .expect("url should build");
        assert_eq!(url.path(), "/v3/apps");
        assert_eq!(
            url.query(),
            Some("names=web%2Cworker&space_guids=space-guid")
        );
    }

    #[test]
    fn missing_placeholder_is_reported() {
        let err = RequestParams::new(RequestName::GetBuild)
            .url(&base("https://api.example.com"))
            .expect_err("placeholder without a value should fail");
        assert!(matches!(err, ClientError::MissingUriParam { ref param } if param == "build_guid"));
    }

    #[test]
    fn root_request_targets_the_base() {
        let url = RequestParams::new(RequestName::GetRoot)
            .url(&base("https://api.example.com"))
            .expect("url should build");
        assert_eq!(url.as_str(), "https://api.example.com/");
        assert_eq!(RequestName::GetRoot.method(), Method::GET);
        assert_eq!(RequestName::PostDeployment.method(), Method::POST);
    }
}
