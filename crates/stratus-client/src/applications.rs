use stratus_api_models::{Application, Droplet, Package, Process, ToOneRelationship};

use crate::client::CloudControllerClient;
use crate::error::ClientResult;
use crate::request::{Query, RequestName, RequestParams};
use crate::warnings::Warnings;

impl CloudControllerClient {
    /// List applications matching `query`.
    ///
    /// # Errors
    ///
    /// Returns the first page or decoding failure.
    pub async fn get_applications(
        &self,
        query: &[Query],
        warnings: &mut Warnings,
    ) -> ClientResult<Vec<Application>> {
        let params = RequestParams::new(RequestName::GetApplications).with_query(query);
        self.list(params, "application", warnings).await
    }

    /// Current droplet of an application.
    ///
    /// # Errors
    ///
    /// Returns transport, API, or decoding failures.
    pub async fn get_application_current_droplet(
        &self,
        app_guid: &str,
        warnings: &mut Warnings,
    ) -> ClientResult<Droplet> {
        let uri_params = [("app_guid", app_guid)];
        let params = RequestParams::new(RequestName::GetApplicationCurrentDroplet)
            .with_uri_params(&uri_params);
        self.make_request(params, None::<&()>, warnings).await
    }

    /// Point the application at `droplet_guid`.
    ///
    /// # Errors
    ///
    /// Returns transport, API, or decoding failures.
    pub async fn set_application_droplet(
        &self,
        app_guid: &str,
        droplet_guid: &str,
        warnings: &mut Warnings,
    ) -> ClientResult<ToOneRelationship> {
        let uri_params = [("app_guid", app_guid)];
        let params = RequestParams::new(RequestName::PatchApplicationCurrentDroplet)
            .with_uri_params(&uri_params);
        let body = ToOneRelationship::to(droplet_guid);
        self.make_request(params, Some(&body), warnings).await
    }

    /// Start the application.
    ///
    /// # Errors
    ///
    /// Returns transport, API, or decoding failures.
    pub async fn start_application(
        &self,
        app_guid: &str,
        warnings: &mut Warnings,
    ) -> ClientResult<Application> {
        let uri_params = [("app_guid", app_guid)];
        let params = RequestParams::new(RequestName::PostApplicationActionStart)
            .with_uri_params(&uri_params);
        self.make_request(params, None::<&()>, warnings).await
    }

    /// Stop the application.
    ///
    /// # Errors
    ///
    /// Returns transport, API, or decoding failures.
    pub async fn stop_application(
        &self,
        app_guid: &str,
        warnings: &mut Warnings,
    ) -> ClientResult<Application> {
        let uri_params = [("app_guid", app_guid)];
        let params = RequestParams::new(RequestName::PostApplicationActionStop)
            .with_uri_params(&uri_params);
        self.make_request(params, None::<&()>, warnings).await
    }

    /// Processes of an application.
    ///
    /// # Errors
    ///
    /// Returns the first page or decoding failure.
    pub async fn get_application_processes(
        &self,
        app_guid: &str,
        warnings: &mut Warnings,
    ) -> ClientResult<Vec<Process>> {
        let uri_params = [("app_guid", app_guid)];
        let params = RequestParams::new(RequestName::GetApplicationProcesses)
            .with_uri_params(&uri_params);
        self.list(params, "process", warnings).await
    }

    /// Packages of an application matching `query`.
    ///
    /// # Errors
    ///
    /// Returns the first page or decoding failure.
    pub async fn get_application_packages(
        &self,
        app_guid: &str,
        query: &[Query],
        warnings: &mut Warnings,
    ) -> ClientResult<Vec<Package>> {
        let uri_params = [("app_guid", app_guid)];
        let params = RequestParams::new(RequestName::GetApplicationPackages)
            .with_uri_params(&uri_params)
            .with_query(query);
        self.list(params, "package", warnings).await
    }
}
