//! Staging, deployment, and start orchestration.
//!
//! # Design
//! - The actor's poll loop is the only suspending loop; log lines arrive from
//!   a separate task over channels and are drained while the poll future runs.
//! - The log task is cancelled as soon as polling finishes, whatever the outcome.
//! - Log read failures surface as warnings, never as errors.

use std::future::Future;

use async_trait::async_trait;
use stratus_actor::{Actor, ActorResult, DeploymentSource, LogStreamHandle, Warnings};
use stratus_api_models::{Application, DeploymentStrategy, Droplet, Package};
use stratus_client::HttpLogCacheClient;
use tokio_util::sync::CancellationToken;

use crate::client::{CliError, CliResult};
use crate::output::Ui;

/// Actor operations needed to stage and start applications.
#[async_trait]
pub(crate) trait StagerActor: Send + Sync {
    async fn create_deployment(
        &self,
        app_guid: &str,
        source: &DeploymentSource,
        strategy: Option<DeploymentStrategy>,
        warnings: &mut Warnings,
    ) -> ActorResult<String>;
    async fn poll_deployment(&self, deployment_guid: &str, warnings: &mut Warnings)
    -> ActorResult<()>;
    async fn stop_application(&self, app_guid: &str, warnings: &mut Warnings) -> ActorResult<()>;
    async fn set_application_droplet(
        &self,
        app_guid: &str,
        droplet_guid: &str,
        warnings: &mut Warnings,
    ) -> ActorResult<()>;
    async fn start_application(&self, app_guid: &str, warnings: &mut Warnings) -> ActorResult<()>;
    async fn poll_start(&self, app_guid: &str, warnings: &mut Warnings) -> ActorResult<()>;
    async fn stage_package(&self, package_guid: &str, warnings: &mut Warnings)
    -> ActorResult<String>;
    async fn get_current_droplet(
        &self,
        app_guid: &str,
        warnings: &mut Warnings,
    ) -> ActorResult<Droplet>;
    async fn get_newest_ready_package(
        &self,
        app_guid: &str,
        warnings: &mut Warnings,
    ) -> ActorResult<Package>;
    async fn stream_logs(
        &self,
        app_guid: &str,
        cancel: CancellationToken,
        warnings: &mut Warnings,
    ) -> ActorResult<LogStreamHandle>;
}

#[async_trait]
impl StagerActor for Actor {
    async fn create_deployment(
        &self,
        app_guid: &str,
        source: &DeploymentSource,
        strategy: Option<DeploymentStrategy>,
        warnings: &mut Warnings,
    ) -> ActorResult<String> {
        Self::create_deployment(self, app_guid, source, strategy, warnings).await
    }

    async fn poll_deployment(
        &self,
        deployment_guid: &str,
        warnings: &mut Warnings,
    ) -> ActorResult<()> {
        Self::poll_deployment(self, deployment_guid, warnings).await
    }

    async fn stop_application(&self, app_guid: &str, warnings: &mut Warnings) -> ActorResult<()> {
        Self::stop_application(self, app_guid, warnings).await.map(|_| ())
    }

    async fn set_application_droplet(
        &self,
        app_guid: &str,
        droplet_guid: &str,
        warnings: &mut Warnings,
    ) -> ActorResult<()> {
        Self::set_application_droplet(self, app_guid, droplet_guid, warnings).await
    }

    async fn start_application(&self, app_guid: &str, warnings: &mut Warnings) -> ActorResult<()> {
        Self::start_application(self, app_guid, warnings)
            .await
            .map(|_| ())
    }

    async fn poll_start(&self, app_guid: &str, warnings: &mut Warnings) -> ActorResult<()> {
        Self::poll_start(self, app_guid, warnings).await
    }

    async fn stage_package(
        &self,
        package_guid: &str,
        warnings: &mut Warnings,
    ) -> ActorResult<String> {
        Self::stage_package(self, package_guid, warnings).await
    }

    async fn get_current_droplet(
        &self,
        app_guid: &str,
        warnings: &mut Warnings,
    ) -> ActorResult<Droplet> {
        Self::get_current_droplet(self, app_guid, warnings).await
    }

    async fn get_newest_ready_package(
        &self,
        app_guid: &str,
        warnings: &mut Warnings,
    ) -> ActorResult<Package> {
        Self::get_newest_ready_package(self, app_guid, warnings).await
    }

    async fn stream_logs(
        &self,
        app_guid: &str,
        cancel: CancellationToken,
        warnings: &mut Warnings,
    ) -> ActorResult<LogStreamHandle> {
        let reader = HttpLogCacheClient::discover(self.client(), warnings).await?;
        Ok(self.stream_application_logs(std::sync::Arc::new(reader), app_guid, cancel))
    }
}

/// How the application should be started.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct StartOptions {
    pub(crate) strategy: Option<DeploymentStrategy>,
    pub(crate) no_wait: bool,
}

/// Start `app` on the given droplet or revision.
///
/// With a strategy a deployment is created and polled until finalized.
/// Without one the app is stopped, pointed at the droplet, started, and its
/// instances polled.
pub(crate) async fn start_app<A>(
    actor: &A,
    ui: &mut Ui,
    app: &Application,
    source: DeploymentSource,
    options: StartOptions,
    warnings: &mut Warnings,
) -> CliResult<()>
where
    A: StagerActor + ?Sized,
{
    let deploy = options.strategy.is_some() || matches!(source, DeploymentSource::Revision(_));
    if deploy {
        ui.display_text("Creating deployment for app...");
        let created = actor
            .create_deployment(&app.guid, &source, options.strategy, warnings)
            .await;
        let deployment = flush(ui, warnings, created)?;
        if options.no_wait {
            return Ok(());
        }
        ui.display_text("Waiting for app to deploy...");
        let polled = actor.poll_deployment(&deployment, warnings).await;
        return flush(ui, warnings, polled);
    }

    ui.display_text(&format!("Stopping app '{}'...", app.name));
    let stopped = actor.stop_application(&app.guid, warnings).await;
    flush(ui, warnings, stopped)?;
    let assigned = actor
        .set_application_droplet(&app.guid, source.guid(), warnings)
        .await;
    flush(ui, warnings, assigned)?;

    ui.display_text(&format!("Starting app '{}'...", app.name));
    let started = actor.start_application(&app.guid, warnings).await;
    flush(ui, warnings, started)?;
    if options.no_wait {
        return Ok(());
    }
    ui.display_text("Waiting for app to start...");
    let polled = actor.poll_start(&app.guid, warnings).await;
    flush(ui, warnings, polled)
}

/// Show the warnings gathered so far, then surface the call's outcome.
fn flush<T>(ui: &mut Ui, warnings: &mut Warnings, result: ActorResult<T>) -> CliResult<T> {
    ui.display_warnings(warnings);
    result.map_err(CliError::from)
}

/// Stage `package_guid` while tailing staging logs, then start the droplet.
pub(crate) async fn stage_and_start<A>(
    actor: &A,
    ui: &mut Ui,
    app: &Application,
    package_guid: &str,
    options: StartOptions,
    warnings: &mut Warnings,
) -> CliResult<()>
where
    A: StagerActor + ?Sized,
{
    ui.display_text("Staging app and tracing logs...");
    let cancel = CancellationToken::new();
    let mut logs = match actor.stream_logs(&app.guid, cancel.clone(), warnings).await {
        Ok(handle) => Some(handle),
        Err(err) => {
            warnings.push(format!("Failed to retrieve logs: {err}"));
            None
        }
    };
    ui.display_warnings(warnings);

    let mut log_warnings = Vec::new();
    let staged = with_logs(
        actor.stage_package(package_guid, warnings),
        logs.as_mut(),
        ui,
        &mut log_warnings,
    )
    .await;

    cancel.cancel();
    if let Some(handle) = logs {
        finish_logs(handle, ui, &mut log_warnings).await;
    }
    warnings.extend(log_warnings);
    ui.display_warnings(warnings);

    let droplet = staged?;
    ui.display_newline();
    start_app(
        actor,
        ui,
        app,
        DeploymentSource::Droplet(droplet),
        options,
        warnings,
    )
    .await
}

/// Drive `work` to completion while rendering log lines as they arrive.
async fn with_logs<F, T>(
    work: F,
    logs: Option<&mut LogStreamHandle>,
    ui: &mut Ui,
    log_warnings: &mut Vec<String>,
) -> T
where
    F: Future<Output = T> + Send,
    T: Send,
{
    let Some(logs) = logs else {
        return work.await;
    };
    tokio::pin!(work);
    let mut messages_open = true;
    let mut errors_open = true;
    loop {
        tokio::select! {
            result = &mut work => return result,
            message = logs.messages.recv(), if messages_open => match message {
                Some(message) => ui.display_log(&message),
                None => messages_open = false,
            },
            error = logs.errors.recv(), if errors_open => match error {
                Some(error) => log_warnings.push(format!("Failed to retrieve logs: {error:#}")),
                None => errors_open = false,
            },
        }
    }
}

/// Wait for the cancelled log task and flush whatever it produced.
async fn finish_logs(mut handle: LogStreamHandle, ui: &mut Ui, log_warnings: &mut Vec<String>) {
    if let Err(err) = (&mut handle.task).await {
        tracing::debug!(error = %err, "log task ended abnormally");
    }
    while let Ok(message) = handle.messages.try_recv() {
        ui.display_log(&message);
    }
    while let Ok(error) = handle.errors.try_recv() {
        log_warnings.push(format!("Failed to retrieve logs: {error:#}"));
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::Utc;
    use stratus_actor::{ActorError, ActorResult, LogMessage, LogStreamHandle, Warnings};
    use stratus_api_models::{Droplet, LogStream, Package, PackageState};
    use tokio::sync::mpsc;
    use tokio_util::sync::CancellationToken;

    use super::{DeploymentSource, DeploymentStrategy, StagerActor};

    /// Recorded stager call.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) enum StagerCall {
        CreateDeployment {
            app_guid: String,
            source: DeploymentSource,
            strategy: Option<DeploymentStrategy>,
        },
        PollDeployment(String),
        Stop(String),
        SetDroplet(String, String),
        Start(String),
        PollStart(String),
        Stage(String),
    }

    /// Scriptable [`StagerActor`] recording every call.
    #[derive(Default)]
    pub(crate) struct FakeStager {
        pub(crate) calls: Mutex<Vec<StagerCall>>,
        pub(crate) deployment_failure: Mutex<Option<String>>,
        pub(crate) staging_failure: Mutex<Option<String>>,
        pub(crate) log_lines: Vec<String>,
        pub(crate) warning: Option<String>,
        pub(crate) cancelled: Arc<Mutex<Option<CancellationToken>>>,
    }

    impl FakeStager {
        pub(crate) fn calls(&self) -> Vec<StagerCall> {
            self.calls.lock().expect("calls lock").clone()
        }

        fn record(&self, call: StagerCall, warnings: &mut Warnings) {
            self.calls.lock().expect("calls lock").push(call);
            if let Some(warning) = &self.warning {
                warnings.push(warning.clone());
            }
        }
    }

    #[async_trait]
    impl StagerActor for FakeStager {
        async fn create_deployment(
            &self,
            app_guid: &str,
            source: &DeploymentSource,
            strategy: Option<DeploymentStrategy>,
            warnings: &mut Warnings,
        ) -> ActorResult<String> {
            self.record(
                StagerCall::CreateDeployment {
                    app_guid: app_guid.to_string(),
                    source: source.clone(),
                    strategy,
                },
                warnings,
            );
            Ok("deployment-guid".to_string())
        }

        async fn poll_deployment(
            &self,
            deployment_guid: &str,
            warnings: &mut Warnings,
        ) -> ActorResult<()> {
            self.record(StagerCall::PollDeployment(deployment_guid.to_string()), warnings);
            match self.deployment_failure.lock().expect("failure lock").clone() {
                Some(reason) => Err(ActorError::DeploymentFailed { reason }),
                None => Ok(()),
            }
        }

        async fn stop_application(&self, app_guid: &str, warnings: &mut Warnings) -> ActorResult<()> {
            self.record(StagerCall::Stop(app_guid.to_string()), warnings);
            Ok(())
        }

        async fn set_application_droplet(
            &self,
            app_guid: &str,
            droplet_guid: &str,
            warnings: &mut Warnings,
        ) -> ActorResult<()> {
            self.record(
                StagerCall::SetDroplet(app_guid.to_string(), droplet_guid.to_string()),
                warnings,
            );
            Ok(())
        }

        async fn start_application(&self, app_guid: &str, warnings: &mut Warnings) -> ActorResult<()> {
            self.record(StagerCall::Start(app_guid.to_string()), warnings);
            Ok(())
        }

        async fn poll_start(&self, app_guid: &str, warnings: &mut Warnings) -> ActorResult<()> {
            self.record(StagerCall::PollStart(app_guid.to_string()), warnings);
            Ok(())
        }

        async fn stage_package(
            &self,
            package_guid: &str,
            warnings: &mut Warnings,
        ) -> ActorResult<String> {
            self.record(StagerCall::Stage(package_guid.to_string()), warnings);
            // Give the log forwarder a chance to run before staging completes.
            tokio::task::yield_now().await;
            match self.staging_failure.lock().expect("failure lock").clone() {
                Some(reason) => Err(ActorError::StagingFailed { reason }),
                None => Ok("droplet-guid".to_string()),
            }
        }

        async fn get_current_droplet(
            &self,
            _app_guid: &str,
            _warnings: &mut Warnings,
        ) -> ActorResult<Droplet> {
            Ok(Droplet {
                guid: "current-droplet-guid".to_string(),
                ..Droplet::default()
            })
        }

        async fn get_newest_ready_package(
            &self,
            _app_guid: &str,
            _warnings: &mut Warnings,
        ) -> ActorResult<Package> {
            Ok(Package {
                guid: "package-guid".to_string(),
                kind: "bits".to_string(),
                state: PackageState::Ready,
                created_at: String::new(),
            })
        }

        async fn stream_logs(
            &self,
            _app_guid: &str,
            cancel: CancellationToken,
            _warnings: &mut Warnings,
        ) -> ActorResult<LogStreamHandle> {
            *self.cancelled.lock().expect("cancel lock") = Some(cancel);
            let (message_tx, messages) = mpsc::unbounded_channel();
            let (_error_tx, errors) = mpsc::unbounded_channel();
            for line in self.log_lines.iter().cloned() {
                let _ = message_tx.send(LogMessage {
                    message: line,
                    timestamp: Utc::now(),
                    source_type: "STG".to_string(),
                    source_instance: "0".to_string(),
                    stream: LogStream::Out,
                });
            }
            let task = tokio::spawn(async move {
                drop(message_tx);
            });
            Ok(LogStreamHandle {
                messages,
                errors,
                task,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fakes::{FakeStager, StagerCall};
    use super::*;
    use crate::cli::OutputFormat;
    use crate::output::test_support::test_ui;
    use stratus_test_support::fixtures;

    fn app() -> Application {
        serde_json::from_value(fixtures::application("app-guid", "my-app", "space-guid"))
            .expect("app fixture")
    }

    #[tokio::test]
    async fn rolling_start_creates_and_polls_a_deployment() {
        let actor = FakeStager {
            warning: Some("careful".to_string()),
            ..FakeStager::default()
        };
        let mut test = test_ui(OutputFormat::Table, &[]);
        let mut warnings = Warnings::new();

        start_app(
            &actor,
            &mut test.ui,
            &app(),
            DeploymentSource::Revision("revision-guid".to_string()),
            StartOptions {
                strategy: Some(DeploymentStrategy::Rolling),
                no_wait: false,
            },
            &mut warnings,
        )
        .await
        .expect("start should succeed");

        assert_eq!(
            actor.calls(),
            [
                StagerCall::CreateDeployment {
                    app_guid: "app-guid".to_string(),
                    source: DeploymentSource::Revision("revision-guid".to_string()),
                    strategy: Some(DeploymentStrategy::Rolling),
                },
                StagerCall::PollDeployment("deployment-guid".to_string()),
            ]
        );
        assert_eq!(test.err.contents(), "careful\ncareful\n");
    }

    #[tokio::test]
    async fn no_wait_returns_after_submission() {
        let actor = FakeStager::default();
        let mut test = test_ui(OutputFormat::Table, &[]);
        let mut warnings = Warnings::new();

        start_app(
            &actor,
            &mut test.ui,
            &app(),
            DeploymentSource::Droplet("droplet-guid".to_string()),
            StartOptions {
                strategy: None,
                no_wait: true,
            },
            &mut warnings,
        )
        .await
        .expect("start should succeed");

        assert_eq!(
            actor.calls(),
            [
                StagerCall::Stop("app-guid".to_string()),
                StagerCall::SetDroplet("app-guid".to_string(), "droplet-guid".to_string()),
                StagerCall::Start("app-guid".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn failed_deployment_propagates_the_reason() {
        let actor = FakeStager::default();
        *actor.deployment_failure.lock().expect("lock") = Some("CANCELED".to_string());
        let mut test = test_ui(OutputFormat::Table, &[]);
        let mut warnings = Warnings::new();

        let err = start_app(
            &actor,
            &mut test.ui,
            &app(),
            DeploymentSource::Revision("revision-guid".to_string()),
            StartOptions {
                strategy: Some(DeploymentStrategy::Rolling),
                no_wait: false,
            },
            &mut warnings,
        )
        .await
        .expect_err("deployment should fail");

        assert_eq!(err.exit_code(), 3);
        assert!(err.display_message().contains("CANCELED"));
    }

    #[tokio::test]
    async fn warnings_are_shown_before_a_failed_deployment() {
        let actor = FakeStager {
            warning: Some("careful".to_string()),
            ..FakeStager::default()
        };
        *actor.deployment_failure.lock().expect("lock") = Some("CANCELED".to_string());
        let mut test = test_ui(OutputFormat::Table, &[]);
        let mut warnings = Warnings::new();

        let err = start_app(
            &actor,
            &mut test.ui,
            &app(),
            DeploymentSource::Revision("revision-guid".to_string()),
            StartOptions {
                strategy: Some(DeploymentStrategy::Rolling),
                no_wait: false,
            },
            &mut warnings,
        )
        .await
        .expect_err("deployment should fail");

        assert_eq!(err.display_message(), "Deployment failed with reason CANCELED");
        assert_eq!(test.err.contents(), "careful\ncareful\n");
        assert!(warnings.is_empty());
    }

    #[tokio::test]
    async fn staging_streams_logs_then_starts_the_droplet() {
        let actor = FakeStager {
            log_lines: vec!["Downloading buildpack".to_string(), "Uploading droplet".to_string()],
            ..FakeStager::default()
        };
        let mut test = test_ui(OutputFormat::Table, &[]);
        let mut warnings = Warnings::new();

        stage_and_start(
            &actor,
            &mut test.ui,
            &app(),
            "package-guid",
            StartOptions::default(),
            &mut warnings,
        )
        .await
        .expect("restage should succeed");

        let output = test.out.contents();
        assert!(output.contains("[STG/0] OUT Downloading buildpack"));
        assert!(output.contains("[STG/0] OUT Uploading droplet"));
        assert!(output.contains("Waiting for app to start..."));
        let cancel = actor.cancelled.lock().expect("lock").clone().expect("token");
        assert!(cancel.is_cancelled());
        assert_eq!(
            actor.calls(),
            [
                StagerCall::Stage("package-guid".to_string()),
                StagerCall::Stop("app-guid".to_string()),
                StagerCall::SetDroplet("app-guid".to_string(), "droplet-guid".to_string()),
                StagerCall::Start("app-guid".to_string()),
                StagerCall::PollStart("app-guid".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn staging_failure_stops_before_starting() {
        let actor = FakeStager::default();
        *actor.staging_failure.lock().expect("lock") =
            Some("StagingError - no buildpack".to_string());
        let mut test = test_ui(OutputFormat::Table, &[]);
        let mut warnings = Warnings::new();

        let err = stage_and_start(
            &actor,
            &mut test.ui,
            &app(),
            "package-guid",
            StartOptions::default(),
            &mut warnings,
        )
        .await
        .expect_err("staging should fail");

        assert_eq!(err.display_message(), "StagingError - no buildpack");
        assert_eq!(actor.calls(), [StagerCall::Stage("package-guid".to_string())]);
    }
}
