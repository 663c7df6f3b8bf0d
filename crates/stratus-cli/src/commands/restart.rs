use stratus_actor::{DeploymentSource, Warnings};
use stratus_config::Config;

use super::{AppLookupActor, space_target};
use crate::cli::StartArgs;
use crate::client::CliResult;
use crate::output::Ui;
use crate::stager::{StagerActor, StartOptions, start_app};

/// Restart an application on its current droplet.
pub(crate) async fn handle_restart<A>(
    actor: &A,
    config: &Config,
    ui: &mut Ui,
    args: StartArgs,
) -> CliResult<()>
where
    A: AppLookupActor + StagerActor + ?Sized,
{
    let target = space_target(config)?;
    let mut warnings = Warnings::new();

    ui.display_text(&format!(
        "Restarting app {} in org {} / space {} as {}...",
        args.app_name, target.organization, target.space, target.user
    ));
    let app = actor
        .get_application_by_name_and_space(&args.app_name, &target.space_guid, &mut warnings)
        .await;
    ui.display_warnings(&mut warnings);
    let app = app?;

    let droplet = actor.get_current_droplet(&app.guid, &mut warnings).await;
    ui.display_warnings(&mut warnings);
    let droplet = droplet?;

    ui.display_newline();
    start_app(
        actor,
        ui,
        &app,
        DeploymentSource::Droplet(droplet.guid),
        StartOptions {
            strategy: args.strategy.map(Into::into),
            no_wait: args.no_wait,
        },
        &mut warnings,
    )
    .await?;
    ui.display_ok();
    Ok(())
}

#[cfg(test)]
mod tests {
    use stratus_api_models::DeploymentStrategy;

    use super::*;
    use crate::cli::{OutputFormat, StrategyArg};
    use crate::commands::test_support::config_in;
    use crate::output::test_support::test_ui;
    use crate::stager::fakes::{FakeStager, StagerCall};
    use tempfile::TempDir;

    fn args(strategy: Option<StrategyArg>, no_wait: bool) -> StartArgs {
        StartArgs {
            app_name: "my-app".to_string(),
            strategy,
            no_wait,
        }
    }

    #[tokio::test]
    async fn restart_without_strategy_stops_and_starts_the_current_droplet() {
        let home = TempDir::new().expect("tempdir");
        let config = config_in(&home, true);
        let actor = FakeStager::default();
        let mut test = test_ui(OutputFormat::Table, &[]);

        handle_restart(&actor, &config, &mut test.ui, args(None, false))
            .await
            .expect("restart should succeed");

        assert_eq!(
            actor.calls(),
            [
                StagerCall::Stop("app-guid".to_string()),
                StagerCall::SetDroplet(
                    "app-guid".to_string(),
                    "current-droplet-guid".to_string()
                ),
                StagerCall::Start("app-guid".to_string()),
                StagerCall::PollStart("app-guid".to_string()),
            ]
        );
        assert!(test.out.contents().ends_with("OK\n"));
    }

    #[tokio::test]
    async fn rolling_restart_deploys_the_current_droplet() {
        let home = TempDir::new().expect("tempdir");
        let config = config_in(&home, true);
        let actor = FakeStager::default();
        let mut test = test_ui(OutputFormat::Table, &[]);

        handle_restart(
            &actor,
            &config,
            &mut test.ui,
            args(Some(StrategyArg::Rolling), true),
        )
        .await
        .expect("restart should succeed");

        assert_eq!(
            actor.calls(),
            [StagerCall::CreateDeployment {
                app_guid: "app-guid".to_string(),
                source: DeploymentSource::Droplet("current-droplet-guid".to_string()),
                strategy: Some(DeploymentStrategy::Rolling),
            }]
        );
    }
}
