use stratus_actor::Warnings;
use stratus_config::Config;

use super::{AppLookupActor, space_target};
use crate::cli::StartArgs;
use crate::client::CliResult;
use crate::output::Ui;
use crate::stager::{StagerActor, StartOptions, stage_and_start};

/// Stage the newest ready package again and start the resulting droplet.
pub(crate) async fn handle_restage<A>(
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
        "Restaging app {} in org {} / space {} as {}...",
        args.app_name, target.organization, target.space, target.user
    ));
    let app = actor
        .get_application_by_name_and_space(&args.app_name, &target.space_guid, &mut warnings)
        .await;
    ui.display_warnings(&mut warnings);
    let app = app?;

    let package = actor
        .get_newest_ready_package(&app.guid, &mut warnings)
        .await;
    ui.display_warnings(&mut warnings);
    let package = package?;

    ui.display_newline();
    stage_and_start(
        actor,
        ui,
        &app,
        &package.guid,
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
