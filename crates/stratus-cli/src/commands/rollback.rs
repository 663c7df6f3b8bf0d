use anyhow::anyhow;
use stratus_actor::{DeploymentSource, Warnings};
use stratus_api_models::DeploymentStrategy;
use stratus_config::Config;

use super::revisions::RevisionsActor;
use super::space_target;
use crate::cli::RollbackArgs;
use crate::client::{CliError, CliResult};
use crate::output::Ui;
use crate::stager::{StagerActor, StartOptions, start_app};

/// Everything `rollback` needs: revision lookup plus the stager.
pub(crate) trait RollbackActor: RevisionsActor + StagerActor {}

impl<T> RollbackActor for T where T: RevisionsActor + StagerActor + ?Sized {}

/// Roll an application back by deploying an earlier revision.
///
/// The deployment creates a new revision numbered one past the newest
/// existing version; declining the confirmation leaves the app untouched.
pub(crate) async fn handle_rollback<A>(
    actor: &A,
    config: &Config,
    ui: &mut Ui,
    args: RollbackArgs,
) -> CliResult<()>
where
    A: RollbackActor + ?Sized,
{
    let target = space_target(config)?;
    let mut warnings = Warnings::new();

    let app = actor
        .get_application_by_name_and_space(&args.app_name, &target.space_guid, &mut warnings)
        .await;
    ui.display_warnings(&mut warnings);
    let app = app?;

    let revisions = actor.get_revisions(&app.guid, &mut warnings).await;
    ui.display_warnings(&mut warnings);
    let revisions = revisions?;
    let Some(newest) = revisions.iter().map(|revision| revision.version).max() else {
        return Err(CliError::failure(anyhow!(
            "No revisions for app {}",
            args.app_name
        )));
    };

    let revision = actor
        .get_revision_by_application_and_version(&app.guid, args.revision, &mut warnings)
        .await;
    ui.display_warnings(&mut warnings);
    let revision = revision?;

    if !args.force {
        ui.display_text(&format!(
            "Rolling '{}' back to revision '{}' will create a new revision. The new revision '{}' will use the settings from revision '{}'.",
            args.app_name,
            revision.version,
            newest + 1,
            revision.version
        ));
        if !ui.confirm("Are you sure you want to continue?")? {
            return Err(CliError::aborted(format!(
                "App '{}' has not been rolled back to revision '{}'.",
                args.app_name, revision.version
            )));
        }
    }

    ui.display_text(&format!(
        "Rolling back to revision {} for app {} in org {} / space {} as {}...",
        revision.version, args.app_name, target.organization, target.space, target.user
    ));
    start_app(
        actor,
        ui,
        &app,
        DeploymentSource::Revision(revision.guid),
        StartOptions {
            strategy: Some(DeploymentStrategy::Rolling),
            no_wait: false,
        },
        &mut warnings,
    )
    .await?;
    ui.display_ok();
    Ok(())
}
