use async_trait::async_trait;
use stratus_actor::{Actor, ActorResult, Warnings};
use stratus_api_models::Revision;
use stratus_config::Config;

use super::{AppLookupActor, space_target};
use crate::cli::{OutputFormat, RevisionsArgs};
use crate::client::CliResult;
use crate::output::Ui;

/// Revision queries used by `revisions`, `revision`, and `rollback`.
#[async_trait]
pub(crate) trait RevisionsActor: AppLookupActor {
    async fn get_revisions(
        &self,
        app_guid: &str,
        warnings: &mut Warnings,
    ) -> ActorResult<Vec<Revision>>;
    async fn get_revision_by_application_and_version(
        &self,
        app_guid: &str,
        version: u64,
        warnings: &mut Warnings,
    ) -> ActorResult<Revision>;
}

#[async_trait]
impl RevisionsActor for Actor {
    async fn get_revisions(
        &self,
        app_guid: &str,
        warnings: &mut Warnings,
    ) -> ActorResult<Vec<Revision>> {
        Self::get_revisions(self, app_guid, warnings).await
    }

    async fn get_revision_by_application_and_version(
        &self,
        app_guid: &str,
        version: u64,
        warnings: &mut Warnings,
    ) -> ActorResult<Revision> {
        Self::get_revision_by_application_and_version(self, app_guid, version, warnings).await
    }
}

pub(crate) async fn handle_revisions<A>(
    actor: &A,
    config: &Config,
    ui: &mut Ui,
    args: RevisionsArgs,
) -> CliResult<()>
where
    A: RevisionsActor + ?Sized,
{
    let target = space_target(config)?;
    let mut warnings = Warnings::new();
    let json = matches!(ui.format(), OutputFormat::Json);

    if !json {
        ui.display_text(&format!(
            "Getting revisions for app {} in org {} / space {} as {}...",
            args.app_name, target.organization, target.space, target.user
        ));
    }
    let app = actor
        .get_application_by_name_and_space(&args.app_name, &target.space_guid, &mut warnings)
        .await;
    ui.display_warnings(&mut warnings);
    let app = app?;

    let revisions = actor.get_revisions(&app.guid, &mut warnings).await;
    ui.display_warnings(&mut warnings);
    let revisions = revisions?;

    if json {
        return ui.display_json(&revisions);
    }
    ui.display_newline();
    if revisions.is_empty() {
        ui.display_text("No revisions found");
        return Ok(());
    }
    ui.display_table(&REVISION_HEADER, revision_rows(&revisions));
    Ok(())
}

pub(crate) const REVISION_HEADER: [&str; 5] =
    ["version", "guid", "description", "deployable", "created at"];

pub(crate) fn revision_rows(revisions: &[Revision]) -> Vec<Vec<String>> {
    revisions
        .iter()
        .map(|revision| {
            vec![
                revision.version.to_string(),
                revision.guid.clone(),
                revision.description.clone().unwrap_or_default(),
                revision.deployable.to_string(),
                revision.created_at.clone(),
            ]
        })
        .collect()
}
