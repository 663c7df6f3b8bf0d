use stratus_actor::Warnings;
use stratus_config::Config;

use super::revisions::RevisionsActor;
use super::space_target;
use crate::cli::{OutputFormat, RevisionArgs};
use crate::client::CliResult;
use crate::output::Ui;

pub(crate) async fn handle_revision<A>(
    actor: &A,
    config: &Config,
    ui: &mut Ui,
    args: RevisionArgs,
) -> CliResult<()>
where
    A: RevisionsActor + ?Sized,
{
    let target = space_target(config)?;
    let mut warnings = Warnings::new();
    let json = matches!(ui.format(), OutputFormat::Json);

    if !json {
        ui.display_text(&format!(
            "Showing revision {} for app {} in org {} / space {} as {}...",
            args.version, args.app_name, target.organization, target.space, target.user
        ));
    }
    let app = actor
        .get_application_by_name_and_space(&args.app_name, &target.space_guid, &mut warnings)
        .await;
    ui.display_warnings(&mut warnings);
    let app = app?;

    let revision = actor
        .get_revision_by_application_and_version(&app.guid, args.version, &mut warnings)
        .await;
    ui.display_warnings(&mut warnings);
    let revision = revision?;

    if json {
        return ui.display_json(&revision);
    }
    ui.display_newline();
    ui.display_key_values(&[
        ("version", revision.version.to_string()),
        ("guid", revision.guid),
        ("description", revision.description.unwrap_or_default()),
        ("deployable", revision.deployable.to_string()),
        ("created at", revision.created_at),
    ]);
    Ok(())
}
