use async_trait::async_trait;
use stratus_actor::{Actor, ActorResult, Warnings};
use stratus_api_models::{Organization, Space};
use stratus_config::{Config, ConfigError};

use crate::cli::TargetArgs;
use crate::client::CliResult;
use crate::output::Ui;

/// Organization and space lookups used by `target`.
#[async_trait]
pub(crate) trait TargetActor: Send + Sync {
    async fn get_organization_by_name(
        &self,
        name: &str,
        warnings: &mut Warnings,
    ) -> ActorResult<Organization>;
    async fn get_space_by_name_and_organization(
        &self,
        name: &str,
        org_guid: &str,
        warnings: &mut Warnings,
    ) -> ActorResult<Space>;
    async fn get_organization_spaces(
        &self,
        org_guid: &str,
        warnings: &mut Warnings,
    ) -> ActorResult<Vec<Space>>;
}

#[async_trait]
impl TargetActor for Actor {
    async fn get_organization_by_name(
        &self,
        name: &str,
        warnings: &mut Warnings,
    ) -> ActorResult<Organization> {
        Self::get_organization_by_name(self, name, warnings).await
    }

    async fn get_space_by_name_and_organization(
        &self,
        name: &str,
        org_guid: &str,
        warnings: &mut Warnings,
    ) -> ActorResult<Space> {
        Self::get_space_by_name_and_organization(self, name, org_guid, warnings).await
    }

    async fn get_organization_spaces(
        &self,
        org_guid: &str,
        warnings: &mut Warnings,
    ) -> ActorResult<Vec<Space>> {
        Self::get_organization_spaces(self, org_guid, warnings).await
    }
}

/// Show the current target, optionally switching organization and space first.
///
/// Targeting an organization that has exactly one space targets that space
/// too. Changes are persisted before the summary is shown.
pub(crate) async fn handle_target<A>(
    actor: &A,
    config: &mut Config,
    ui: &mut Ui,
    args: TargetArgs,
) -> CliResult<()>
where
    A: TargetActor + ?Sized,
{
    config.check_target(false, false)?;
    let user = config.current_user()?;
    let mut warnings = Warnings::new();
    let changed = args.organization.is_some() || args.space.is_some();

    if let Some(org_name) = &args.organization {
        let org = actor.get_organization_by_name(org_name, &mut warnings).await;
        ui.display_warnings(&mut warnings);
        let org = org?;
        config.set_organization(&org.guid, &org.name);

        if args.space.is_none() {
            let spaces = actor.get_organization_spaces(&org.guid, &mut warnings).await;
            ui.display_warnings(&mut warnings);
            if let [only] = spaces?.as_slice() {
                config.set_space(&only.guid, &only.name);
            }
        }
    }

    if let Some(space_name) = &args.space {
        let org_guid = config.organization().guid.clone();
        if org_guid.is_empty() {
            return Err(ConfigError::NoOrganizationTargeted.into());
        }
        let space = actor
            .get_space_by_name_and_organization(space_name, &org_guid, &mut warnings)
            .await;
        ui.display_warnings(&mut warnings);
        let space = space?;
        config.set_space(&space.guid, &space.name);
    }

    if changed {
        config.save()?;
    }

    let organization = config.organization().name.clone();
    let space = config.space().name.clone();
    ui.display_key_values(&[
        ("API endpoint", config.target().to_string()),
        ("user", user.name),
        (
            "org",
            if organization.is_empty() {
                "No org targeted, use 'stratus target -o ORG'".to_string()
            } else {
                organization
            },
        ),
        (
            "space",
            if space.is_empty() {
                "No space targeted, use 'stratus target -s SPACE'".to_string()
            } else {
                space
            },
        ),
    ]);
    Ok(())
}
