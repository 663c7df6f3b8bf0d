use async_trait::async_trait;
use stratus_actor::{Actor, ActorResult, Warnings};
use stratus_api_models::{AppLimit, OrganizationQuota, RouteLimit, ServiceLimit};
use stratus_config::Config;

use crate::cli::{CreateOrgQuotaArgs, OrgQuotaArgs, OutputFormat};
use crate::client::{CliError, CliResult};
use crate::output::{Ui, format_allowed, format_limit, format_memory};

/// Organization quota operations.
#[async_trait]
pub(crate) trait OrgQuotaActor: Send + Sync {
    async fn get_organization_quotas(
        &self,
        warnings: &mut Warnings,
    ) -> ActorResult<Vec<OrganizationQuota>>;
    async fn get_organization_quota_by_name(
        &self,
        name: &str,
        warnings: &mut Warnings,
    ) -> ActorResult<OrganizationQuota>;
    async fn create_organization_quota(
        &self,
        quota: &OrganizationQuota,
        warnings: &mut Warnings,
    ) -> ActorResult<OrganizationQuota>;
}

#[async_trait]
impl OrgQuotaActor for Actor {
    async fn get_organization_quotas(
        &self,
        warnings: &mut Warnings,
    ) -> ActorResult<Vec<OrganizationQuota>> {
        Self::get_organization_quotas(self, warnings).await
    }

    async fn get_organization_quota_by_name(
        &self,
        name: &str,
        warnings: &mut Warnings,
    ) -> ActorResult<OrganizationQuota> {
        Self::get_organization_quota_by_name(self, name, warnings).await
    }

    async fn create_organization_quota(
        &self,
        quota: &OrganizationQuota,
        warnings: &mut Warnings,
    ) -> ActorResult<OrganizationQuota> {
        Self::create_organization_quota(self, quota, warnings).await
    }
}

const QUOTA_HEADER: [&str; 8] = [
    "name",
    "total memory",
    "instance memory",
    "routes",
    "service instances",
    "paid service plans",
    "app instances",
    "route ports",
];

pub(crate) async fn handle_org_quotas<A>(actor: &A, config: &Config, ui: &mut Ui) -> CliResult<()>
where
    A: OrgQuotaActor + ?Sized,
{
    config.check_target(false, false)?;
    let user = config.current_user()?;
    let mut warnings = Warnings::new();
    let json = matches!(ui.format(), OutputFormat::Json);

    if !json {
        ui.display_text(&format!("Getting org quotas as {}...", user.name));
    }
    let quotas = actor.get_organization_quotas(&mut warnings).await;
    ui.display_warnings(&mut warnings);
    let quotas = quotas?;

    if json {
        return ui.display_json(&quotas);
    }
    ui.display_newline();
    if quotas.is_empty() {
        ui.display_text("No organization quotas found.");
        return Ok(());
    }
    let rows = quotas.iter().map(quota_row).collect();
    ui.display_table(&QUOTA_HEADER, rows);
    Ok(())
}

pub(crate) async fn handle_org_quota<A>(
    actor: &A,
    config: &Config,
    ui: &mut Ui,
    args: OrgQuotaArgs,
) -> CliResult<()>
where
    A: OrgQuotaActor + ?Sized,
{
    config.check_target(false, false)?;
    let user = config.current_user()?;
    let mut warnings = Warnings::new();
    let json = matches!(ui.format(), OutputFormat::Json);

    if !json {
        ui.display_text(&format!(
            "Getting org quota {} as {}...",
            args.name, user.name
        ));
    }
    let quota = actor
        .get_organization_quota_by_name(&args.name, &mut warnings)
        .await;
    ui.display_warnings(&mut warnings);
    let quota = quota?;

    if json {
        return ui.display_json(&quota);
    }
    ui.display_newline();
    let row = quota_row(&quota);
    let pairs: Vec<(&str, String)> = QUOTA_HEADER
        .iter()
        .copied()
        .zip(row)
        .skip(1)
        .collect();
    ui.display_key_values(&pairs);
    Ok(())
}

pub(crate) async fn handle_create_org_quota<A>(
    actor: &A,
    config: &Config,
    ui: &mut Ui,
    args: CreateOrgQuotaArgs,
) -> CliResult<()>
where
    A: OrgQuotaActor + ?Sized,
{
    config.check_target(false, false)?;
    let user = config.current_user()?;
    let quota = quota_from_args(args)?;
    let mut warnings = Warnings::new();

    ui.display_text(&format!("Creating org quota {} as {}...", quota.name, user.name));
    let created = actor.create_organization_quota(&quota, &mut warnings).await;
    ui.display_warnings(&mut warnings);
    created?;
    ui.display_ok();
    Ok(())
}

fn quota_row(quota: &OrganizationQuota) -> Vec<String> {
    vec![
        quota.name.clone(),
        format_memory(quota.apps.total_memory_in_mb),
        format_memory(quota.apps.per_process_memory_in_mb),
        format_limit(quota.routes.total_routes),
        format_limit(quota.services.total_service_instances),
        format_allowed(quota.services.paid_services_allowed).to_string(),
        format_limit(quota.apps.total_instances),
        format_limit(quota.routes.total_reserved_ports),
    ]
}

fn quota_from_args(args: CreateOrgQuotaArgs) -> CliResult<OrganizationQuota> {
    Ok(OrganizationQuota {
        guid: String::new(),
        name: args.name,
        apps: AppLimit {
            total_memory_in_mb: args
                .total_memory
                .as_deref()
                .map(parse_memory)
                .transpose()?
                .flatten(),
            per_process_memory_in_mb: args
                .instance_memory
                .as_deref()
                .map(parse_memory)
                .transpose()?
                .flatten(),
            total_instances: parse_count("app instances", args.app_instances)?,
        },
        services: ServiceLimit {
            total_service_instances: parse_count("service instances", args.service_instances)?,
            paid_services_allowed: args.allow_paid_service_plans,
        },
        routes: RouteLimit {
            total_routes: parse_count("routes", args.routes)?,
            total_reserved_ports: parse_count("reserved route ports", args.reserved_route_ports)?,
        },
    })
}

/// Parse a memory amount such as `512M`, `1GB`, or `-1` (unlimited) into megabytes.
pub(crate) fn parse_memory(input: &str) -> CliResult<Option<u64>> {
    let trimmed = input.trim();
    if trimmed == "-1" {
        return Ok(None);
    }
    let upper = trimmed.to_ascii_uppercase();
    let (digits, multiplier) = if let Some(value) = upper
        .strip_suffix("GB")
        .or_else(|| upper.strip_suffix('G'))
    {
        (value, 1024)
    } else if let Some(value) = upper
        .strip_suffix("MB")
        .or_else(|| upper.strip_suffix('M'))
    {
        (value, 1)
    } else {
        return Err(invalid_memory(input));
    };
    let amount: u64 = digits.parse().map_err(|_| invalid_memory(input))?;
    amount
        .checked_mul(multiplier)
        .map(Some)
        .ok_or_else(|| invalid_memory(input))
}

fn invalid_memory(input: &str) -> CliError {
    CliError::validation(format!(
        "invalid memory limit '{input}': use an integer followed by M, MB, G, or GB, or -1 for unlimited"
    ))
}

/// `-1` means unlimited; other negative values are rejected.
fn parse_count(label: &str, value: Option<i64>) -> CliResult<Option<u64>> {
    match value {
        None | Some(-1) => Ok(None),
        Some(value) => u64::try_from(value).map(Some).map_err(|_| {
            CliError::validation(format!(
                "invalid {label} limit '{value}': use a non-negative integer or -1 for unlimited"
            ))
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use stratus_actor::ActorError;
    use stratus_test_support::fixtures;
    use tempfile::TempDir;

    use super::*;
    use crate::commands::test_support::config_in;
    use crate::output::test_support::test_ui;

    #[derive(Default)]
    struct FakeQuotas {
        quotas: Vec<OrganizationQuota>,
        created: Mutex<Vec<OrganizationQuota>>,
    }

    impl FakeQuotas {
        fn with(quotas: &[(&str, Option<u64>)]) -> Self {
            Self {
                quotas: quotas
                    .iter()
                    .map(|(name, memory)| {
                        serde_json::from_value(fixtures::organization_quota(
                            &format!("{name}-guid"),
                            name,
                            *memory,
                        ))
                        .expect("quota fixture")
                    })
                    .collect(),
                created: Mutex::default(),
            }
        }
    }

    #[async_trait]
    impl OrgQuotaActor for FakeQuotas {
        async fn get_organization_quotas(
            &self,
            warnings: &mut Warnings,
        ) -> ActorResult<Vec<OrganizationQuota>> {
            warnings.push("quota listing is slow".to_string());
            Ok(self.quotas.clone())
        }

        async fn get_organization_quota_by_name(
            &self,
            name: &str,
            _warnings: &mut Warnings,
        ) -> ActorResult<OrganizationQuota> {
            self.quotas
                .iter()
                .find(|quota| quota.name == name)
                .cloned()
                .ok_or_else(|| ActorError::QuotaNotFound {
                    name: name.to_string(),
                })
        }

        async fn create_organization_quota(
            &self,
            quota: &OrganizationQuota,
            _warnings: &mut Warnings,
        ) -> ActorResult<OrganizationQuota> {
            self.created.lock().expect("lock").push(quota.clone());
            Ok(quota.clone())
        }
    }

    fn create_args(name: &str) -> CreateOrgQuotaArgs {
        CreateOrgQuotaArgs {
            name: name.to_string(),
            total_memory: None,
            instance_memory: None,
            app_instances: None,
            service_instances: None,
            allow_paid_service_plans: false,
            routes: None,
            reserved_route_ports: None,
        }
    }

    #[test]
    fn memory_accepts_units_and_unlimited() {
        assert_eq!(parse_memory("512M").ok(), Some(Some(512)));
        assert_eq!(parse_memory("512mb").ok(), Some(Some(512)));
        assert_eq!(parse_memory("2G").ok(), Some(Some(2048)));
        assert_eq!(parse_memory("1GB").ok(), Some(Some(1024)));
        assert_eq!(parse_memory("-1").ok(), Some(None));
        let err = parse_memory("12").expect_err("unit is required");
        assert_eq!(err.exit_code(), 2);
        assert!(parse_memory("lotsG").is_err());
    }

    #[tokio::test]
    async fn lists_quotas_with_unlimited_values() {
        let home = TempDir::new().expect("tempdir");
        let config = config_in(&home, false);
        let actor = FakeQuotas::with(&[("default", Some(10_240)), ("runaway", None)]);
        let mut test = test_ui(OutputFormat::Table, &[]);

        handle_org_quotas(&actor, &config, &mut test.ui)
            .await
            .expect("listing should succeed");

        let output = test.out.contents();
        assert!(output.starts_with("Getting org quotas as steve...\n"));
        assert!(output.contains("paid service plans"));
        let default_line = output
            .lines()
            .find(|line| line.contains("default"))
            .expect("default row");
        assert!(default_line.contains("10G"));
        let runaway_line = output
            .lines()
            .find(|line| line.contains("runaway"))
            .expect("runaway row");
        assert!(runaway_line.contains("unlimited"));
        assert_eq!(test.err.contents(), "quota listing is slow\n");
    }

    #[tokio::test]
    async fn missing_quota_is_reported_by_name() {
        let home = TempDir::new().expect("tempdir");
        let config = config_in(&home, false);
        let actor = FakeQuotas::with(&[("default", Some(1024))]);
        let mut test = test_ui(OutputFormat::Table, &[]);

        let err = handle_org_quota(
            &actor,
            &config,
            &mut test.ui,
            OrgQuotaArgs {
                name: "ghost".to_string(),
            },
        )
        .await
        .expect_err("unknown quota should fail");

        assert_eq!(err.exit_code(), 3);
        assert!(err.display_message().contains("'ghost'"));
    }

    #[tokio::test]
    async fn shows_a_single_quota() {
        let home = TempDir::new().expect("tempdir");
        let config = config_in(&home, false);
        let actor = FakeQuotas::with(&[("default", Some(1024))]);
        let mut test = test_ui(OutputFormat::Table, &[]);

        handle_org_quota(
            &actor,
            &config,
            &mut test.ui,
            OrgQuotaArgs {
                name: "default".to_string(),
            },
        )
        .await
        .expect("quota should be shown");

        assert!(test.out.contents().contains("total memory:         1G"));
    }

    #[tokio::test]
    async fn create_maps_flags_to_limits() {
        let home = TempDir::new().expect("tempdir");
        let config = config_in(&home, false);
        let actor = FakeQuotas::default();
        let mut test = test_ui(OutputFormat::Table, &[]);
        let args = CreateOrgQuotaArgs {
            total_memory: Some("2G".to_string()),
            instance_memory: Some("-1".to_string()),
            app_instances: Some(-1),
            service_instances: Some(10),
            allow_paid_service_plans: true,
            routes: Some(20),
            ..create_args("small")
        };

        handle_create_org_quota(&actor, &config, &mut test.ui, args)
            .await
            .expect("create should succeed");

        let created = actor.created.lock().expect("lock").clone();
        assert_eq!(created.len(), 1);
        let quota = &created[0];
        assert_eq!(quota.name, "small");
        assert_eq!(quota.apps.total_memory_in_mb, Some(2048));
        assert_eq!(quota.apps.per_process_memory_in_mb, None);
        assert_eq!(quota.apps.total_instances, None);
        assert_eq!(quota.services.total_service_instances, Some(10));
        assert!(quota.services.paid_services_allowed);
        assert_eq!(quota.routes.total_routes, Some(20));
        assert_eq!(quota.routes.total_reserved_ports, None);
        assert!(test.out.contents().ends_with("OK\n"));
    }

    #[tokio::test]
    async fn invalid_limits_are_rejected_before_any_request() {
        let home = TempDir::new().expect("tempdir");
        let config = config_in(&home, false);
        let actor = FakeQuotas::default();
        let mut test = test_ui(OutputFormat::Table, &[]);
        let args = CreateOrgQuotaArgs {
            routes: Some(-5),
            ..create_args("broken")
        };

        let err = handle_create_org_quota(&actor, &config, &mut test.ui, args)
            .await
            .expect_err("negative limit should fail");

        assert_eq!(err.exit_code(), 2);
        assert!(actor.created.lock().expect("lock").is_empty());
    }
}
