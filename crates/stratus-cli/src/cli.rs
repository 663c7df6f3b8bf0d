//! Argument parsing, context construction, and command dispatch.

use std::time::Duration;

use anyhow::anyhow;
use clap::{Args, Parser, Subcommand, ValueEnum};
use reqwest::Url;
use stratus_actor::{Actor, ActorConfig};
use stratus_api_models::DeploymentStrategy;
use stratus_client::{ClientConfig, CloudControllerClient};
use stratus_config::Config;
use stratus_telemetry::{LogFormat, LoggingConfig, build_sha, init_logging, level_for};
use tracing::Instrument;
use uuid::Uuid;

use crate::client::{AppContext, CliError, CliResult, TelemetryEmitter, parse_url};
use crate::commands::org_quotas::{handle_create_org_quota, handle_org_quota, handle_org_quotas};
use crate::commands::restage::handle_restage;
use crate::commands::restart::handle_restart;
use crate::commands::revision::handle_revision;
use crate::commands::revisions::handle_revisions;
use crate::commands::rollback::handle_rollback;
use crate::commands::target::handle_target;
use crate::output::Ui;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const ENV_TRACE: &str = "STRATUS_TRACE";
const BUILD_SHA: &str = match option_env!("STRATUS_BUILD_SHA") {
    Some(sha) => sha,
    None => "dev",
};

/// Parses CLI arguments, executes the requested command, and handles
/// user-facing telemetry emission. Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    let command_name = command_label(&cli.command);
    let trace_id = Uuid::new_v4().to_string();
    let mut ui = Ui::stdio(cli.output);

    if let Err(err) = init_tracing(&cli) {
        ui.display_error(&err.display_message());
        return err.exit_code();
    }
    let telemetry = TelemetryEmitter::from_env();

    let span = tracing::info_span!(
        "command",
        name = command_name,
        trace_id = %trace_id,
        build_sha = build_sha(),
    );
    let result = dispatch(cli, &trace_id, &mut ui).instrument(span).await;

    let (exit_code, message, outcome) = match result {
        Ok(()) => (0, None, "success"),
        Err(err) => {
            let exit_code = err.exit_code();
            let message = err.display_message();
            if matches!(err, CliError::Aborted(_)) {
                ui.display_text(&message);
            } else {
                ui.display_error(&message);
            }
            (exit_code, Some(message), err.outcome())
        }
    };

    if let Some(emitter) = &telemetry {
        emitter
            .emit(
                &trace_id,
                command_name,
                outcome,
                exit_code,
                message.as_deref(),
            )
            .await;
    }

    exit_code
}

fn init_tracing(cli: &Cli) -> CliResult<()> {
    let format: LogFormat = cli
        .log_format
        .parse()
        .map_err(|err| CliError::validation(format!("{err}")))?;
    let trace = std::env::var(ENV_TRACE).is_ok_and(|value| value.eq_ignore_ascii_case("true"));
    init_logging(&LoggingConfig {
        level: level_for(trace),
        format,
        build_sha: BUILD_SHA,
    })
    .map_err(|err| CliError::failure(anyhow!("failed to initialise logging: {err}")))
}

async fn dispatch(cli: Cli, trace_id: &str, ui: &mut Ui) -> CliResult<()> {
    let mut ctx = build_context(&cli, trace_id)?;

    match cli.command {
        Command::Revisions(args) => handle_revisions(&ctx.actor, &ctx.config, ui, args).await,
        Command::Revision(args) => handle_revision(&ctx.actor, &ctx.config, ui, args).await,
        Command::Rollback(args) => handle_rollback(&ctx.actor, &ctx.config, ui, args).await,
        Command::Restart(args) => handle_restart(&ctx.actor, &ctx.config, ui, args).await,
        Command::Restage(args) => handle_restage(&ctx.actor, &ctx.config, ui, args).await,
        Command::OrgQuotas => handle_org_quotas(&ctx.actor, &ctx.config, ui).await,
        Command::OrgQuota(args) => handle_org_quota(&ctx.actor, &ctx.config, ui, args).await,
        Command::CreateOrgQuota(args) => {
            handle_create_org_quota(&ctx.actor, &ctx.config, ui, args).await
        }
        Command::Target(args) => handle_target(&ctx.actor, &mut ctx.config, ui, args).await,
    }
}

/// Load the config, apply command-line overrides, and wire the actor.
fn build_context(cli: &Cli, trace_id: &str) -> CliResult<AppContext> {
    let mut config = Config::load()?;
    config.apply_overrides(
        cli.api_url.as_ref().map(ToString::to_string),
        cli.access_token.clone(),
    );

    // Commands report a missing login themselves; fall back to a placeholder
    // endpoint so the client can still be built.
    let api_url = if config.target().is_empty() {
        Url::parse("http://localhost")
            .map_err(|err| CliError::failure(anyhow!("invalid placeholder URL: {err}")))?
    } else {
        parse_url(config.target()).map_err(CliError::validation)?
    };
    let access_token = Some(config.access_token())
        .filter(|token| !token.is_empty())
        .map(str::to_string);

    let client = CloudControllerClient::new(&ClientConfig {
        api_url,
        access_token,
        request_id: trace_id.to_string(),
        timeout: Duration::from_secs(cli.timeout),
        skip_ssl_validation: config.skip_ssl_validation(),
    })
    .map_err(|err| CliError::failure(anyhow!("failed to build HTTP client: {err}")))?;

    let actor = Actor::new(
        client,
        ActorConfig {
            poll_interval: config.poll_interval(),
            staging_timeout: config.staging_timeout(),
            startup_timeout: config.startup_timeout(),
            ..ActorConfig::default()
        },
    );
    Ok(AppContext { actor, config })
}

#[derive(Parser)]
#[command(name = "stratus", about = "Command-line client for the Stratus application platform")]
struct Cli {
    #[arg(long, global = true, env = "STRATUS_API_URL", value_parser = parse_url)]
    api_url: Option<Url>,
    #[arg(long, global = true, env = "STRATUS_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,
    #[arg(
        long,
        global = true,
        env = "STRATUS_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    timeout: u64,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    output: OutputFormat,
    #[arg(
        long,
        global = true,
        env = "STRATUS_LOG_FORMAT",
        default_value = "pretty",
        help = "Diagnostic log format: pretty or json"
    )]
    log_format: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List revisions of an app
    Revisions(RevisionsArgs),
    /// Show one revision of an app
    Revision(RevisionArgs),
    /// Roll an app back to an earlier revision
    Rollback(RollbackArgs),
    /// Stop and start an app on its current droplet
    Restart(StartArgs),
    /// Stage an app's newest package and start the new droplet
    Restage(StartArgs),
    /// List organization quotas
    OrgQuotas,
    /// Show one organization quota
    OrgQuota(OrgQuotaArgs),
    /// Define a new organization quota
    CreateOrgQuota(CreateOrgQuotaArgs),
    /// Show or set the targeted org and space
    Target(TargetArgs),
}

#[derive(Args)]
pub(crate) struct RevisionsArgs {
    #[arg(help = "Name of the app")]
    pub(crate) app_name: String,
}

#[derive(Args)]
pub(crate) struct RevisionArgs {
    #[arg(help = "Name of the app")]
    pub(crate) app_name: String,
    #[arg(long, help = "Revision version to show")]
    pub(crate) version: u64,
}

#[derive(Args)]
pub(crate) struct RollbackArgs {
    #[arg(help = "Name of the app")]
    pub(crate) app_name: String,
    #[arg(long, help = "Revision version to roll back to")]
    pub(crate) revision: u64,
    #[arg(short = 'f', long, help = "Skip the confirmation prompt")]
    pub(crate) force: bool,
}

#[derive(Args)]
pub(crate) struct StartArgs {
    #[arg(help = "Name of the app")]
    pub(crate) app_name: String,
    #[arg(long, value_enum, help = "Deployment strategy; omit to stop and start")]
    pub(crate) strategy: Option<StrategyArg>,
    #[arg(long, help = "Return once the operation is submitted")]
    pub(crate) no_wait: bool,
}

#[derive(Args)]
pub(crate) struct OrgQuotaArgs {
    #[arg(help = "Name of the quota")]
    pub(crate) name: String,
}

#[derive(Args)]
pub(crate) struct CreateOrgQuotaArgs {
    #[arg(help = "Name of the quota")]
    pub(crate) name: String,
    #[arg(
        short = 'm',
        long,
        allow_hyphen_values = true,
        help = "Total memory across all apps, e.g. 1G or 512M; -1 for unlimited"
    )]
    pub(crate) total_memory: Option<String>,
    #[arg(
        short = 'i',
        long,
        allow_hyphen_values = true,
        help = "Maximum memory per app instance; -1 for unlimited"
    )]
    pub(crate) instance_memory: Option<String>,
    #[arg(
        short = 'a',
        long,
        allow_hyphen_values = true,
        help = "Total app instances; -1 for unlimited"
    )]
    pub(crate) app_instances: Option<i64>,
    #[arg(
        short = 's',
        long,
        allow_hyphen_values = true,
        help = "Total service instances; -1 for unlimited"
    )]
    pub(crate) service_instances: Option<i64>,
    #[arg(long, help = "Allow provisioning instances of paid service plans")]
    pub(crate) allow_paid_service_plans: bool,
    #[arg(
        short = 'r',
        long,
        allow_hyphen_values = true,
        help = "Total routes; -1 for unlimited"
    )]
    pub(crate) routes: Option<i64>,
    #[arg(
        long,
        allow_hyphen_values = true,
        help = "Total reserved route ports; -1 for unlimited"
    )]
    pub(crate) reserved_route_ports: Option<i64>,
}

#[derive(Args)]
pub(crate) struct TargetArgs {
    #[arg(short = 'o', long = "org", help = "Organization to target")]
    pub(crate) organization: Option<String>,
    #[arg(short = 's', long, help = "Space to target")]
    pub(crate) space: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum StrategyArg {
    Rolling,
}

impl From<StrategyArg> for DeploymentStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Rolling => Self::Rolling,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Revisions(_) => "revisions",
        Command::Revision(_) => "revision",
        Command::Rollback(_) => "rollback",
        Command::Restart(_) => "restart",
        Command::Restage(_) => "restage",
        Command::OrgQuotas => "org_quotas",
        Command::OrgQuota(_) => "org_quota",
        Command::CreateOrgQuota(_) => "create_org_quota",
        Command::Target(_) => "target",
    }
}
