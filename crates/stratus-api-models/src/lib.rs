#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Shared JSON DTOs for the Stratus control-plane API.
//!
//! Field names follow the `/v3` wire format. Values the server reports as
//! `null` (for example unlimited quota limits) are modelled as `Option`s, and
//! lifecycle states carry an `Unknown` fallback so newer servers do not break
//! decoding.

use std::collections::HashMap;

use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Single entry of the structured error body returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct V3Error {
    /// Numeric error code.
    pub code: i64,
    /// Error title, e.g. `CF-ResourceNotFound`.
    pub title: String,
    /// Human-readable description.
    #[serde(default)]
    pub detail: String,
}

/// Error envelope: `{"errors": [...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorEnvelope {
    /// Individual errors reported by the server.
    #[serde(default)]
    pub errors: Vec<V3Error>,
}

/// Hyperlink object used throughout the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Link {
    /// Absolute URL of the linked resource.
    pub href: String,
}

/// Pagination block of a list envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    /// Total number of results across all pages.
    #[serde(default)]
    pub total_results: u64,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u64,
    /// Link to the next page; absent on the last page.
    #[serde(default)]
    pub next: Option<Link>,
}

/// Envelope returned by every list endpoint.
///
/// Items stay untyped here; the list fetcher decodes them into the expected
/// resource so it can report schema drift per item.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PaginatedEnvelope {
    /// Pagination metadata.
    #[serde(default)]
    pub pagination: Pagination,
    /// Raw resources on this page.
    #[serde(default)]
    pub resources: Vec<Value>,
}

/// Reference to another resource by GUID.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GuidRef {
    /// GUID of the referenced resource.
    pub guid: String,
}

impl GuidRef {
    /// Build a reference from any string-like GUID.
    #[must_use]
    pub fn new(guid: impl Into<String>) -> Self {
        Self { guid: guid.into() }
    }
}

/// To-one relationship: `{"data": {"guid": "..."}}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToOneRelationship {
    /// Related resource, `null` when unset.
    #[serde(default)]
    pub data: Option<GuidRef>,
}

impl ToOneRelationship {
    /// Relationship pointing at `guid`.
    #[must_use]
    pub fn to(guid: impl Into<String>) -> Self {
        Self {
            data: Some(GuidRef::new(guid)),
        }
    }

    /// GUID of the related resource, if any.
    #[must_use]
    pub fn guid(&self) -> Option<&str> {
        self.data.as_ref().map(|data| data.guid.as_str())
    }
}

/// Relationships of an application.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApplicationRelationships {
    /// Owning space.
    #[serde(default)]
    pub space: ToOneRelationship,
}

/// Application resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Application {
    /// Stable identifier.
    pub guid: String,
    /// Name, unique within a space.
    pub name: String,
    /// Desired state (`STARTED` / `STOPPED`).
    #[serde(default)]
    pub state: String,
    /// Related resources.
    #[serde(default)]
    pub relationships: ApplicationRelationships,
}

impl Application {
    /// GUID of the owning space, when reported.
    #[must_use]
    pub fn space_guid(&self) -> Option<&str> {
        self.relationships.space.guid()
    }
}

/// Point-in-time configuration snapshot of an application.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Revision {
    /// Stable identifier.
    pub guid: String,
    /// Ordinal, increasing per application.
    pub version: u64,
    /// Server-generated summary of what changed.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the revision can be deployed.
    #[serde(default)]
    pub deployable: bool,
    /// Creation timestamp as reported by the server.
    #[serde(default)]
    pub created_at: String,
}

/// Droplet lifecycle states.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DropletState {
    /// Droplet is being produced.
    AwaitingUpload,
    /// Bits are being processed.
    ProcessingUpload,
    /// Staging in progress.
    Staging,
    /// Ready to run.
    Staged,
    /// Staging failed.
    Failed,
    /// Droplet expired.
    Expired,
    /// State not known to this client.
    #[default]
    #[serde(other)]
    Unknown,
}

/// Compiled artifact used to run application instances.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Droplet {
    /// Stable identifier.
    pub guid: String,
    /// Lifecycle state.
    #[serde(default)]
    pub state: DropletState,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: String,
}

/// Package lifecycle states.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PackageState {
    /// Waiting for bits.
    AwaitingUpload,
    /// Bits are being processed.
    ProcessingUpload,
    /// Ready to be staged.
    Ready,
    /// Upload or copy failed.
    Failed,
    /// Package is being copied from another app.
    Copying,
    /// Package expired.
    Expired,
    /// State not known to this client.
    #[default]
    #[serde(other)]
    Unknown,
}

impl PackageState {
    /// Wire representation used in `states` query filters.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AwaitingUpload => "AWAITING_UPLOAD",
            Self::ProcessingUpload => "PROCESSING_UPLOAD",
            Self::Ready => "READY",
            Self::Failed => "FAILED",
            Self::Copying => "COPYING",
            Self::Expired => "EXPIRED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// Source package of an application.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Package {
    /// Stable identifier.
    pub guid: String,
    /// Package type (`bits` or `docker`).
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Lifecycle state.
    #[serde(default)]
    pub state: PackageState,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: String,
}

/// Build lifecycle states.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildState {
    /// Staging in progress.
    Staging,
    /// Staging finished and produced a droplet.
    Staged,
    /// Staging failed.
    Failed,
    /// State not known to this client.
    #[default]
    #[serde(other)]
    Unknown,
}

/// Staging build of a package.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Build {
    /// Stable identifier.
    pub guid: String,
    /// Lifecycle state.
    #[serde(default)]
    pub state: BuildState,
    /// Failure reason when `state` is `FAILED`.
    #[serde(default)]
    pub error: Option<String>,
    /// Resulting droplet once staged.
    #[serde(default)]
    pub droplet: Option<GuidRef>,
}

/// Body of `POST /v3/builds`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateBuildRequest {
    /// Package to stage.
    pub package: GuidRef,
}

/// Deployment strategies supported by the platform.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentStrategy {
    /// Replace instances incrementally.
    Rolling,
}

impl DeploymentStrategy {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rolling => "rolling",
        }
    }
}

/// Coarse deployment status value.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeploymentStatusValue {
    /// Deployment is still progressing.
    Active,
    /// Deployment reached a terminal state; see the reason.
    Finalized,
    /// Value not known to this client.
    #[default]
    #[serde(other)]
    Unknown,
}

/// Deployment status reason reported once a deployment finished successfully.
pub const DEPLOYMENT_REASON_DEPLOYED: &str = "DEPLOYED";

/// Status of a deployment.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeploymentStatus {
    /// Coarse status value.
    #[serde(default)]
    pub value: DeploymentStatusValue,
    /// Reason qualifying the value (`DEPLOYING`, `DEPLOYED`, `CANCELED`, ...).
    #[serde(default)]
    pub reason: Option<String>,
}

/// Revision reference embedded in a deployment.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeploymentRevision {
    /// Revision GUID.
    pub guid: String,
    /// Revision version.
    #[serde(default)]
    pub version: u64,
}

/// Deployment resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deployment {
    /// Stable identifier.
    pub guid: String,
    /// Current status.
    #[serde(default)]
    pub status: DeploymentStatus,
    /// Strategy in use.
    #[serde(default)]
    pub strategy: Option<DeploymentStrategy>,
    /// Droplet being deployed.
    #[serde(default)]
    pub droplet: Option<GuidRef>,
    /// Revision being deployed.
    #[serde(default)]
    pub revision: Option<DeploymentRevision>,
}

/// Relationships block of a deployment creation request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeploymentRelationships {
    /// Application being deployed.
    pub app: ToOneRelationship,
}

/// Body of `POST /v3/deployments`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateDeploymentRequest {
    /// Droplet to deploy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub droplet: Option<GuidRef>,
    /// Revision to deploy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<GuidRef>,
    /// Strategy; the server default applies when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<DeploymentStrategy>,
    /// Target application.
    pub relationships: DeploymentRelationships,
}

/// Process of an application (e.g. `web`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Process {
    /// Stable identifier.
    pub guid: String,
    /// Process type.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Desired instance count.
    #[serde(default)]
    pub instances: u32,
}

/// Runtime state of a single process instance.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessInstanceState {
    /// Instance is serving.
    Running,
    /// Instance crashed.
    Crashed,
    /// Instance is starting.
    Starting,
    /// Instance is down.
    Down,
    /// State not known to this client.
    #[default]
    #[serde(other)]
    Unknown,
}

/// One entry of `GET /v3/processes/:guid/stats`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProcessInstance {
    /// Instance index.
    #[serde(default)]
    pub index: u32,
    /// Runtime state.
    #[serde(default)]
    pub state: ProcessInstanceState,
    /// Additional detail (e.g. crash reason).
    #[serde(default)]
    pub details: Option<String>,
}

/// Response of the process stats endpoint (not paginated).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProcessStatsResponse {
    /// Instance entries.
    #[serde(default)]
    pub resources: Vec<ProcessInstance>,
}

/// Organization resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Organization {
    /// Stable identifier.
    pub guid: String,
    /// Name.
    pub name: String,
}

/// Relationships of a space.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpaceRelationships {
    /// Owning organization.
    #[serde(default)]
    pub organization: ToOneRelationship,
}

/// Space resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Space {
    /// Stable identifier.
    pub guid: String,
    /// Name, unique within an organization.
    pub name: String,
    /// Related resources.
    #[serde(default)]
    pub relationships: SpaceRelationships,
}

/// Application limits of an organization quota. `None` means unlimited.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppLimit {
    /// Memory across all instances, in MB.
    #[serde(default)]
    pub total_memory_in_mb: Option<u64>,
    /// Memory per process instance, in MB.
    #[serde(default)]
    pub per_process_memory_in_mb: Option<u64>,
    /// Total application instances.
    #[serde(default)]
    pub total_instances: Option<u64>,
}

/// Service limits of an organization quota.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceLimit {
    /// Total service instances; `None` means unlimited.
    #[serde(default)]
    pub total_service_instances: Option<u64>,
    /// Whether paid plans may be provisioned.
    #[serde(default)]
    pub paid_services_allowed: bool,
}

/// Route limits of an organization quota. `None` means unlimited.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouteLimit {
    /// Total routes.
    #[serde(default)]
    pub total_routes: Option<u64>,
    /// Total reserved route ports.
    #[serde(default)]
    pub total_reserved_ports: Option<u64>,
}

/// Organization quota resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrganizationQuota {
    /// Stable identifier; empty on creation requests.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub guid: String,
    /// Quota name.
    pub name: String,
    /// Application limits.
    #[serde(default)]
    pub apps: AppLimit,
    /// Service limits.
    #[serde(default)]
    pub services: ServiceLimit,
    /// Route limits.
    #[serde(default)]
    pub routes: RouteLimit,
}

/// Link with optional version metadata, as used by the root document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiLink {
    /// Base URL.
    pub href: String,
    /// Optional metadata.
    #[serde(default)]
    pub meta: Option<ApiLinkMeta>,
}

/// Metadata attached to an API link.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiLinkMeta {
    /// API version string, e.g. `3.180.0`.
    #[serde(default)]
    pub version: Option<String>,
}

/// Links advertised by the root document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RootLinks {
    /// Versioned control-plane API.
    #[serde(default)]
    pub cloud_controller_v3: Option<ApiLink>,
    /// Log cache endpoint.
    #[serde(default)]
    pub log_cache: Option<ApiLink>,
}

/// Root document served at `GET /`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RootInfo {
    /// Advertised links.
    #[serde(default)]
    pub links: RootLinks,
}

impl RootInfo {
    /// Version of the `/v3` API, when advertised.
    #[must_use]
    pub fn api_version(&self) -> Option<&str> {
        self.links
            .cloud_controller_v3
            .as_ref()
            .and_then(|link| link.meta.as_ref())
            .and_then(|meta| meta.version.as_deref())
    }

    /// Base URL of the log cache, when advertised.
    #[must_use]
    pub fn log_cache_url(&self) -> Option<&str> {
        self.links.log_cache.as_ref().map(|link| link.href.as_str())
    }
}

/// Output stream a log line was written to.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogStream {
    /// Standard output.
    #[default]
    Out,
    /// Standard error.
    Err,
}

impl LogStream {
    /// Label used when rendering log lines.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Out => "OUT",
            Self::Err => "ERR",
        }
    }
}

/// Log payload of an envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogPayload {
    /// Base64-encoded message bytes.
    #[serde(default)]
    pub payload: String,
    /// Output stream.
    #[serde(rename = "type", default)]
    pub stream: LogStream,
}

/// Log cache envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogEnvelope {
    /// Nanoseconds since the epoch, encoded as a string.
    #[serde(default)]
    pub timestamp: String,
    /// Source (application GUID).
    #[serde(default)]
    pub source_id: String,
    /// Instance index as a string.
    #[serde(default)]
    pub instance_id: String,
    /// Envelope tags (`source_type`, ...).
    #[serde(default)]
    pub tags: HashMap<String, String>,
    /// Log payload; absent for non-log envelopes.
    #[serde(default)]
    pub log: Option<LogPayload>,
}

impl LogEnvelope {
    /// Timestamp in nanoseconds since the epoch.
    #[must_use]
    pub fn timestamp_nanos(&self) -> Option<i64> {
        self.timestamp.parse().ok()
    }

    /// Source type tag, e.g. `APP/PROC/WEB` or `STG`.
    #[must_use]
    pub fn source_type(&self) -> &str {
        self.tags.get("source_type").map_or("", String::as_str)
    }

    /// Decoded message text, `None` when the envelope carries no valid log payload.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        let log = self.log.as_ref()?;
        let bytes = general_purpose::STANDARD.decode(&log.payload).ok()?;
        Some(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Envelope batch wrapper.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnvelopeBatch {
    /// Envelopes in timestamp order.
    #[serde(default)]
    pub batch: Vec<LogEnvelope>,
}

/// Response of the log cache `read` endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogCacheReadResponse {
    /// Returned envelopes.
    #[serde(default)]
    pub envelopes: EnvelopeBatch,
}
