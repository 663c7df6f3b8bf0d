//! Persisted configuration document.

use serde::{Deserialize, Serialize};

/// Targeted organization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrganizationFields {
    /// Organization GUID; empty when nothing is targeted.
    #[serde(default)]
    pub guid: String,
    /// Organization name.
    #[serde(default)]
    pub name: String,
}

/// Targeted space.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpaceFields {
    /// Space GUID; empty when nothing is targeted.
    #[serde(default)]
    pub guid: String,
    /// Space name.
    #[serde(default)]
    pub name: String,
}

/// JSON document stored in `config.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigFile {
    /// Format version.
    #[serde(default)]
    pub config_version: u32,
    /// API endpoint URL.
    #[serde(default)]
    pub target: String,
    /// Access token, possibly prefixed with `bearer `.
    #[serde(default)]
    pub access_token: String,
    /// Accept invalid TLS certificates.
    #[serde(default)]
    pub skip_ssl_validation: bool,
    /// Targeted organization.
    #[serde(default)]
    pub organization_fields: OrganizationFields,
    /// Targeted space.
    #[serde(default)]
    pub space_fields: SpaceFields,
    /// Delay between status checks; the default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polling_interval_secs: Option<u64>,
}
