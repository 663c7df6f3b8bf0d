//! Loading, saving, and querying the CLI configuration.
//!
//! # Design
//! - Environment lookups go through an injected function so callers and tests
//!   decide where values come from.
//! - Command-line overrides live beside the persisted document and are never
//!   written back.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::defaults::{
    CONFIG_DIR, CONFIG_FILE, CONFIG_VERSION, DEFAULT_POLL_INTERVAL_SECS,
    DEFAULT_STAGING_TIMEOUT_MINS, DEFAULT_STARTUP_TIMEOUT_MINS, ENV_HOME, ENV_STAGING_TIMEOUT,
    ENV_STARTUP_TIMEOUT,
};
use crate::error::{ConfigError, ConfigResult};
use crate::model::{ConfigFile, OrganizationFields, SpaceFields};
use crate::user::{User, decode_user};

/// Loaded configuration plus environment and command-line overrides.
#[derive(Debug, Clone)]
pub struct Config {
    file: ConfigFile,
    path: PathBuf,
    staging_timeout: Duration,
    startup_timeout: Duration,
    target_override: Option<String>,
    token_override: Option<String>,
}

impl Config {
    /// Load using the process environment.
    ///
    /// # Errors
    ///
    /// See [`Self::load_with`].
    pub fn load() -> ConfigResult<Self> {
        Self::load_with(|name| std::env::var(name).ok())
    }

    /// Load using `env` to resolve environment variables.
    ///
    /// A missing config file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error when no home directory is known, the file cannot be
    /// read or parsed, or a timeout override is not a whole number of minutes.
    pub fn load_with<F>(env: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let home = env(ENV_HOME)
            .filter(|value| !value.is_empty())
            .or_else(|| env("HOME").filter(|value| !value.is_empty()))
            .or_else(|| env("USERPROFILE").filter(|value| !value.is_empty()))
            .ok_or(ConfigError::HomeNotFound)?;
        let path = Path::new(&home).join(CONFIG_DIR).join(CONFIG_FILE);
        let file = read_file(&path)?;

        Ok(Self {
            file,
            path,
            staging_timeout: minutes(&env, ENV_STAGING_TIMEOUT, DEFAULT_STAGING_TIMEOUT_MINS)?,
            startup_timeout: minutes(&env, ENV_STARTUP_TIMEOUT, DEFAULT_STARTUP_TIMEOUT_MINS)?,
            target_override: None,
            token_override: None,
        })
    }

    /// Write the persisted document back to disk, creating the directory.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be serialized or written.
    pub fn save(&self) -> ConfigResult<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let mut file = self.file.clone();
        file.config_version = CONFIG_VERSION;
        let body = serde_json::to_vec_pretty(&file).map_err(ConfigError::Serialize)?;
        fs::write(&self.path, body).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), "config saved");
        Ok(())
    }

    /// Apply command-line overrides for the endpoint and token.
    pub fn apply_overrides(&mut self, target: Option<String>, access_token: Option<String>) {
        if target.is_some() {
            self.target_override = target;
        }
        if access_token.is_some() {
            self.token_override = access_token;
        }
    }

    /// Location of the config file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persisted document.
    #[must_use]
    pub const fn file(&self) -> &ConfigFile {
        &self.file
    }

    /// Effective API endpoint, empty when unset.
    #[must_use]
    pub fn target(&self) -> &str {
        self.target_override.as_deref().unwrap_or(&self.file.target)
    }

    /// Effective access token, empty when unset.
    #[must_use]
    pub fn access_token(&self) -> &str {
        self.token_override
            .as_deref()
            .unwrap_or(&self.file.access_token)
    }

    /// Accept invalid TLS certificates.
    #[must_use]
    pub const fn skip_ssl_validation(&self) -> bool {
        self.file.skip_ssl_validation
    }

    /// Targeted organization.
    #[must_use]
    pub const fn organization(&self) -> &OrganizationFields {
        &self.file.organization_fields
    }

    /// Targeted space.
    #[must_use]
    pub const fn space(&self) -> &SpaceFields {
        &self.file.space_fields
    }

    /// Persist a new API endpoint.
    pub fn set_target(&mut self, target: impl Into<String>) {
        self.file.target = target.into();
    }

    /// Persist a new access token.
    pub fn set_access_token(&mut self, token: impl Into<String>) {
        self.file.access_token = token.into();
    }

    /// Target an organization; clears the targeted space.
    pub fn set_organization(&mut self, guid: impl Into<String>, name: impl Into<String>) {
        self.file.organization_fields = OrganizationFields {
            guid: guid.into(),
            name: name.into(),
        };
        self.file.space_fields = SpaceFields::default();
    }

    /// Target a space within the targeted organization.
    pub fn set_space(&mut self, guid: impl Into<String>, name: impl Into<String>) {
        self.file.space_fields = SpaceFields {
            guid: guid.into(),
            name: name.into(),
        };
    }

    /// Delay between status checks.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(
            self.file
                .polling_interval_secs
                .unwrap_or(DEFAULT_POLL_INTERVAL_SECS),
        )
    }

    /// Upper bound on waiting for staging.
    #[must_use]
    pub const fn staging_timeout(&self) -> Duration {
        self.staging_timeout
    }

    /// Upper bound on waiting for instances to start.
    #[must_use]
    pub const fn startup_timeout(&self) -> Duration {
        self.startup_timeout
    }

    /// Ensure a login and, when requested, a targeted organization and space.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotLoggedIn`], [`ConfigError::NoOrganizationTargeted`]
    /// or [`ConfigError::NoSpaceTargeted`].
    pub fn check_target(&self, organization: bool, space: bool) -> ConfigResult<()> {
        if self.target().is_empty() || self.access_token().is_empty() {
            return Err(ConfigError::NotLoggedIn);
        }
        if organization && self.file.organization_fields.guid.is_empty() {
            return Err(ConfigError::NoOrganizationTargeted);
        }
        if space && self.file.space_fields.guid.is_empty() {
            return Err(ConfigError::NoSpaceTargeted);
        }
        Ok(())
    }

    /// User the access token was issued to.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidToken`] when the token cannot be decoded.
    pub fn current_user(&self) -> ConfigResult<User> {
        decode_user(self.access_token())
    }
}

fn read_file(path: &Path) -> ConfigResult<ConfigFile> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config file; using defaults");
            return Ok(ConfigFile::default());
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_slice(&bytes).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn minutes<F>(env: &F, name: &'static str, default: u64) -> ConfigResult<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = env(name).filter(|value| !value.trim().is_empty()) else {
        return Ok(Duration::from_secs(default * 60));
    };
    let value = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidEnv { name, value: raw })?;
    Ok(Duration::from_secs(value.saturating_mul(60)))
}
