//! Error types for configuration operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Neither `STRATUS_HOME` nor `HOME` is set.
    #[error("unable to determine the home directory; set STRATUS_HOME")]
    HomeNotFound,
    /// The config file could not be read or written.
    #[error("failed to access config file {path}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The config file is not valid JSON.
    #[error("config file {path} is malformed")]
    Parse {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
    /// The config could not be serialized.
    #[error("failed to serialize config")]
    Serialize(#[source] serde_json::Error),
    /// An environment override did not parse.
    #[error("invalid value '{value}' for {name}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Offending value.
        value: String,
    },
    /// No API endpoint or access token is configured.
    #[error("Not logged in. Set an API endpoint and access token with --api-url and --access-token.")]
    NotLoggedIn,
    /// No organization is targeted.
    #[error("No org targeted, use 'stratus target -o ORG' to target an org.")]
    NoOrganizationTargeted,
    /// No space is targeted.
    #[error("No space targeted, use 'stratus target -s SPACE' to target a space.")]
    NoSpaceTargeted,
    /// The access token is not a decodable JWT.
    #[error("access token is invalid: {reason}")]
    InvalidToken {
        /// What went wrong.
        reason: &'static str,
    },
}

impl ConfigError {
    /// True for errors caused by missing login or target selection.
    #[must_use]
    pub const fn is_target_error(&self) -> bool {
        matches!(
            self,
            Self::NotLoggedIn | Self::NoOrganizationTargeted | Self::NoSpaceTargeted
        )
    }
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
