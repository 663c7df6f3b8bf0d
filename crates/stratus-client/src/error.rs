//! Error types for control-plane requests.

use std::fmt::{self, Display, Formatter};

use serde_json::Value;
use stratus_api_models::V3Error;
use thiserror::Error;

/// Structured error response returned by the API, with its HTTP status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiError {
    /// HTTP status code of the response.
    pub status: u16,
    /// Errors listed in the response body.
    pub errors: Vec<V3Error>,
}

impl MultiError {
    /// True when every listed error is a `CF-ResourceNotFound` or the status is 404.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status == 404
            || (!self.errors.is_empty()
                && self
                    .errors
                    .iter()
                    .all(|error| error.title == "CF-ResourceNotFound"))
    }
}

impl Display for MultiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return write!(f, "request failed with status {}", self.status);
        }
        let details = self
            .errors
            .iter()
            .map(|error| {
                if error.detail.is_empty() {
                    error.title.as_str()
                } else {
                    error.detail.as_str()
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{details} (status {})", self.status)
    }
}

impl std::error::Error for MultiError {}

/// Errors produced by [`crate::CloudControllerClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// A URL could not be parsed or extended.
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// URL that failed.
        url: String,
        /// Parser message.
        reason: String,
    },
    /// A URI template placeholder had no value.
    #[error("missing value for URI parameter ':{param}'")]
    MissingUriParam {
        /// Placeholder name without the leading colon.
        param: String,
    },
    /// The request could not be sent or the body could not be read.
    #[error("request to {url} failed")]
    Transport {
        /// Request URL.
        url: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },
    /// The API answered with a structured error body.
    #[error(transparent)]
    Api(#[from] MultiError),
    /// The API answered with a non-success status and an unstructured body.
    #[error("unexpected response {status} from {url}: {body}")]
    RawHttp {
        /// HTTP status code.
        status: u16,
        /// Request URL.
        url: String,
        /// Response body, trimmed.
        body: String,
    },
    /// A response body did not match the expected shape.
    #[error("failed to decode response from {url}")]
    Decode {
        /// Request URL.
        url: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// A request body could not be serialized.
    #[error("failed to encode request body")]
    Encode(#[source] serde_json::Error),
    /// A list item did not decode as the expected resource type.
    #[error("unexpected item in {expected} list: {item}")]
    UnexpectedItemInList {
        /// Resource type the list should contain.
        expected: &'static str,
        /// Offending raw item.
        item: Value,
    },
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client")]
    Build(#[source] reqwest::Error),
    /// A header value contained invalid characters.
    #[error("invalid value for header '{name}'")]
    InvalidHeader {
        /// Header name.
        name: &'static str,
    },
}

impl ClientError {
    /// Structured API error, if this is one.
    #[must_use]
    pub const fn as_api(&self) -> Option<&MultiError> {
        match self {
            Self::Api(error) => Some(error),
            _ => None,
        }
    }
}

/// Convenience alias for client results.
pub type ClientResult<T> = Result<T, ClientError>;
