//! Current user derived from the access token.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;

use crate::error::{ConfigError, ConfigResult};

/// User an access token was issued to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// User name, or the client id for client-credential tokens.
    pub name: String,
}

#[derive(Deserialize)]
struct Claims {
    #[serde(default)]
    user_name: Option<String>,
    #[serde(default)]
    client_id: Option<String>,
}

pub(crate) fn decode_user(token: &str) -> ConfigResult<User> {
    let token = token.trim();
    let token = token
        .get(..7)
        .filter(|prefix| prefix.eq_ignore_ascii_case("bearer "))
        .map_or(token, |_| &token[7..]);
    let payload = token
        .split('.')
        .nth(1)
        .ok_or(ConfigError::InvalidToken {
            reason: "expected three dot-separated segments",
        })?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|_| ConfigError::InvalidToken {
            reason: "payload is not base64url",
        })?;
    let claims: Claims = serde_json::from_slice(&bytes).map_err(|_| ConfigError::InvalidToken {
        reason: "payload is not a JSON object",
    })?;
    claims
        .user_name
        .or(claims.client_id)
        .map(|name| User { name })
        .ok_or(ConfigError::InvalidToken {
            reason: "token names no user or client",
        })
}
