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

//! File-backed configuration for the stratus CLI.
//!
//! Layout: `model.rs` (persisted JSON document), `loader.rs` (`Config`:
//! load, save, overrides, target checks), `user.rs` (current user from the
//! access token), `defaults.rs` (file locations and timeouts).

mod defaults;
pub mod error;
mod loader;
pub mod model;
mod user;

pub use defaults::{
    CONFIG_DIR, CONFIG_FILE, DEFAULT_POLL_INTERVAL_SECS, DEFAULT_STAGING_TIMEOUT_MINS,
    DEFAULT_STARTUP_TIMEOUT_MINS, ENV_HOME, ENV_STAGING_TIMEOUT, ENV_STARTUP_TIMEOUT,
};
pub use error::{ConfigError, ConfigResult};
pub use loader::Config;
pub use model::{ConfigFile, OrganizationFields, SpaceFields};
pub use user::User;
