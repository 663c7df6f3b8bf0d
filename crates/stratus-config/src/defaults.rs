//! File locations, environment variable names, and default timings.

/// Directory under the home directory holding the config file.
pub const CONFIG_DIR: &str = ".stratus";
/// Config file name.
pub const CONFIG_FILE: &str = "config.json";
/// Overrides the home directory used to locate [`CONFIG_DIR`].
pub const ENV_HOME: &str = "STRATUS_HOME";
/// Staging timeout override, in minutes.
pub const ENV_STAGING_TIMEOUT: &str = "STRATUS_STAGING_TIMEOUT";
/// Startup timeout override, in minutes.
pub const ENV_STARTUP_TIMEOUT: &str = "STRATUS_STARTUP_TIMEOUT";
/// Default staging timeout, in minutes.
pub const DEFAULT_STAGING_TIMEOUT_MINS: u64 = 15;
/// Default startup timeout, in minutes.
pub const DEFAULT_STARTUP_TIMEOUT_MINS: u64 = 5;
/// Default delay between status checks, in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
/// Version written to new config files.
pub(crate) const CONFIG_VERSION: u32 = 1;
