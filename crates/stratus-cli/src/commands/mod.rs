//! Command handlers.
//!
//! Each handler depends on the narrowest actor trait covering its calls so
//! tests can drive it with a hand-written fake.

pub(crate) mod org_quotas;
pub(crate) mod restage;
pub(crate) mod restart;
pub(crate) mod revision;
pub(crate) mod revisions;
pub(crate) mod rollback;
pub(crate) mod target;

use async_trait::async_trait;
use stratus_actor::{Actor, ActorResult, Warnings};
use stratus_api_models::Application;
use stratus_config::Config;

use crate::client::CliResult;

/// Application lookup shared by space-scoped commands.
#[async_trait]
pub(crate) trait AppLookupActor: Send + Sync {
    async fn get_application_by_name_and_space(
        &self,
        name: &str,
        space_guid: &str,
        warnings: &mut Warnings,
    ) -> ActorResult<Application>;
}

#[async_trait]
impl AppLookupActor for Actor {
    async fn get_application_by_name_and_space(
        &self,
        name: &str,
        space_guid: &str,
        warnings: &mut Warnings,
    ) -> ActorResult<Application> {
        Self::get_application_by_name_and_space(self, name, space_guid, warnings).await
    }
}

/// Targeted organization and space plus the logged-in user.
#[derive(Debug, Clone)]
pub(crate) struct SpaceTarget {
    pub(crate) organization: String,
    pub(crate) space: String,
    pub(crate) space_guid: String,
    pub(crate) user: String,
}

/// Require a login plus a targeted organization and space.
pub(crate) fn space_target(config: &Config) -> CliResult<SpaceTarget> {
    config.check_target(true, true)?;
    let user = config.current_user()?;
    Ok(SpaceTarget {
        organization: config.organization().name.clone(),
        space: config.space().name.clone(),
        space_guid: config.space().guid.clone(),
        user: user.name,
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use serde_json::json;
    use stratus_actor::{ActorError, ActorResult, Warnings};
    use stratus_api_models::Application;
    use stratus_config::{Config, ENV_HOME};
    use stratus_test_support::fixtures;
    use stratus_test_support::tokens::access_token;
    use tempfile::TempDir;

    use super::AppLookupActor;
    use crate::stager::fakes::FakeStager;

    /// The recording stager knows exactly one app, `my-app`.
    #[async_trait]
    impl AppLookupActor for FakeStager {
        async fn get_application_by_name_and_space(
            &self,
            name: &str,
            space_guid: &str,
            _warnings: &mut Warnings,
        ) -> ActorResult<Application> {
            if name != "my-app" {
                return Err(ActorError::ApplicationNotFound {
                    name: name.to_string(),
                });
            }
            Ok(serde_json::from_value(fixtures::application("app-guid", name, space_guid))
                .expect("app fixture"))
        }
    }

    /// Load whatever config is stored under `home`.
    pub(crate) fn load_from(home: &TempDir) -> Config {
        let vars: HashMap<String, String> = HashMap::from([(
            ENV_HOME.to_string(),
            home.path().display().to_string(),
        )]);
        Config::load_with(|name| vars.get(name).cloned()).expect("config should load")
    }

    /// Config rooted in a temporary home with a login and, optionally, a target.
    pub(crate) fn config_in(home: &TempDir, targeted: bool) -> Config {
        let mut config = load_from(home);
        config.set_target("https://api.example.com");
        config.set_access_token(format!(
            "bearer {}",
            access_token(&json!({"user_name": "steve"}))
        ));
        if targeted {
            config.set_organization("org-guid", "some-org");
            config.set_space("space-guid", "some-space");
        }
        config
    }
}
