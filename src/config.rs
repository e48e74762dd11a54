use crate::env::env_or;
use aws_config::{BehaviorVersion, Region, SdkConfig};

/// Deployment configuration
///
/// Defaults describe the dev environment; every field can be overridden
/// through the environment.
#[derive(Clone, Debug)]
pub struct Config {
    pub profile: String,
    pub region: String,
    pub environment: String,
    pub bucket: String,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            profile: env_or("AWS_PROFILE", "eq_sanhe"),
            region: env_or("AWS_REGION", "us-east-1"),
            environment: env_or("ENVIRONMENT_NAME", "login-gov-metrics-dev"),
            bucket: env_or("TEMPLATE_BUCKET", "eq-sanhe-for-everything"),
        }
    }

    /// The stack carries the environment's name
    pub fn stack_name(&self) -> &str {
        &self.environment
    }

    /// Parameter values bound at deploy time
    pub fn parameters(&self) -> Vec<(String, String)> {
        vec![("EnvironmentName".to_string(), self.environment.clone())]
    }

    /// Tags applied to the stack on every deploy
    pub fn tags(&self) -> Vec<(String, String)> {
        vec![("EnvironmentName".to_string(), self.environment.clone())]
    }

    pub async fn aws(&self) -> SdkConfig {
        aws_config::defaults(BehaviorVersion::v2025_01_17())
            .profile_name(&self.profile)
            .region(Region::new(self.region.clone()))
            .load()
            .await
    }
}
