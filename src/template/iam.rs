use super::AwsResource;
use serde::Serialize;
use serde_json::{json, Value};

pub const ADMINISTRATOR_ACCESS: &str = "arn:aws:iam::aws:policy/AdministratorAccess";

/// Services allowed to assume a role
#[derive(Clone, Copy, Debug)]
pub enum ServicePrincipal {
    Firehose,
    KinesisAnalytics,
}

impl ServicePrincipal {
    fn endpoint(&self) -> &'static str {
        match self {
            ServicePrincipal::Firehose => "firehose.amazonaws.com",
            ServicePrincipal::KinesisAnalytics => "kinesisanalytics.amazonaws.com",
        }
    }
}

/// Trust policy allowing the given services to assume the role
pub fn assume_role_policy_document(principals: &[ServicePrincipal]) -> Value {
    let services: Vec<&str> = principals.iter().map(|p| p.endpoint()).collect();

    json!({
        "Version": "2012-10-17",
        "Statement": [
            {
                "Effect": "Allow",
                "Principal": { "Service": services },
                "Action": ["sts:AssumeRole"],
            },
        ],
    })
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Role {
    pub role_name: Value,
    pub assume_role_policy_document: Value,
    pub managed_policy_arns: Vec<String>,
}

impl AwsResource for Role {
    const TYPE: &'static str = "AWS::IAM::Role";
}
