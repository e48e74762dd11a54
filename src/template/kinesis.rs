use super::AwsResource;
use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Stream {
    pub name: Value,
    pub retention_period_hours: u32,
    pub shard_count: u32,
}

impl AwsResource for Stream {
    const TYPE: &'static str = "AWS::Kinesis::Stream";
}
