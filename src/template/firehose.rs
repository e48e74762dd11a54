use super::AwsResource;
use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeliveryStream {
    pub delivery_stream_name: Value,
    pub delivery_stream_type: String,
    pub extended_s3_destination_configuration: ExtendedS3DestinationConfiguration,
}

impl AwsResource for DeliveryStream {
    const TYPE: &'static str = "AWS::KinesisFirehose::DeliveryStream";
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExtendedS3DestinationConfiguration {
    #[serde(rename = "BucketARN")]
    pub bucket_arn: String,
    pub prefix: Value,
    pub error_output_prefix: Value,
    pub buffering_hints: BufferingHints,
    pub compression_format: String,
    #[serde(rename = "RoleARN")]
    pub role_arn: Value,
    pub s3_backup_mode: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BufferingHints {
    pub interval_in_seconds: u32,
    #[serde(rename = "SizeInMBs")]
    pub size_in_mbs: u32,
}
