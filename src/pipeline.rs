use crate::template::firehose::{
    BufferingHints, DeliveryStream, ExtendedS3DestinationConfiguration,
};
use crate::template::fns;
use crate::template::glue::{Column, SerdeInfo, StorageDescriptor, Table, TableInput};
use crate::template::iam::{self, Role, ServicePrincipal};
use crate::template::kinesis::Stream;
use crate::template::{Parameter, RawResource, Template};
use serde_json::json;
use std::collections::BTreeMap;

const INPUT_STREAM_NAME_PREFIX: &str = "SOURCE_SQL_STREAM";
const OUTPUT_STREAM_NAME: &str = "DESTINATION_SQL_STREAM";
const DATA_BUCKET: &str = "eq-sanhe-for-everything";

/// SQL counting sign-up events over one-minute tumbling windows
fn application_code() -> String {
    let window = format!(
        r#"FLOOR((MONOTONIC("{INPUT_STREAM_NAME_PREFIX}_001"."event_time") - TIMESTAMP '1970-01-01 00:00:00') SECOND / 60 TO SECOND) * 60 + TIMESTAMP '1970-01-01 00:00:00'"#
    );

    format!(
        r#"
CREATE OR REPLACE STREAM "{output}" ("event_time" TIMESTAMP, "sign_up_event_counts" INTEGER);
CREATE OR REPLACE PUMP "STREAM_PUMP" AS INSERT INTO "{output}"
SELECT STREAM
    {window} as "event_time",
    COUNT(*) as "sign_up_event_counts"
FROM "{input}_001"
WHERE "event_name" SIMILAR TO '%sign_up%'
GROUP BY
    {window};
"#,
        input = INPUT_STREAM_NAME_PREFIX,
        output = OUTPUT_STREAM_NAME,
    )
}

/// Assemble the full analytics pipeline template
///
/// Web events land in a Kinesis stream, the analytics application counts
/// sign-ups per minute, Firehose delivers the counts to S3, and a Glue
/// table makes them queryable from Athena.
pub fn template() -> eyre::Result<Template> {
    let mut template = Template::new();

    let env = template.add_parameter("EnvironmentName", Parameter::string())?;

    let input_stream = template.add(
        "KinesisInputStream",
        Stream {
            name: fns::sub_param("{}-web-event", &env),
            retention_period_hours: 24,
            shard_count: 1,
        },
    )?;

    let delivery_role = template.add(
        "KinesisDeliveryStreamServiceRole",
        Role {
            role_name: fns::sub_param("{}-kinesis-delivery-stream-service-role", &env),
            assume_role_policy_document: iam::assume_role_policy_document(&[
                ServicePrincipal::Firehose,
            ]),
            managed_policy_arns: vec![iam::ADMINISTRATOR_ACCESS.to_string()],
        },
    )?;

    let delivery_stream = template.add(
        "KinesisDeliveryStream",
        DeliveryStream {
            delivery_stream_name: fns::sub_param("{}-web-event", &env),
            delivery_stream_type: "DirectPut".to_string(),
            extended_s3_destination_configuration: ExtendedS3DestinationConfiguration {
                bucket_arn: format!("arn:aws:s3:::{DATA_BUCKET}"),
                prefix: fns::sub(
                    "data/kinesis-analytics/${EnvironmentName}/year=!{timestamp:YYYY}/month=!{timestamp:MM}/day=!{timestamp:dd}/hour=!{timestamp:HH}/minute=!{timestamp:mm}/",
                    json!({ "EnvironmentName": env.r#ref() }),
                ),
                error_output_prefix: fns::sub(
                    "data/kinesis-analytics/${EnvironmentName}/result=!{firehose:error-output-type}/year=!{timestamp:YYYY}/month=!{timestamp:MM}/day=!{timestamp:dd}/hour=!{timestamp:HH}/minute=!{timestamp:mm}/",
                    json!({ "EnvironmentName": env.r#ref() }),
                ),
                buffering_hints: BufferingHints {
                    interval_in_seconds: 60,
                    size_in_mbs: 5,
                },
                compression_format: "UNCOMPRESSED".to_string(),
                role_arn: delivery_role.arn(),
                s3_backup_mode: "Disabled".to_string(),
            },
        },
    )?;

    let analytics_role = template.add(
        "KinesisAnalyticsApplicationServiceRole",
        Role {
            role_name: fns::sub_param("{}-kinesis-analytics-service-role", &env),
            assume_role_policy_document: iam::assume_role_policy_document(&[
                ServicePrincipal::KinesisAnalytics,
            ]),
            managed_policy_arns: vec![iam::ADMINISTRATOR_ACCESS.to_string()],
        },
    )?;

    // The Kinesis Analytics console only understands applications created
    // through the V1 API, which the typed layer does not cover. Build the
    // V1 resources by hand and merge them at render time.
    let application_name = fns::sub_param("{}-sign-up-metrics", &env);

    template.inject(RawResource::new(
        "KinesisAnalyticsApplication",
        "AWS::KinesisAnalytics::Application",
        json!({
            "ApplicationName": application_name,
            "Inputs": [
                {
                    "InputParallelism": { "Count": 1 },
                    "KinesisStreamsInput": {
                        "ResourceARN": input_stream.arn(),
                        "RoleARN": analytics_role.arn(),
                    },
                    "NamePrefix": INPUT_STREAM_NAME_PREFIX,
                    "InputSchema": {
                        "RecordFormat": {
                            "RecordFormatType": "JSON",
                            "MappingParameters": {
                                "JSONMappingParameters": { "RecordRowPath": "$" },
                            },
                        },
                        "RecordEncoding": "UTF-8",
                        "RecordColumns": [
                            { "Name": "event_id", "Mapping": "$.event_id", "SqlType": "VARCHAR(64)" },
                            { "Name": "event_time", "Mapping": "$.event_time", "SqlType": "TIMESTAMP" },
                            { "Name": "event_name", "Mapping": "$.event_name", "SqlType": "VARCHAR(8)" },
                        ],
                    },
                },
            ],
            "ApplicationCode": application_code(),
        }),
        &[input_stream.logical_id(), analytics_role.logical_id()],
    ))?;

    template.inject(RawResource::new(
        "KinesisAnalyticsApplicationOutput",
        "AWS::KinesisAnalytics::ApplicationOutput",
        json!({
            "ApplicationName": application_name,
            "Output": {
                "Name": OUTPUT_STREAM_NAME,
                "KinesisFirehoseOutput": {
                    "ResourceARN": delivery_stream.arn(),
                    "RoleARN": analytics_role.arn(),
                },
                "DestinationSchema": { "RecordFormatType": "JSON" },
            },
        }),
        &[delivery_stream.logical_id(), analytics_role.logical_id()],
    ))?;

    template.add(
        "GlueTableSignUpCounts",
        Table {
            catalog_id: fns::account_id(),
            database_name: "test".to_string(),
            table_input: TableInput {
                name: "sign_up_counts".to_string(),
                partition_keys: ["year", "month", "day", "hour", "minute"]
                    .iter()
                    .map(|key| Column::new(key, "smallint"))
                    .collect(),
                table_type: "EXTERNAL_TABLE".to_string(),
                storage_descriptor: StorageDescriptor {
                    columns: vec![
                        Column::new("event_time", "timestamp"),
                        Column::new("sign_up_event_counts", "smallint"),
                    ],
                    compressed: false,
                    serde_info: SerdeInfo {
                        serialization_library: "org.openx.data.jsonserde.JsonSerDe".to_string(),
                        parameters: BTreeMap::from([(
                            "serialization.format".to_string(),
                            "1".to_string(),
                        )]),
                    },
                    location: fns::sub_param(
                        &format!("s3://{DATA_BUCKET}/data/kinesis-analytics/{{}}"),
                        &env,
                    ),
                    input_format: "org.apache.hadoop.mapred.TextInputFormat".to_string(),
                    output_format: "org.apache.hadoop.hive.ql.io.IgnoreKeyTextOutputFormat"
                        .to_string(),
                },
                parameters: BTreeMap::from([
                    ("EXTERNAL".to_string(), "TRUE".to_string()),
                    ("has_encrypted_data".to_string(), "false".to_string()),
                ]),
            },
        },
    )?;

    Ok(template)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn document() -> Value {
        serde_json::from_str(&template().unwrap().render().unwrap()).unwrap()
    }

    #[test]
    fn renders_identically_across_runs() {
        let first = template().unwrap().render().unwrap();
        let second = template().unwrap().render().unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn document_shape_is_stable() {
        let document = document();

        let keys: Vec<&str> = document
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();

        assert_eq!(keys, vec!["Parameters", "Resources"]);
        assert_eq!(document["Resources"].as_object().unwrap().len(), 7);
        assert!(document["Parameters"].get("EnvironmentName").is_some());
    }

    #[test]
    fn delivery_stream_points_at_its_role() {
        let document = document();

        assert_eq!(
            document["Resources"]["KinesisDeliveryStream"]["Properties"]
                ["ExtendedS3DestinationConfiguration"]["RoleARN"],
            json!({ "Fn::GetAtt": ["KinesisDeliveryStreamServiceRole", "Arn"] }),
        );
    }

    #[test]
    fn analytics_application_depends_on_its_references() {
        let document = document();
        let application = &document["Resources"]["KinesisAnalyticsApplication"];

        assert_eq!(application["Type"], "AWS::KinesisAnalytics::Application");
        assert_eq!(
            application["DependsOn"],
            json!(["KinesisInputStream", "KinesisAnalyticsApplicationServiceRole"]),
        );

        let output = &document["Resources"]["KinesisAnalyticsApplicationOutput"];
        assert_eq!(
            output["DependsOn"],
            json!(["KinesisDeliveryStream", "KinesisAnalyticsApplicationServiceRole"]),
        );
    }

    #[test]
    fn application_code_names_both_streams() {
        let code = application_code();

        assert!(code.contains("DESTINATION_SQL_STREAM"));
        assert!(code.contains("SOURCE_SQL_STREAM_001"));
        assert!(code.contains("sign_up"));
    }
}
