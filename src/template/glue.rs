use super::AwsResource;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Table {
    pub catalog_id: Value,
    pub database_name: String,
    pub table_input: TableInput,
}

impl AwsResource for Table {
    const TYPE: &'static str = "AWS::Glue::Table";
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TableInput {
    pub name: String,
    pub partition_keys: Vec<Column>,
    pub table_type: String,
    pub storage_descriptor: StorageDescriptor,
    pub parameters: BTreeMap<String, String>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Column {
    pub name: String,
    pub r#type: String,
}

impl Column {
    pub fn new(name: &str, r#type: &str) -> Self {
        Column {
            name: name.to_string(),
            r#type: r#type.to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StorageDescriptor {
    pub columns: Vec<Column>,
    pub compressed: bool,
    pub serde_info: SerdeInfo,
    pub location: Value,
    pub input_format: String,
    pub output_format: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SerdeInfo {
    pub serialization_library: String,
    pub parameters: BTreeMap<String, String>,
}
