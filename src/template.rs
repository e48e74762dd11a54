pub mod firehose;
pub mod fns;
pub mod glue;
pub mod iam;
pub mod kinesis;

use eyre::WrapErr;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// A typed CloudFormation resource
///
/// Implementors serialize to the resource's `Properties` map.
pub trait AwsResource: Serialize {
    const TYPE: &'static str;

    /// Logical ids this resource must wait for, beyond implicit references
    fn depends_on(&self) -> Vec<String> {
        Vec::new()
    }
}

/// External input resolved by CloudFormation at deploy time
#[derive(Clone, Debug, Serialize)]
pub struct Parameter {
    #[serde(rename = "Type")]
    pub r#type: String,
}

impl Parameter {
    pub fn string() -> Self {
        Parameter {
            r#type: "String".to_string(),
        }
    }
}

/// Reference to a registered resource or parameter
///
/// Exposes the logical id and the computed attributes sibling resources
/// need at template-authoring time.
#[derive(Clone, Debug)]
pub struct Handle {
    logical_id: String,
}

impl Handle {
    pub fn logical_id(&self) -> &str {
        &self.logical_id
    }

    /// `Ref` intrinsic pointing at this entry
    pub fn r#ref(&self) -> Value {
        fns::r#ref(&self.logical_id)
    }

    /// `Fn::GetAtt` for an attribute assigned at provisioning time
    pub fn attr(&self, name: &str) -> Value {
        fns::get_att(&self.logical_id, name)
    }

    /// The ARN assigned at provisioning time
    pub fn arn(&self) -> Value {
        self.attr("Arn")
    }
}

#[derive(Clone, Debug)]
struct TypedResource {
    r#type: &'static str,
    properties: Value,
    depends_on: Vec<String>,
}

/// Hand-built resource for types the typed layer does not cover
///
/// Merged into the rendered resource map by logical id, after the typed
/// layer has serialized.
#[derive(Clone, Debug)]
pub struct RawResource {
    pub logical_id: String,
    pub definition: Value,
}

impl RawResource {
    pub fn new(logical_id: &str, r#type: &str, properties: Value, depends_on: &[&str]) -> Self {
        let mut definition = json!({
            "Type": r#type,
            "Properties": properties,
        });

        if !depends_on.is_empty() {
            definition["DependsOn"] = json!(depends_on);
        }

        RawResource {
            logical_id: logical_id.to_string(),
            definition,
        }
    }
}

/// Ordered collection of parameters and resources, serialized once
#[derive(Default)]
pub struct Template {
    parameters: BTreeMap<String, Parameter>,
    resources: BTreeMap<String, TypedResource>,
    injected: Vec<RawResource>,
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an external parameter and return a referencing handle
    pub fn add_parameter(&mut self, name: &str, parameter: Parameter) -> eyre::Result<Handle> {
        if self.parameters.contains_key(name) {
            return Err(eyre::eyre!("Parameter \"{name}\" is already declared"));
        }

        self.parameters.insert(name.to_string(), parameter);

        Ok(Handle {
            logical_id: name.to_string(),
        })
    }

    /// Register a typed resource under a unique logical id
    pub fn add<R: AwsResource>(&mut self, logical_id: &str, resource: R) -> eyre::Result<Handle> {
        if self.resources.contains_key(logical_id) {
            return Err(eyre::eyre!("Logical id \"{logical_id}\" is already taken"));
        }

        let properties = serde_json::to_value(&resource)
            .wrap_err_with(|| format!("Failed to serialize properties of \"{logical_id}\""))?;

        self.resources.insert(
            logical_id.to_string(),
            TypedResource {
                r#type: R::TYPE,
                properties,
                depends_on: resource.depends_on(),
            },
        );

        Ok(Handle {
            logical_id: logical_id.to_string(),
        })
    }

    /// Queue a raw resource for merging at render time
    ///
    /// Every logical id the properties read through `Fn::GetAtt` must be
    /// listed in the dependency list; an incomplete list is a
    /// configuration error.
    pub fn inject(&mut self, raw: RawResource) -> eyre::Result<()> {
        let depends_on: Vec<String> = raw.definition["DependsOn"]
            .as_array()
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| id.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        for target in get_att_targets(&raw.definition["Properties"]) {
            if !depends_on.contains(&target) {
                return Err(eyre::eyre!(
                    "Raw resource \"{}\" reads Fn::GetAtt from \"{target}\" but does not depend on it",
                    raw.logical_id,
                ));
            }
        }

        self.injected.push(raw);
        Ok(())
    }

    /// Serialize to the canonical JSON document
    ///
    /// Keys come out sorted and identical input renders byte-identical
    /// output.
    pub fn render(&self) -> eyre::Result<String> {
        let mut resources = Map::new();

        for (logical_id, resource) in self.resources.iter() {
            let mut entry = Map::new();
            entry.insert("Type".to_string(), Value::String(resource.r#type.to_string()));
            entry.insert("Properties".to_string(), resource.properties.clone());

            if !resource.depends_on.is_empty() {
                entry.insert("DependsOn".to_string(), json!(resource.depends_on));
            }

            resources.insert(logical_id.clone(), Value::Object(entry));
        }

        for raw in self.injected.iter() {
            if resources.contains_key(&raw.logical_id) {
                return Err(eyre::eyre!(
                    "Raw resource \"{}\" collides with an already declared logical id",
                    raw.logical_id,
                ));
            }

            resources.insert(raw.logical_id.clone(), raw.definition.clone());
        }

        let document = json!({
            "Parameters": self.parameters,
            "Resources": resources,
        });

        serde_json::to_string_pretty(&document).wrap_err("Failed to serialize template")
    }
}

/// Logical ids referenced through Fn::GetAtt anywhere in the value
fn get_att_targets(value: &Value) -> Vec<String> {
    let mut targets = Vec::new();
    collect_get_att(value, &mut targets);
    targets
}

fn collect_get_att(value: &Value, targets: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            if let Some(Value::Array(args)) = map.get("Fn::GetAtt") {
                if let Some(Value::String(id)) = args.first() {
                    targets.push(id.clone());
                }
            }

            for entry in map.values() {
                collect_get_att(entry, targets);
            }
        }

        Value::Array(items) => {
            for item in items {
                collect_get_att(item, targets);
            }
        }

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::kinesis::Stream;
    use super::*;

    fn stream() -> Stream {
        Stream {
            name: fns::r#ref("EnvironmentName"),
            retention_period_hours: 24,
            shard_count: 1,
        }
    }

    #[test]
    fn renders_identically_for_identical_input() {
        let mut template = Template::new();
        template.add_parameter("EnvironmentName", Parameter::string()).unwrap();
        template.add("InputStream", stream()).unwrap();

        assert_eq!(template.render().unwrap(), template.render().unwrap());
    }

    #[test]
    fn rejects_duplicate_logical_id() {
        let mut template = Template::new();
        template.add("InputStream", stream()).unwrap();

        assert!(template.add("InputStream", stream()).is_err());
    }

    #[test]
    fn rejects_raw_collision_at_render() {
        let mut template = Template::new();
        template.add("InputStream", stream()).unwrap();

        template
            .inject(RawResource::new(
                "InputStream",
                "AWS::KinesisAnalytics::Application",
                json!({ "ApplicationName": "collision" }),
                &[],
            ))
            .unwrap();

        assert!(template.render().is_err());
    }

    #[test]
    fn rejects_incomplete_dependency_list() {
        let mut template = Template::new();
        let handle = template.add("InputStream", stream()).unwrap();

        let result = template.inject(RawResource::new(
            "Application",
            "AWS::KinesisAnalytics::Application",
            json!({ "Inputs": [{ "ResourceARN": handle.arn() }] }),
            &[],
        ));

        assert!(result.is_err());
    }

    #[test]
    fn accepts_complete_dependency_list() {
        let mut template = Template::new();
        let handle = template.add("InputStream", stream()).unwrap();

        template
            .inject(RawResource::new(
                "Application",
                "AWS::KinesisAnalytics::Application",
                json!({ "Inputs": [{ "ResourceARN": handle.arn() }] }),
                &[handle.logical_id()],
            ))
            .unwrap();

        let document: Value = serde_json::from_str(&template.render().unwrap()).unwrap();
        assert!(document["Resources"]["Application"]["Properties"]["Inputs"].is_array());
    }

    #[test]
    fn rejects_duplicate_raw_logical_id_at_render() {
        let mut template = Template::new();

        for name in ["first", "second"] {
            template
                .inject(RawResource::new(
                    "Application",
                    "AWS::KinesisAnalytics::Application",
                    json!({ "ApplicationName": name }),
                    &[],
                ))
                .unwrap();
        }

        assert!(template.render().is_err());
    }

    #[test]
    fn omits_depends_on_when_empty() {
        let mut template = Template::new();
        template.add("InputStream", stream()).unwrap();

        template
            .inject(RawResource::new(
                "Application",
                "AWS::KinesisAnalytics::Application",
                json!({ "ApplicationName": "standalone" }),
                &[],
            ))
            .unwrap();

        let document: Value = serde_json::from_str(&template.render().unwrap()).unwrap();
        assert!(document["Resources"]["InputStream"].get("DependsOn").is_none());
        assert!(document["Resources"]["Application"].get("DependsOn").is_none());
    }
}
