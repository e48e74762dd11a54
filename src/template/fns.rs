use super::Handle;
use serde_json::{json, Value};

/// `Ref` to a parameter, resource, or pseudo parameter
pub fn r#ref(target: &str) -> Value {
    json!({ "Ref": target })
}

/// `Fn::GetAtt` on a sibling resource's computed attribute
pub fn get_att(logical_id: &str, attribute: &str) -> Value {
    json!({ "Fn::GetAtt": [logical_id, attribute] })
}

/// `Fn::Sub` with an explicit substitution map
pub fn sub(pattern: &str, variables: Value) -> Value {
    json!({ "Fn::Sub": [pattern, variables] })
}

/// Interpolate a single parameter into a `{}` pattern
///
/// `sub_param("{}-web-event", &env)` becomes
/// `{"Fn::Sub": ["${EnvironmentName}-web-event", {"EnvironmentName": {"Ref": "EnvironmentName"}}]}`
pub fn sub_param(pattern: &str, parameter: &Handle) -> Value {
    let name = parameter.logical_id();

    sub(
        &pattern.replace("{}", &format!("${{{name}}}")),
        json!({ name: r#ref(name) }),
    )
}

/// Account id of the deploying principal
pub fn account_id() -> Value {
    r#ref("AWS::AccountId")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{Parameter, Template};

    #[test]
    fn sub_param_expands_the_pattern() {
        let mut template = Template::new();
        let env = template
            .add_parameter("EnvironmentName", Parameter::string())
            .unwrap();

        assert_eq!(
            sub_param("{}-web-event", &env),
            json!({
                "Fn::Sub": [
                    "${EnvironmentName}-web-event",
                    { "EnvironmentName": { "Ref": "EnvironmentName" } },
                ],
            }),
        );
    }
}
