use crate::config::Config;
use aws_sdk_cloudformation::types::{Capability, Parameter, Tag};
use eyre::WrapErr;

/// Check if the stack already exists
async fn is_exists(client: &aws_sdk_cloudformation::Client, name: &str) -> eyre::Result<bool> {
    let result = client
        .describe_stacks()
        .set_stack_name(Some(name.into()))
        .send()
        .await;

    if let Err(e) = &result {
        if let aws_sdk_cloudformation::error::SdkError::ServiceError(err) = e {
            // Describing a missing stack comes back as a validation error
            if err.err().meta().code().unwrap_or_default().eq("ValidationError") {
                return Ok(false);
            }

            return Err(eyre::eyre!("Service error while describing stack: {err:?}"));
        }

        return Err(eyre::eyre!("Failed to describe stack: {e:?}"));
    }

    Ok(true)
}

/// Parameter bindings in the SDK's shape
fn parameters(config: &Config) -> Vec<Parameter> {
    config
        .parameters()
        .into_iter()
        .map(|(key, value)| {
            Parameter::builder()
                .parameter_key(key)
                .parameter_value(value)
                .build()
        })
        .collect()
}

/// Stack tags in the SDK's shape
fn tags(config: &Config) -> Vec<Tag> {
    config
        .tags()
        .into_iter()
        .map(|(key, value)| Tag::builder().key(key).value(value).build())
        .collect()
}

/// Create or update the stack from the uploaded template
///
/// Create vs. update is decided by probing the stack. Either call is
/// submitted exactly once — no completion polling, no rollback.
pub async fn deploy_stack(
    client: &aws_sdk_cloudformation::Client,
    config: &Config,
    template_url: &str,
) -> eyre::Result<()> {
    let name = config.stack_name();
    let capabilities = Capability::CapabilityIam;
    let parameters = parameters(config);
    let tags = tags(config);

    if is_exists(client, name).await? {
        client
            .update_stack()
            .capabilities(capabilities)
            .stack_name(name)
            .template_url(template_url)
            .set_parameters(Some(parameters))
            .set_tags(Some(tags))
            .send()
            .await
            .wrap_err("Failed to update stack")?;
    } else {
        client
            .create_stack()
            .capabilities(capabilities)
            .stack_name(name)
            .template_url(template_url)
            .set_parameters(Some(parameters))
            .set_tags(Some(tags))
            .send()
            .await
            .wrap_err("Failed to create stack")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bindings_carry_the_environment_name() {
        let config = Config::from_env();

        let tags = tags(&config);
        assert_eq!(tags[0].key(), Some("EnvironmentName"));

        let parameters = parameters(&config);
        assert_eq!(parameters[0].parameter_key(), Some("EnvironmentName"));
    }
}
