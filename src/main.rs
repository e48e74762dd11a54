use eyre::WrapErr;
use signup_metrics::config::Config;
use signup_metrics::{deploy, pipeline, upload};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    log::info!("Deploying \"{}\" to {}", config.stack_name(), config.region);

    let template = pipeline::template().wrap_err("Failed to assemble template")?;
    let document = template.render().wrap_err("Failed to render template")?;

    let aws = config.aws().await;
    let s3 = aws_sdk_s3::Client::new(&aws);
    let cloudformation = aws_sdk_cloudformation::Client::new(&aws);

    let template_url = upload::upload_template(&s3, &config.bucket, &document).await?;
    log::info!("Template uploaded to {template_url}");

    deploy::deploy_stack(&cloudformation, &config, &template_url).await?;
    log::info!("Stack submitted, CloudFormation takes it from here");

    Ok(())
}
