use aws_sdk_s3::primitives::ByteStream;
use eyre::WrapErr;

/// Upload the rendered template to S3 and return its URL
///
/// The key is derived from the content, so re-deploying an unchanged
/// template overwrites the same object.
pub async fn upload_template(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    body: &str,
) -> eyre::Result<String> {
    let key = format!("cloudformation/templates/{}.json", sha256::digest(body));

    client
        .put_object()
        .bucket(bucket)
        .key(&key)
        .body(ByteStream::from(body.as_bytes().to_vec()))
        .send()
        .await
        .wrap_err("Failed to upload template to S3")?;

    Ok(format!("https://{bucket}.s3.amazonaws.com/{key}"))
}
