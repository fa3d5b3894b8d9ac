use crate::{
    cli::actions::Action,
    s3::S3,
    stream::{ObjectSize, put_stream},
};
use anyhow::Result;
use bytesize::ByteSize;

/// Run the action, a streamed upload reads STDIN until it ends
///
/// # Errors
///
/// Will return an error if the bucket can not be created or the upload fails
pub async fn dispatch(s3: &S3, action: Action) -> Result<()> {
    match action {
        Action::Stream {
            key,
            size,
            options,
            create_bucket,
        } => {
            if create_bucket {
                ensure_bucket(s3, options.object.acl.as_deref()).await?;
            }

            if let ObjectSize::Known(size) = size {
                log::info!("expected size: {}", ByteSize(size));
            }

            let mut stdin = tokio::io::stdin();

            let output = put_stream(s3, &key, &mut stdin, size, &options).await?;

            log::info!(
                "uploaded {} in {} parts",
                ByteSize(output.uploaded),
                output.parts
            );

            println!("ETag: {}", output.etag);
        }

        Action::Put {
            key,
            file,
            content_type,
            acl,
            meta,
            create_bucket,
        } => {
            if create_bucket {
                ensure_bucket(s3, acl.as_deref()).await?;
            }

            let meta = (!meta.is_empty()).then_some(&meta);

            let (etag, size) = s3
                .put_object(&key, &file, content_type.as_deref(), acl.as_deref(), meta)
                .await?;

            log::info!("uploaded {} from {}", ByteSize(size), file.display());

            println!("ETag: {etag}");
        }
    }

    Ok(())
}

async fn ensure_bucket(s3: &S3, acl: Option<&str>) -> Result<()> {
    if s3.bucket_exists().await? {
        log::debug!("bucket exists: {}", s3.bucket().unwrap_or_default());
        return Ok(());
    }

    let location = s3.create_bucket(acl.unwrap_or("private")).await?;

    log::info!(
        "created bucket: {}, location: {}",
        s3.bucket().unwrap_or_default(),
        location.unwrap_or_default()
    );

    Ok(())
}
