//! Amazon S3 object store
//!
//! Objects are written with a private ACL. Credentials come from the static
//! keys in [`S3Config`] when present, otherwise from the default AWS chain
//! (environment, profile, instance metadata).

use super::traits::{CompletedPart, ObjectStore};
use crate::config::S3Config;
use crate::domain::{ExportError, Result};
use async_trait::async_trait;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{
    CompletedMultipartUpload, CompletedPart as S3CompletedPart, ObjectCannedAcl,
};
use aws_sdk_s3::Client;
use secrecy::ExposeSecret;

/// S3-backed [`ObjectStore`] bound to one bucket
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
    region: String,
    endpoint_url: Option<String>,
}

impl S3ObjectStore {
    /// Builds an S3 client from configuration
    pub async fn from_config(config: &S3Config) -> Result<Self> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if let (Some(key_id), Some(secret)) = (&config.access_key_id, &config.secret_access_key) {
            loader = loader.credentials_provider(Credentials::new(
                key_id.expose_secret().as_ref(),
                secret.expose_secret().as_ref(),
                None,
                None,
                "sumo-export-config",
            ));
        }

        let shared = loader.load().await;
        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = &config.endpoint_url {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        tracing::debug!(
            bucket = %config.bucket,
            region = %config.region,
            endpoint = ?config.endpoint_url,
            "S3 client configured"
        );

        Ok(Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
            region: config.region.clone(),
            endpoint_url: config.endpoint_url.clone(),
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

fn transfer_error<E>(action: &str, key: &str, err: E) -> ExportError
where
    E: std::error::Error,
{
    ExportError::Transfer(format!(
        "{action} failed for {key}: {}",
        DisplayErrorContext(&err)
    ))
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .acl(ObjectCannedAcl::Private)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| transfer_error("PutObject", key, e))?;
        Ok(())
    }

    async fn create_multipart_upload(&self, key: &str, content_type: &str) -> Result<String> {
        let output = self
            .client
            .create_multipart_upload()
            .bucket(&self.bucket)
            .key(key)
            .acl(ObjectCannedAcl::Private)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| transfer_error("CreateMultipartUpload", key, e))?;

        output.upload_id().map(str::to_string).ok_or_else(|| {
            ExportError::Transfer(format!("CreateMultipartUpload returned no upload ID for {key}"))
        })
    }

    async fn upload_part(
        &self,
        key: &str,
        upload_id: &str,
        part_number: i32,
        body: Vec<u8>,
    ) -> Result<CompletedPart> {
        let output = self
            .client
            .upload_part()
            .bucket(&self.bucket)
            .key(key)
            .upload_id(upload_id)
            .part_number(part_number)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| transfer_error("UploadPart", key, e))?;

        let e_tag = output.e_tag().map(str::to_string).ok_or_else(|| {
            ExportError::Transfer(format!(
                "UploadPart returned no ETag for part {part_number} of {key}"
            ))
        })?;

        Ok(CompletedPart { part_number, e_tag })
    }

    async fn complete_multipart_upload(
        &self,
        key: &str,
        upload_id: &str,
        parts: Vec<CompletedPart>,
    ) -> Result<()> {
        let parts = parts
            .into_iter()
            .map(|p| {
                S3CompletedPart::builder()
                    .part_number(p.part_number)
                    .e_tag(p.e_tag)
                    .build()
            })
            .collect();

        self.client
            .complete_multipart_upload()
            .bucket(&self.bucket)
            .key(key)
            .upload_id(upload_id)
            .multipart_upload(
                CompletedMultipartUpload::builder()
                    .set_parts(Some(parts))
                    .build(),
            )
            .send()
            .await
            .map_err(|e| transfer_error("CompleteMultipartUpload", key, e))?;
        Ok(())
    }

    async fn abort_multipart_upload(&self, key: &str, upload_id: &str) -> Result<()> {
        self.client
            .abort_multipart_upload()
            .bucket(&self.bucket)
            .key(key)
            .upload_id(upload_id)
            .send()
            .await
            .map_err(|e| transfer_error("AbortMultipartUpload", key, e))?;
        Ok(())
    }

    fn location(&self, key: &str) -> String {
        match &self.endpoint_url {
            Some(endpoint) => format!("{}/{}/{}", endpoint.trim_end_matches('/'), self.bucket, key),
            None => format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            ),
        }
    }
}
