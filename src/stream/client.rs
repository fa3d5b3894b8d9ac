use crate::s3::{
    S3,
    actions::{
        AbortMultipartUpload, CompleteMultipartUpload, CreateMultipartUpload, Part, UploadPart,
    },
    checksum::{Checksum, ChecksumAlgorithm, HashSums},
    tools::write_hex_bytes,
};
use anyhow::{Result, anyhow};
use base64ct::{Base64, Encoding};
use bytes::Bytes;
use std::{collections::BTreeMap, future::Future};

/// Object level options sent when the upload is initiated
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectOptions {
    pub acl: Option<String>,
    pub content_type: Option<String>,
    /// header name (`x-amz-meta-*`) to value
    pub meta: BTreeMap<String, String>,
    pub additional_checksum: Option<ChecksumAlgorithm>,
}

/// The multipart operations the stream uploader needs from a store
pub trait MultipartClient {
    /// Whether parts must carry a SHA-256 of their payload
    fn sign_payload(&self) -> bool;

    /// Returns the upload id
    fn create_multipart_upload(
        &self,
        key: &str,
        options: &ObjectOptions,
    ) -> impl Future<Output = Result<String>> + Send;

    /// Returns the `ETag` of the part
    fn upload_part(
        &self,
        key: &str,
        upload_id: &str,
        part_number: u16,
        body: Bytes,
        sums: &HashSums,
        additional_checksum: Option<&Checksum>,
    ) -> impl Future<Output = Result<String>> + Send;

    /// Returns the `ETag` of the assembled object
    fn complete_multipart_upload(
        &self,
        key: &str,
        upload_id: &str,
        parts: &BTreeMap<u16, Part>,
    ) -> impl Future<Output = Result<String>> + Send;

    fn abort_multipart_upload(
        &self,
        key: &str,
        upload_id: &str,
    ) -> impl Future<Output = Result<()>> + Send;
}

impl MultipartClient for S3 {
    fn sign_payload(&self) -> bool {
        Self::sign_payload(self)
    }

    async fn create_multipart_upload(&self, key: &str, options: &ObjectOptions) -> Result<String> {
        let meta = (!options.meta.is_empty()).then_some(&options.meta);

        let action = CreateMultipartUpload::new(
            key,
            options.acl.as_deref(),
            meta,
            options.additional_checksum,
        )
        .with_content_type(options.content_type.as_deref());

        Ok(action.request(self).await?.upload_id)
    }

    async fn upload_part(
        &self,
        key: &str,
        upload_id: &str,
        part_number: u16,
        body: Bytes,
        sums: &HashSums,
        additional_checksum: Option<&Checksum>,
    ) -> Result<String> {
        let md5 = sums
            .get(&ChecksumAlgorithm::Md5)
            .map(|digest| Base64::encode_string(digest))
            .ok_or_else(|| anyhow!("missing MD5 digest for part {part_number}"))?;

        let sha256 = if self.sign_payload() {
            Some(
                sums.get(&ChecksumAlgorithm::Sha256)
                    .map(|digest| write_hex_bytes(digest))
                    .ok_or_else(|| anyhow!("missing SHA256 digest for part {part_number}"))?,
            )
        } else {
            None
        };

        let action = UploadPart::new(
            key,
            body,
            part_number,
            upload_id,
            &md5,
            sha256.as_deref(),
            additional_checksum,
        );

        action.request(self).await
    }

    async fn complete_multipart_upload(
        &self,
        key: &str,
        upload_id: &str,
        parts: &BTreeMap<u16, Part>,
    ) -> Result<String> {
        let action = CompleteMultipartUpload::new(key, upload_id, parts);

        Ok(action.request(self).await?.e_tag)
    }

    async fn abort_multipart_upload(&self, key: &str, upload_id: &str) -> Result<()> {
        AbortMultipartUpload::new(key, upload_id).request(self).await
    }
}
