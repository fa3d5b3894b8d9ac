use crate::s3::{
    S3,
    actions::{Action, key_path, response_error},
    checksum::Checksum,
    request,
    signature::UNSIGNED_PAYLOAD,
};
use anyhow::{Result, anyhow};
use bytes::Bytes;
use http::Method;
use std::collections::BTreeMap;

/// Upload one in-memory part of a multipart upload
#[derive(Debug, Clone)]
pub struct UploadPart<'a> {
    key: &'a str,
    body: Bytes,
    part_number: String,
    upload_id: &'a str,
    // base64 MD5 of the body
    content_md5: &'a str,
    // hex SHA-256 of the body, None sends UNSIGNED-PAYLOAD
    sha256: Option<&'a str>,
    additional_checksum: Option<&'a Checksum>,
}

impl<'a> UploadPart<'a> {
    #[must_use]
    pub fn new(
        key: &'a str,
        body: Bytes,
        part_number: u16,
        upload_id: &'a str,
        content_md5: &'a str,
        sha256: Option<&'a str>,
        additional_checksum: Option<&'a Checksum>,
    ) -> Self {
        Self {
            key,
            body,
            part_number: part_number.to_string(),
            upload_id,
            content_md5,
            sha256,
            additional_checksum,
        }
    }

    /// Returns the `ETag` of the uploaded part
    ///
    /// # Errors
    ///
    /// Will return `Err` if can not make the request
    pub async fn request(self, s3: &S3) -> Result<String> {
        let (url, headers) = &self.sign(
            s3,
            self.sha256.unwrap_or(UNSIGNED_PAYLOAD),
            Some(self.content_md5),
            Some(self.body.len()),
        )?;

        let response =
            request::request(url.clone(), self.http_method(), headers, Some(self.body)).await?;

        if response.status().is_success() {
            match response.headers().get("ETag") {
                Some(etag) => Ok(etag.to_str()?.to_string()),
                None => Err(anyhow!("missing ETag")),
            }
        } else {
            Err(anyhow!(response_error(response).await?))
        }
    }
}

impl Action for UploadPart<'_> {
    fn http_method(&self) -> Method {
        Method::PUT
    }

    fn headers(&self) -> Option<BTreeMap<&str, &str>> {
        self.additional_checksum.map(|checksum| {
            let mut map: BTreeMap<&str, &str> = BTreeMap::new();
            map.insert(checksum.algorithm.as_header(), &checksum.checksum);
            map
        })
    }

    fn query_pairs(&self) -> Option<BTreeMap<&str, &str>> {
        let mut map: BTreeMap<&str, &str> = BTreeMap::new();
        map.insert("partNumber", &self.part_number);
        map.insert("uploadId", self.upload_id);
        Some(map)
    }

    fn path(&self) -> Option<Vec<&str>> {
        Some(key_path(self.key))
    }
}
