use crate::s3::{
    S3,
    actions::{Action, key_path, response_error},
    request, tools,
};
use anyhow::{Result, anyhow};
use http::Method;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct AbortMultipartUpload<'a> {
    key: &'a str,
    upload_id: &'a str,
}

impl<'a> AbortMultipartUpload<'a> {
    #[must_use]
    pub const fn new(key: &'a str, upload_id: &'a str) -> Self {
        Self { key, upload_id }
    }

    /// # Errors
    ///
    /// Will return `Err` if can not make the request
    pub async fn request(&self, s3: &S3) -> Result<()> {
        let (url, headers) = &self.sign(s3, &tools::sha256_hex(""), None, None)?;

        let response = request::request(url.clone(), self.http_method(), headers, None).await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(anyhow!(response_error(response).await?))
        }
    }
}

impl Action for AbortMultipartUpload<'_> {
    fn http_method(&self) -> Method {
        Method::DELETE
    }

    fn headers(&self) -> Option<BTreeMap<&str, &str>> {
        None
    }

    fn query_pairs(&self) -> Option<BTreeMap<&str, &str>> {
        let mut map: BTreeMap<&str, &str> = BTreeMap::new();

        // uploadId - Upload ID that identifies the multipart upload.
        map.insert("uploadId", self.upload_id);

        Some(map)
    }

    fn path(&self) -> Option<Vec<&str>> {
        Some(key_path(self.key))
    }
}
