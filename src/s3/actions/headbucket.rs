use crate::s3::{
    S3,
    actions::{Action, response_error},
    request, tools,
};
use anyhow::{Result, anyhow};
use http::{Method, StatusCode};
use std::collections::BTreeMap;

/// Check whether the configured bucket exists and is accessible
#[derive(Debug, Default)]
pub struct HeadBucket;

impl HeadBucket {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Returns `false` on 404, `true` on success
    ///
    /// # Errors
    ///
    /// Will return `Err` on any other response or if the request fails
    pub async fn request(&self, s3: &S3) -> Result<bool> {
        let (url, headers) = &self.sign(s3, &tools::sha256_hex(""), None, None)?;

        let response = request::request(url.clone(), self.http_method(), headers, None).await?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(anyhow!(response_error(response).await?)),
        }
    }
}

impl Action for HeadBucket {
    fn http_method(&self) -> Method {
        Method::HEAD
    }

    fn headers(&self) -> Option<BTreeMap<&str, &str>> {
        None
    }

    fn query_pairs(&self) -> Option<BTreeMap<&str, &str>> {
        None
    }

    fn path(&self) -> Option<Vec<&str>> {
        None
    }
}
