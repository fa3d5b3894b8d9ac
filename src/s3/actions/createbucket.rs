use crate::s3::{
    S3,
    actions::{Action, response_error},
    request, tools,
};
use anyhow::{Result, anyhow};
use bytes::Bytes;
use http::Method;
use std::collections::BTreeMap;

#[derive(Debug)]
pub struct CreateBucket<'a> {
    acl: &'a str,
}

impl<'a> CreateBucket<'a> {
    #[must_use]
    pub const fn new(acl: &'a str) -> Self {
        Self { acl }
    }

    /// us-east-1 is the default location and must not be sent as a constraint
    #[must_use]
    pub fn body(s3: &S3) -> String {
        let region = s3.region().name();
        if region == "us-east-1" {
            return String::new();
        }

        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<CreateBucketConfiguration xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
    <LocationConstraint>{region}</LocationConstraint>
</CreateBucketConfiguration>"#
        )
    }

    /// Returns the `Location` header of the new bucket
    ///
    /// # Errors
    ///
    /// Will return `Err` if can not make the request
    pub async fn request(&self, s3: &S3) -> Result<Option<String>> {
        let xml = Self::body(s3);

        let (url, headers) = &self.sign(s3, &tools::sha256_hex(&xml), None, Some(xml.len()))?;

        let body = (!xml.is_empty()).then(|| Bytes::from(xml));

        let response = request::request(url.clone(), self.http_method(), headers, body).await?;

        if response.status().is_success() {
            Ok(response
                .headers()
                .get("location")
                .and_then(|location| location.to_str().ok())
                .map(ToString::to_string))
        } else {
            Err(anyhow!(response_error(response).await?))
        }
    }
}

impl Action for CreateBucket<'_> {
    fn http_method(&self) -> Method {
        Method::PUT
    }

    fn headers(&self) -> Option<BTreeMap<&str, &str>> {
        let mut map: BTreeMap<&str, &str> = BTreeMap::new();

        map.insert("x-amz-acl", self.acl);

        Some(map)
    }

    fn query_pairs(&self) -> Option<BTreeMap<&str, &str>> {
        None
    }

    fn path(&self) -> Option<Vec<&str>> {
        None
    }
}
