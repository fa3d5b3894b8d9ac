pub mod actions;
pub mod checksum;
pub mod credentials;
pub mod limits;
pub mod region;
pub mod request;
pub mod responses;
pub mod signature;
pub mod tools;

pub use self::{credentials::Credentials, region::Region, signature::Signature};

use anyhow::{Result, anyhow};
use std::{collections::BTreeMap, fmt, path::Path};
use url::Url;

#[derive(Debug, Clone)]
pub struct S3 {
    // AWS Credentials
    credentials: Credentials,
    // AWS Region
    region: Region,
    // bucket name
    bucket: Option<String>,
    // use https
    secure: bool,
    // skip signing requests (public buckets)
    no_sign_request: bool,
}

// Amazon S3 API Reference
// <https://docs.aws.amazon.com/AmazonS3/latest/API/API_Operations.html>
impl S3 {
    #[must_use]
    pub fn new(
        credentials: &Credentials,
        region: &Region,
        bucket: Option<String>,
        secure: bool,
    ) -> Self {
        Self {
            credentials: credentials.clone(),
            region: region.clone(),
            bucket,
            secure,
            no_sign_request: false,
        }
    }

    #[must_use]
    pub const fn with_no_sign_request(mut self, no_sign_request: bool) -> Self {
        self.no_sign_request = no_sign_request;
        self
    }

    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    #[must_use]
    pub const fn region(&self) -> &Region {
        &self.region
    }

    #[must_use]
    pub fn bucket(&self) -> Option<&str> {
        self.bucket.as_deref()
    }

    #[must_use]
    pub const fn secure(&self) -> bool {
        self.secure
    }

    #[must_use]
    pub const fn no_sign_request(&self) -> bool {
        self.no_sign_request
    }

    /// Payloads are hashed into the signature only when the transport is not
    /// encrypted, over https parts are sent as `UNSIGNED-PAYLOAD`.
    #[must_use]
    pub const fn sign_payload(&self) -> bool {
        !self.secure && !self.no_sign_request
    }

    /// Path-style endpoint: `scheme://host/bucket`
    ///
    /// # Errors
    ///
    /// Will return `Err` if the endpoint can not be parsed as a URL
    pub fn endpoint(&self) -> Result<Url> {
        let scheme = if self.secure { "https" } else { "http" };

        let mut url = Url::parse(&format!("{scheme}://{}", self.region.endpoint()))?;

        if let Some(bucket) = &self.bucket {
            url.path_segments_mut()
                .map_err(|()| anyhow!("endpoint cannot be a base: {}", self.region.endpoint()))?
                .push(bucket);
        }

        Ok(url)
    }
}

// shortcuts for the bucket and single shot actions used by the CLI
impl S3 {
    /// # Errors
    ///
    /// Will return `Err` if the request fails or the response is not a 200 or 404
    pub async fn bucket_exists(&self) -> Result<bool> {
        actions::HeadBucket::new().request(self).await
    }

    /// Returns the location of the new bucket, if the store sends one
    ///
    /// # Errors
    ///
    /// Will return `Err` if the bucket can not be created
    pub async fn create_bucket(&self, acl: &str) -> Result<Option<String>> {
        actions::CreateBucket::new(acl).request(self).await
    }

    /// Upload a file with a single request, returns the `ETag` and the size
    ///
    /// # Errors
    ///
    /// Will return `Err` if the file can not be read or the store rejects it
    pub async fn put_object(
        &self,
        key: &str,
        file: &Path,
        content_type: Option<&str>,
        acl: Option<&str>,
        meta: Option<&BTreeMap<String, String>>,
    ) -> Result<(String, u64)> {
        actions::PutObject::new(key, file, content_type, acl, meta)
            .request(self)
            .await
    }
}

impl fmt::Display for S3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "endpoint: {}\nregion: {}\nbucket: {}\naccess key: {}\nsecure: {}",
            self.region.endpoint(),
            self.region.name(),
            self.bucket.as_deref().unwrap_or_default(),
            self.credentials.aws_access_key_id(),
            self.secure
        )
    }
}
