use crate::s3::{
    S3,
    actions::{Action, key_path, response_error},
    checksum::Checksum,
    request,
    responses::CompleteMultipartUploadResult,
    tools,
};
use anyhow::{Result, anyhow};
use bytes::Bytes;
use http::Method;
use quick_xml::{de::from_str, se::to_string};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::collections::BTreeMap;

/// A part accepted by the store
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Part {
    pub etag: String,
    pub number: u16,
    // bytes sent in this part, not part of the completion body
    pub size: u64,
    pub checksum: Option<Checksum>,
}

impl Serialize for Part {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let len = if self.checksum.is_some() { 3 } else { 2 };
        let mut state = serializer.serialize_struct("Part", len)?;
        state.serialize_field("ETag", &self.etag)?;
        state.serialize_field("PartNumber", &self.number)?;
        if let Some(checksum) = &self.checksum {
            state.serialize_field(checksum.algorithm.as_element(), &checksum.checksum)?;
        }
        state.end()
    }
}

// <CompleteMultipartUpload><Part>...</Part></CompleteMultipartUpload>
struct Body<'a> {
    parts: Vec<&'a Part>,
}

impl Serialize for Body<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("CompleteMultipartUpload", 1)?;
        state.serialize_field("Part", &self.parts)?;
        state.end()
    }
}

#[derive(Debug)]
pub struct CompleteMultipartUpload<'a> {
    key: &'a str,
    upload_id: &'a str,
    parts: &'a BTreeMap<u16, Part>,
}

impl<'a> CompleteMultipartUpload<'a> {
    /// `parts` is keyed by part number, the body lists them in ascending order
    #[must_use]
    pub const fn new(key: &'a str, upload_id: &'a str, parts: &'a BTreeMap<u16, Part>) -> Self {
        Self {
            key,
            upload_id,
            parts,
        }
    }

    /// # Errors
    ///
    /// Will return `Err` if the body can not be serialized
    pub fn body(&self) -> Result<String> {
        let body = Body {
            parts: self.parts.values().collect(),
        };
        Ok(to_string(&body)?)
    }

    /// # Errors
    ///
    /// Will return `Err` if can not make the request
    pub async fn request(&self, s3: &S3) -> Result<CompleteMultipartUploadResult> {
        let body = self.body()?;

        log::debug!("complete multipart upload body: {body}");

        let (url, headers) = &self.sign(
            s3,
            &tools::sha256_hex(&body),
            Some(&tools::base64_md5(&body)),
            Some(body.len()),
        )?;

        let response = request::request(
            url.clone(),
            self.http_method(),
            headers,
            Some(Bytes::from(body)),
        )
        .await?;

        // S3 may answer 200 with an <Error> body, check the body before trusting the status
        if response.status().is_success() {
            let text = response.text().await?;
            from_str::<CompleteMultipartUploadResult>(&text)
                .map_err(|e| anyhow!("unexpected CompleteMultipartUpload response: {e}\n{text}"))
        } else {
            Err(anyhow!(response_error(response).await?))
        }
    }
}

impl Action for CompleteMultipartUpload<'_> {
    fn http_method(&self) -> Method {
        Method::POST
    }

    fn headers(&self) -> Option<BTreeMap<&str, &str>> {
        None
    }

    fn query_pairs(&self) -> Option<BTreeMap<&str, &str>> {
        let mut map: BTreeMap<&str, &str> = BTreeMap::new();
        map.insert("uploadId", self.upload_id);
        Some(map)
    }

    fn path(&self) -> Option<Vec<&str>> {
        Some(key_path(self.key))
    }
}
