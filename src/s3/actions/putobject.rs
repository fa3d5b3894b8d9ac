use crate::s3::{
    S3,
    actions::{Action, key_path, response_error},
    request,
    signature::UNSIGNED_PAYLOAD,
    tools,
};
use anyhow::{Result, anyhow};
use base64ct::{Base64, Encoding};
use futures::stream::TryStreamExt;
use http::Method;
use std::{collections::BTreeMap, path::Path};
use tokio::fs::File;
use tokio_util::codec::{BytesCodec, FramedRead};

/// Single request upload of a file, no multipart
#[derive(Debug)]
pub struct PutObject<'a> {
    key: &'a str,
    file: &'a Path,
    content_type: Option<&'a str>,
    acl: Option<&'a str>,
    meta: Option<&'a BTreeMap<String, String>>,
}

impl<'a> PutObject<'a> {
    #[must_use]
    pub const fn new(
        key: &'a str,
        file: &'a Path,
        content_type: Option<&'a str>,
        acl: Option<&'a str>,
        meta: Option<&'a BTreeMap<String, String>>,
    ) -> Self {
        Self {
            key,
            file,
            content_type,
            acl,
            meta,
        }
    }

    /// Returns the `ETag` of the object and the bytes written
    ///
    /// # Errors
    ///
    /// Will return `Err` if the file can not be read or the request fails
    pub async fn request(&self, s3: &S3) -> Result<(String, u64)> {
        let (sha256, md5, length) = digest_file(self.file, s3.sign_payload()).await?;

        let (url, headers) = &self.sign(
            s3,
            sha256.as_deref().unwrap_or(UNSIGNED_PAYLOAD),
            Some(&md5),
            Some(length),
        )?;

        let response =
            request::upload_file(url.clone(), self.http_method(), headers, self.file).await?;

        if response.status().is_success() {
            let etag = response
                .headers()
                .get("ETag")
                .map(|etag| etag.to_str().map(ToString::to_string))
                .transpose()?
                .unwrap_or_default();
            Ok((etag, u64::try_from(length)?))
        } else {
            Err(anyhow!(response_error(response).await?))
        }
    }
}

// one pass over the file for the MD5, and the SHA-256 when the payload is signed
async fn digest_file(path: &Path, sign_payload: bool) -> Result<(Option<String>, String, usize)> {
    let file = File::open(path).await?;
    let mut stream = FramedRead::with_capacity(file, BytesCodec::new(), 1024 * 256);

    let mut md5 = md5::Context::new();
    let mut sha = sign_payload.then(|| ring::digest::Context::new(&ring::digest::SHA256));
    let mut length: usize = 0;

    while let Some(bytes) = stream.try_next().await? {
        md5.consume(&bytes);
        if let Some(sha) = sha.as_mut() {
            sha.update(&bytes);
        }
        length += bytes.len();
    }

    let sha256 = sha.map(|sha| tools::write_hex_bytes(sha.finish().as_ref()));
    let md5 = Base64::encode_string(&md5.finalize().0);

    Ok((sha256, md5, length))
}

impl Action for PutObject<'_> {
    fn http_method(&self) -> Method {
        Method::PUT
    }

    fn headers(&self) -> Option<BTreeMap<&str, &str>> {
        let mut map: BTreeMap<&str, &str> = BTreeMap::new();

        if let Some(content_type) = self.content_type {
            map.insert("content-type", content_type);
        }

        if let Some(acl) = self.acl {
            map.insert("x-amz-acl", acl);
        }

        if let Some(meta) = self.meta {
            for (k, v) in meta {
                map.insert(k, v);
            }
        }

        Some(map)
    }

    fn query_pairs(&self) -> Option<BTreeMap<&str, &str>> {
        None
    }

    fn path(&self) -> Option<Vec<&str>> {
        Some(key_path(self.key))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::s3::{Credentials, Region};
    use secrecy::SecretString;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_headers() {
        let path = Path::new("/tmp/x");
        let action = PutObject::new("key", path, Some("text/plain"), None, None);
        let headers = action.headers().unwrap();
        assert_eq!(headers.get("content-type"), Some(&"text/plain"));
        assert!(headers.get("x-amz-acl").is_none());
    }

    #[tokio::test]
    async fn test_digest_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"hello world").unwrap();

        let (sha, md5, length) = digest_file(file.path(), true).await.unwrap();
        assert_eq!(
            sha.as_deref(),
            Some("b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9")
        );
        assert_eq!(md5, "XrY7u+Ae7tCTyyK7j1rNww==");
        assert_eq!(length, 11);

        let (sha, _, _) = digest_file(file.path(), false).await.unwrap();
        assert!(sha.is_none());
    }

    #[tokio::test]
    async fn test_request() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"hello world").unwrap();

        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/stream-test/dir/hello.txt")
            .match_header("content-type", "text/plain")
            .match_header("content-md5", "XrY7u+Ae7tCTyyK7j1rNww==")
            .match_body("hello world")
            .with_status(200)
            .with_header("ETag", "\"5eb63bbbe01eeed093cb22bb8f5acdc3\"")
            .create_async()
            .await;

        let s3 = S3::new(
            &Credentials::new("access", &SecretString::new("secret".into())),
            &Region::Custom {
                name: String::new(),
                endpoint: server.host_with_port(),
            },
            Some("stream-test".to_string()),
            false,
        );

        let action = PutObject::new("dir/hello.txt", file.path(), Some("text/plain"), None, None);
        let (etag, length) = action.request(&s3).await.unwrap();
        assert_eq!(etag, "\"5eb63bbbe01eeed093cb22bb8f5acdc3\"");
        assert_eq!(length, 11);
        mock.assert_async().await;
    }
}
