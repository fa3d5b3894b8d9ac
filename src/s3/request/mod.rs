use anyhow::Result;
use bytes::Bytes;
use reqwest::{
    Body, Client, Method, Response,
    header::{HeaderMap, HeaderName, HeaderValue},
};
use std::{collections::BTreeMap, path::Path};
use tokio::fs::File;
use tokio_util::codec::{BytesCodec, FramedRead};
use url::Url;

fn header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap> {
    headers
        .iter()
        .map(|(k, v)| Ok((k.parse::<HeaderName>()?, v.parse::<HeaderValue>()?)))
        .collect::<Result<HeaderMap>>()
}

/// # Errors
///
/// Will return `Err` if can not make the request
pub async fn request(
    url: Url,
    method: Method,
    headers: &BTreeMap<String, String>,
    body: Option<Bytes>,
) -> Result<Response> {
    let client = Client::new();

    let request = client.request(method, url).headers(header_map(headers)?);

    let request = match body {
        Some(body) => request.body(body),
        None => request,
    };

    Ok(request.send().await?)
}

/// Stream a file as the request body, the file is never read whole into memory
///
/// # Errors
///
/// Will return `Err` if the file can not be opened or the request fails
pub async fn upload_file(
    url: Url,
    method: Method,
    headers: &BTreeMap<String, String>,
    file_path: &Path,
) -> Result<Response> {
    let client = Client::new();

    let file = File::open(file_path).await?;
    let stream = FramedRead::with_capacity(file, BytesCodec::new(), 1024 * 256);

    let request = client
        .request(method, url)
        .headers(header_map(headers)?)
        .body(Body::wrap_stream(stream));

    Ok(request.send().await?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_header_map() {
        let mut headers = BTreeMap::new();
        headers.insert("x-amz-date".to_string(), "20240101T000000Z".to_string());
        headers.insert("content-md5".to_string(), "XrY7u+Ae7tCTyyK7j1rNww==".to_string());
        let map = header_map(&headers).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("x-amz-date").unwrap(), "20240101T000000Z");
    }

    #[test]
    fn test_header_map_invalid() {
        let mut headers = BTreeMap::new();
        headers.insert("bad header".to_string(), "value".to_string());
        assert!(header_map(&headers).is_err());
    }
}
