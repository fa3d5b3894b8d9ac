//! Common test helpers for the stream integration tests
//!
//! `StubClient` is an in-memory multipart store that records every call, it
//! can be told to fail at any step.

#![allow(dead_code, clippy::unwrap_used, clippy::missing_panics_doc)]

use anyhow::{Result, anyhow};
use bytes::{Bytes, BytesMut};
use s3stream::{
    s3::{
        actions::Part,
        checksum::{Checksum, ChecksumAlgorithm, HashSums},
    },
    stream::{MultipartClient, ObjectOptions, PartLimits},
};
use std::{
    collections::BTreeMap,
    io,
    pin::Pin,
    sync::Mutex,
    task::{Context, Poll},
};
use tokio::io::{AsyncRead, ReadBuf};

pub const UPLOAD_ID: &str = "VXBsb2FkIElEIGZvciBzM3N0cmVhbQ";

/// 4 byte parts, at most 5 parts, 100 bytes when the size is unknown
pub const SMALL_LIMITS: PartLimits = PartLimits {
    max_parts: 5,
    min_part_size: 4,
    max_object_size: 100,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create {
        key: String,
        options: ObjectOptions,
    },
    UploadPart {
        part_number: u16,
        size: usize,
        algorithms: Vec<ChecksumAlgorithm>,
        checksum: Option<Checksum>,
    },
    Complete {
        numbers: Vec<u16>,
    },
    Abort,
}

#[derive(Debug, Default)]
pub struct StubClient {
    pub sign_payload: bool,
    pub fail_create: bool,
    pub fail_part: Option<u16>,
    pub fail_complete: bool,
    pub fail_abort: bool,
    pub(crate) calls: Mutex<Vec<Call>>,
    pub(crate) bodies: Mutex<BTreeMap<u16, Bytes>>,
    pub(crate) completed: Mutex<Vec<Part>>,
}

impl StubClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// The object as the store would assemble it from the accepted parts
    pub fn object(&self) -> Bytes {
        let mut object = BytesMut::new();
        for body in self.bodies.lock().unwrap().values() {
            object.extend_from_slice(body);
        }
        object.freeze()
    }

    pub fn completed_parts(&self) -> Vec<Part> {
        self.completed.lock().unwrap().clone()
    }

    pub fn upload_part_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, Call::UploadPart { .. }))
            .collect()
    }

    pub fn completed(&self) -> bool {
        self.calls()
            .iter()
            .any(|call| matches!(call, Call::Complete { .. }))
    }

    pub fn aborted(&self) -> bool {
        self.calls().contains(&Call::Abort)
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl MultipartClient for StubClient {
    fn sign_payload(&self) -> bool {
        self.sign_payload
    }

    async fn create_multipart_upload(&self, key: &str, options: &ObjectOptions) -> Result<String> {
        self.record(Call::Create {
            key: key.to_string(),
            options: options.clone(),
        });

        if self.fail_create {
            return Err(anyhow!("HTTP Status Code: 403 Forbidden, AccessDenied"));
        }

        Ok(UPLOAD_ID.to_string())
    }

    async fn upload_part(
        &self,
        _key: &str,
        upload_id: &str,
        part_number: u16,
        body: Bytes,
        sums: &HashSums,
        additional_checksum: Option<&Checksum>,
    ) -> Result<String> {
        assert_eq!(upload_id, UPLOAD_ID);

        self.record(Call::UploadPart {
            part_number,
            size: body.len(),
            algorithms: sums.keys().copied().collect(),
            checksum: additional_checksum.cloned(),
        });

        if self.fail_part == Some(part_number) {
            return Err(anyhow!("HTTP Status Code: 500 Internal Server Error"));
        }

        // the store verifies Content-MD5
        let md5 = md5::compute(&body);
        if sums.get(&ChecksumAlgorithm::Md5).map(|d| &d[..]) != Some(&md5.0[..]) {
            return Err(anyhow!("BadDigest"));
        }

        let etag = format!("\"{md5:x}\"");

        self.bodies.lock().unwrap().insert(part_number, body);

        Ok(etag)
    }

    async fn complete_multipart_upload(
        &self,
        _key: &str,
        upload_id: &str,
        parts: &BTreeMap<u16, Part>,
    ) -> Result<String> {
        assert_eq!(upload_id, UPLOAD_ID);

        self.record(Call::Complete {
            numbers: parts.keys().copied().collect(),
        });

        if self.fail_complete {
            return Err(anyhow!("InvalidPart: One or more of the specified parts could not be found"));
        }

        self.completed
            .lock()
            .unwrap()
            .extend(parts.values().cloned());

        Ok(format!("\"{:x}-{}\"", md5::compute(self.object()), parts.len()))
    }

    async fn abort_multipart_upload(&self, _key: &str, upload_id: &str) -> Result<()> {
        assert_eq!(upload_id, UPLOAD_ID);

        self.record(Call::Abort);

        if self.fail_abort {
            return Err(anyhow!("NoSuchUpload"));
        }

        Ok(())
    }
}

/// Serves `data` then fails with a broken pipe
pub struct FailingReader {
    data: Vec<u8>,
}

impl FailingReader {
    pub fn new(data: &[u8]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }
}

impl AsyncRead for FailingReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        if self.data.is_empty() {
            return Poll::Ready(Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "broken pipe",
            )));
        }

        let n = self.data.len().min(buf.remaining());
        let chunk: Vec<u8> = self.data.drain(..n).collect();
        buf.put_slice(&chunk);

        Poll::Ready(Ok(()))
    }
}

/// Deterministic test data
pub fn data(len: usize) -> Vec<u8> {
    (0..len).map(|i| u8::try_from(i % 251).unwrap()).collect()
}
