use std::io;
use thiserror::Error;

/// Why a streamed upload stopped
#[derive(Error, Debug)]
pub enum StreamError {
    /// A known size of zero can not be planned
    #[error("invalid object size: {0}")]
    InvalidSize(u64),

    #[error("object size {size} exceeds the maximum of {max} bytes for a multipart upload")]
    EntityTooLarge { size: u64, max: u64 },

    #[error("could not initiate multipart upload: {0:#}")]
    Initiate(#[source] anyhow::Error),

    #[error("error reading part {part_number}: {source}")]
    Read {
        part_number: u16,
        #[source]
        source: io::Error,
    },

    #[error("error uploading part {part_number}: {source:#}")]
    UploadPart {
        part_number: u16,
        #[source]
        source: anyhow::Error,
    },

    #[error("unexpected end of stream, expected {expected} bytes but uploaded {uploaded}")]
    UnexpectedEof { expected: u64, uploaded: u64 },

    /// Recorded parts are not contiguous, an internal bookkeeping fault
    #[error("missing part number {0}")]
    MissingPart(u16),

    #[error("could not complete multipart upload: {0:#}")]
    Complete(#[source] anyhow::Error),
}

/// A failed upload with the bytes the store already accepted
#[derive(Error, Debug)]
#[error("{error} ({uploaded} bytes uploaded)")]
pub struct StreamFailure {
    pub uploaded: u64,
    #[source]
    pub error: StreamError,
}

impl StreamFailure {
    #[must_use]
    pub const fn new(uploaded: u64, error: StreamError) -> Self {
        Self { uploaded, error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let failure = StreamFailure::new(
            128,
            StreamError::UploadPart {
                part_number: 3,
                source: anyhow::anyhow!("HTTP Status Code: 500"),
            },
        );
        assert_eq!(
            failure.to_string(),
            "error uploading part 3: HTTP Status Code: 500 (128 bytes uploaded)"
        );
    }

    #[test]
    fn test_unexpected_eof() {
        let error = StreamError::UnexpectedEof {
            expected: 10,
            uploaded: 4,
        };
        assert_eq!(
            error.to_string(),
            "unexpected end of stream, expected 10 bytes but uploaded 4"
        );
    }
}
