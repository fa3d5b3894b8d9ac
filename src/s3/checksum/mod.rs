//! Digests computed while streaming parts
//!
//! MD5 goes into `Content-MD5`, SHA-256 into `x-amz-content-sha256` when the
//! payload is signed, and the additional algorithms into `x-amz-checksum-*`.
//! <https://docs.aws.amazon.com/AmazonS3/latest/userguide/checking-object-integrity.html>

pub mod hasher;

use self::hasher::{
    ChecksumHasher, Crc32Hasher, Crc32cHasher, Md5Hasher, Sha1Hasher, Sha256Hasher,
};
use anyhow::{Result, anyhow};
use base64ct::{Base64, Encoding};
use bytes::Bytes;
use std::{collections::BTreeMap, fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChecksumAlgorithm {
    Md5,
    Sha256,
    Crc32,
    Crc32c,
    Sha1,
}

/// Finalized digests of a single part, keyed by algorithm
pub type HashSums = BTreeMap<ChecksumAlgorithm, Bytes>;

impl ChecksumAlgorithm {
    #[must_use]
    pub fn hasher(self) -> Box<dyn ChecksumHasher> {
        match self {
            Self::Md5 => Box::<Md5Hasher>::default(),
            Self::Sha256 => Box::<Sha256Hasher>::default(),
            Self::Crc32 => Box::<Crc32Hasher>::default(),
            Self::Crc32c => Box::<Crc32cHasher>::default(),
            Self::Sha1 => Box::<Sha1Hasher>::default(),
        }
    }

    /// Value for the `x-amz-checksum-algorithm` header
    #[must_use]
    pub const fn as_algorithm(self) -> &'static str {
        match self {
            Self::Md5 => "MD5",
            Self::Sha256 => "SHA256",
            Self::Crc32 => "CRC32",
            Self::Crc32c => "CRC32C",
            Self::Sha1 => "SHA1",
        }
    }

    /// Per part header carrying the base64 digest
    #[must_use]
    pub const fn as_header(self) -> &'static str {
        match self {
            Self::Md5 => "content-md5",
            Self::Sha256 => "x-amz-checksum-sha256",
            Self::Crc32 => "x-amz-checksum-crc32",
            Self::Crc32c => "x-amz-checksum-crc32c",
            Self::Sha1 => "x-amz-checksum-sha1",
        }
    }

    /// Element name of the checksum inside a `CompleteMultipartUpload` part
    #[must_use]
    pub const fn as_element(self) -> &'static str {
        match self {
            Self::Md5 => "ContentMD5",
            Self::Sha256 => "ChecksumSHA256",
            Self::Crc32 => "ChecksumCRC32",
            Self::Crc32c => "ChecksumCRC32C",
            Self::Sha1 => "ChecksumSHA1",
        }
    }
}

impl FromStr for ChecksumAlgorithm {
    type Err = anyhow::Error;

    /// Only the algorithms S3 accepts as additional checksums
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "crc32" => Ok(Self::Crc32),
            "crc32c" => Ok(Self::Crc32c),
            "sha1" => Ok(Self::Sha1),
            "sha256" => Ok(Self::Sha256),
            _ => Err(anyhow!("unsupported checksum algorithm: {s}")),
        }
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_algorithm().to_lowercase())
    }
}

/// An additional checksum requested for every part of an upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checksum {
    pub algorithm: ChecksumAlgorithm,
    pub checksum: String,
}

impl Checksum {
    #[must_use]
    pub const fn new(algorithm: ChecksumAlgorithm) -> Self {
        Self {
            algorithm,
            checksum: String::new(),
        }
    }

    /// Take the base64 digest of this algorithm from a finalized set
    #[must_use]
    pub fn from_sums(algorithm: ChecksumAlgorithm, sums: &HashSums) -> Option<Self> {
        sums.get(&algorithm).map(|digest| Self {
            algorithm,
            checksum: Base64::encode_string(digest),
        })
    }
}
