use bytes::Bytes;
use crc32c::crc32c_append;
use ring::digest::{Context, SHA1_FOR_LEGACY_USE_ONLY, SHA256};

/// A rolling digest, fed chunk by chunk and consumed on finalize.
pub trait ChecksumHasher: Send + Sync {
    fn update(&mut self, bytes: &[u8]);

    fn finalize(self: Box<Self>) -> Bytes;
}

// CRC32
#[derive(Default)]
pub struct Crc32Hasher(crc32fast::Hasher);

impl ChecksumHasher for Crc32Hasher {
    fn update(&mut self, bytes: &[u8]) {
        self.0.update(bytes);
    }

    fn finalize(self: Box<Self>) -> Bytes {
        Bytes::copy_from_slice(&self.0.finalize().to_be_bytes())
    }
}

// CRC32C
#[derive(Default)]
pub struct Crc32cHasher(u32);

impl ChecksumHasher for Crc32cHasher {
    fn update(&mut self, bytes: &[u8]) {
        self.0 = crc32c_append(self.0, bytes);
    }

    fn finalize(self: Box<Self>) -> Bytes {
        Bytes::copy_from_slice(&self.0.to_be_bytes())
    }
}

// Md5
pub struct Md5Hasher(md5::Context);

impl Default for Md5Hasher {
    fn default() -> Self {
        Self(md5::Context::new())
    }
}

impl ChecksumHasher for Md5Hasher {
    fn update(&mut self, bytes: &[u8]) {
        self.0.consume(bytes);
    }

    fn finalize(self: Box<Self>) -> Bytes {
        Bytes::copy_from_slice(&self.0.finalize().0)
    }
}

// Sha1
pub struct Sha1Hasher(Context);

impl Default for Sha1Hasher {
    fn default() -> Self {
        Self(Context::new(&SHA1_FOR_LEGACY_USE_ONLY))
    }
}

impl ChecksumHasher for Sha1Hasher {
    fn update(&mut self, bytes: &[u8]) {
        self.0.update(bytes);
    }

    fn finalize(self: Box<Self>) -> Bytes {
        Bytes::copy_from_slice(self.0.finish().as_ref())
    }
}

// Sha256
pub struct Sha256Hasher(Context);

impl Default for Sha256Hasher {
    fn default() -> Self {
        Self(Context::new(&SHA256))
    }
}

impl ChecksumHasher for Sha256Hasher {
    fn update(&mut self, bytes: &[u8]) {
        self.0.update(bytes);
    }

    fn finalize(self: Box<Self>) -> Bytes {
        Bytes::copy_from_slice(self.0.finish().as_ref())
    }
}
