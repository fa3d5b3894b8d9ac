//! Multipart upload limits
//!
//! Part counts and sizes every S3 compatible store is assumed to honour.
//!
//! # References
//! - [S3 Quotas](https://docs.aws.amazon.com/AmazonS3/latest/userguide/qfacts.html)
//! - [Multipart Upload Overview](https://docs.aws.amazon.com/AmazonS3/latest/userguide/mpuoverview.html)

/// Maximum number of parts in a multipart upload, numbered 1 to 10,000
///
/// Part numbers are `u16`, if this ever grows past 65,535 the part number
/// type has to change too.
pub const MAX_PARTS_PER_UPLOAD: u16 = 10_000;

/// Smallest part the planner will use (64 MiB)
///
/// Every part size is a multiple of this value, which keeps the
/// per part memory predictable and well above the 5 MiB store minimum.
pub const MIN_PART_SIZE_BYTES: u64 = 64 * 1024 * 1024;

/// Largest object streamed in a single multipart upload (640 GiB)
///
/// Streams of unknown size are planned against this ceiling.
pub const MAX_MULTIPART_OBJECT_SIZE_BYTES: u64 = 640 * 1024 * 1024 * 1024;

/// Maximum size of a single part (5 GiB)
pub const MAX_PART_SIZE_BYTES: u64 = 5 * 1024 * 1024 * 1024;
