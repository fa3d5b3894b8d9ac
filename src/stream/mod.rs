//! Multipart streaming of objects of unknown or very large size
//!
//! The source is read one part at a time into a single reusable buffer, each
//! part is hashed while it is copied and uploaded before the next one is read,
//! so memory stays bounded by the part size.

pub mod client;
pub mod error;
pub mod hash_copy;
pub mod planner;
pub mod put_stream;

pub use self::{
    client::{MultipartClient, ObjectOptions},
    error::{StreamError, StreamFailure},
    hash_copy::{Copied, hash_copy_n},
    planner::{ObjectSize, PartLimits, PartPlan, optimal_part_info},
    put_stream::put_stream,
};

/// Options for a streamed upload
#[derive(Debug, Clone, Default)]
pub struct StreamOptions {
    pub object: ObjectOptions,
    pub limits: PartLimits,
    /// Issue `AbortMultipartUpload` when the upload fails after it was initiated,
    /// otherwise the incomplete upload stays on the store
    pub abort_on_failure: bool,
}

/// A completed upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamOutput {
    pub upload_id: String,
    pub etag: String,
    pub uploaded: u64,
    pub parts: u16,
}
