//! Streaming uploads to S3 compatible object stores
//!
//! [`stream::put_stream`] reads a source of unknown or very large size one
//! part at a time, hashes each part while copying it and uploads it as part
//! of a multipart upload, keeping memory bounded by the part size.

pub mod cli;
pub mod s3;
pub mod stream;
