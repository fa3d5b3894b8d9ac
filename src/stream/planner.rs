//! Part size planning
//!
//! The part size is the smallest multiple of the minimum part size that keeps
//! the number of parts within the store limit, so a larger object costs more
//! memory per part instead of more parts.

use crate::{
    s3::limits::{MAX_MULTIPART_OBJECT_SIZE_BYTES, MAX_PARTS_PER_UPLOAD, MIN_PART_SIZE_BYTES},
    stream::StreamError,
};

/// Total size of the object, if known before streaming
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectSize {
    Known(u64),
    Unknown,
}

impl From<Option<u64>> for ObjectSize {
    fn from(size: Option<u64>) -> Self {
        size.map_or(Self::Unknown, Self::Known)
    }
}

/// Store constraints used to plan the parts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartLimits {
    pub max_parts: u16,
    pub min_part_size: u64,
    /// ceiling used when the size is unknown
    pub max_object_size: u64,
}

impl Default for PartLimits {
    fn default() -> Self {
        Self {
            max_parts: MAX_PARTS_PER_UPLOAD,
            min_part_size: MIN_PART_SIZE_BYTES,
            max_object_size: MAX_MULTIPART_OBJECT_SIZE_BYTES,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartPlan {
    pub total_parts: u16,
    pub part_size: u64,
    /// only meaningful for a known size
    pub last_part_size: u64,
}

/// Calculate the optimal part info for a given object size
///
/// # Errors
///
/// Will return `Err` if the known size is zero or larger than the limits allow
pub fn optimal_part_info(size: ObjectSize, limits: &PartLimits) -> Result<PartPlan, StreamError> {
    let size = match size {
        ObjectSize::Known(0) => return Err(StreamError::InvalidSize(0)),
        ObjectSize::Known(size) if size > limits.max_object_size => {
            return Err(StreamError::EntityTooLarge {
                size,
                max: limits.max_object_size,
            });
        }
        ObjectSize::Known(size) => size,
        ObjectSize::Unknown => limits.max_object_size,
    };

    let min_part_size = limits.min_part_size.max(1);

    let part_size = size
        .div_ceil(u64::from(limits.max_parts.max(1)))
        .div_ceil(min_part_size)
        * min_part_size;

    let total_parts = size.div_ceil(part_size);

    // the ceiling division above keeps this within max_parts
    let total_parts = u16::try_from(total_parts).unwrap_or(limits.max_parts);

    let last_part_size = size - u64::from(total_parts - 1) * part_size;

    Ok(PartPlan {
        total_parts,
        part_size,
        last_part_size,
    })
}
